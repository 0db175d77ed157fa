use std::cmp::Reverse;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::domain::{Bill, BillId, CurrentUser, DateKey};
use super::ports::{BillStore, NavigationPort, ReceiptModal, Route, StoreError};
use super::views::receipt_preview_html;

/// One line of the employee's bill table.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub id: BillId,
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: f64,
    pub status: &'static str,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

impl From<Bill> for BillRow {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id,
            expense_type: bill.expense_type,
            name: bill.name,
            date: bill.date,
            amount: bill.amount,
            status: bill.status.label(),
            file_url: bill.file_url,
            file_name: bill.file_name,
        }
    }
}

/// Rendering directive for the listing page.
#[derive(Debug, Clone, PartialEq)]
pub enum BillsPage {
    Loading,
    Error(String),
    Ready(Vec<BillRow>),
}

/// Most recent first. Equal dates keep store order; unparseable dates trail
/// the dated rows in store order.
pub fn sort_rows(rows: &mut [BillRow]) {
    rows.sort_by_cached_key(|row| {
        let key = DateKey::parse(&row.date);
        (key.is_none(), Reverse(key))
    });
}

/// Read side of the employee bill pages.
pub struct BillListing {
    store: Arc<dyn BillStore>,
    navigation: Arc<dyn NavigationPort>,
    modal: Arc<dyn ReceiptModal>,
    user: CurrentUser,
}

impl BillListing {
    pub fn new(
        store: Arc<dyn BillStore>,
        navigation: Arc<dyn NavigationPort>,
        modal: Arc<dyn ReceiptModal>,
        user: CurrentUser,
    ) -> Self {
        Self {
            store,
            navigation,
            modal,
            user,
        }
    }

    pub async fn fetch(&self) -> Result<Vec<BillRow>, ListingError> {
        let bills = self.store.list().await.map_err(|err| {
            error!(email = %self.user.email, error = %err, "bill listing failed");
            ListingError::Store(err)
        })?;

        for bill in bills.iter().filter(|bill| DateKey::parse(&bill.date).is_none()) {
            warn!(id = %bill.id.0, date = %bill.date, "bill date is not YYYY-MM-DD, left unsorted");
        }

        let mut rows: Vec<BillRow> = bills.into_iter().map(BillRow::from).collect();
        sort_rows(&mut rows);
        info!(email = %self.user.email, count = rows.len(), "bills fetched");
        Ok(rows)
    }

    pub async fn load_page(&self) -> BillsPage {
        match self.fetch().await {
            Ok(rows) => BillsPage::Ready(rows),
            Err(err) => BillsPage::Error(err.to_string()),
        }
    }

    /// Preview the row's receipt at half the dialog width.
    pub fn on_view_bill(&self, row: &BillRow) {
        let width = self.modal.width() / 2;
        let url = row.file_url.as_deref().unwrap_or_default();
        self.modal.set_body(&receipt_preview_html(url, width));
        self.modal.modal("show");
    }

    pub fn on_create_new_bill(&self) {
        self.navigation.navigate(Route::NewBill);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
