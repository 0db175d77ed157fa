use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use billed::error::AppError;
use billed::workflows::bills::{
    Bill, BillId, BillKey, BillPayload, BillStore, CreatedBill, NavigationPort, ReceiptModal,
    ReceiptUpload, Route, StoreError, UserAlert,
};
use chrono::NaiveDate;
use tracing::info;

const DEFAULT_FIXTURE: &str = include_str!("../fixtures/bills.json");

static BILL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_bill_key() -> BillKey {
    let id = BILL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BillKey(format!("bill-{id:06}"))
}

/// Process-local stand-in for the remote bill API.
#[derive(Default, Clone)]
pub(crate) struct InMemoryBillStore {
    bills: Arc<Mutex<Vec<Bill>>>,
}

impl InMemoryBillStore {
    pub(crate) fn from_fixture(path: Option<&Path>) -> Result<Self, AppError> {
        let raw = match path {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_FIXTURE.to_string(),
        };
        let bills: Vec<Bill> = serde_json::from_str(&raw)?;
        info!(count = bills.len(), "bill store seeded");
        Ok(Self {
            bills: Arc::new(Mutex::new(bills)),
        })
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let guard = self.bills.lock().expect("bill store mutex poisoned");
        Ok(guard.clone())
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<CreatedBill, StoreError> {
        let key = next_bill_key();
        let file_url = format!("memory://receipts/{}/{}", key.0, upload.file.name);

        let mut guard = self.bills.lock().expect("bill store mutex poisoned");
        guard.push(Bill {
            id: BillId(key.0.clone()),
            email: upload.email,
            file_url: Some(file_url.clone()),
            file_name: Some(upload.file.name),
            ..Bill::default()
        });
        Ok(CreatedBill { file_url, key })
    }

    async fn update(&self, key: BillKey, payload: BillPayload) -> Result<(), StoreError> {
        let mut guard = self.bills.lock().expect("bill store mutex poisoned");
        let bill = guard
            .iter_mut()
            .find(|bill| bill.id.0 == key.0)
            .ok_or_else(|| StoreError::Rejected("Erreur 404".to_string()))?;

        bill.email = payload.email;
        bill.expense_type = payload.expense_type;
        bill.name = payload.name;
        bill.amount = f64::from(payload.amount);
        bill.date = payload.date.format("%Y-%m-%d").to_string();
        bill.vat = payload.vat;
        bill.pct = Some(payload.pct);
        bill.commentary = payload.commentary;
        bill.file_url = Some(payload.file_url);
        bill.file_name = Some(payload.file_name);
        bill.status = payload.status;
        Ok(())
    }
}

/// Remembers the last route so the command can follow it once the workflow returns.
#[derive(Default)]
pub(crate) struct ConsoleNavigator {
    last: Mutex<Option<Route>>,
}

impl ConsoleNavigator {
    pub(crate) fn take_route(&self) -> Option<Route> {
        self.last.lock().expect("navigator mutex poisoned").take()
    }
}

impl NavigationPort for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "navigate");
        *self.last.lock().expect("navigator mutex poisoned") = Some(route);
    }
}

pub(crate) struct ConsoleModal {
    width: u32,
}

impl ConsoleModal {
    pub(crate) fn new(width: u32) -> Self {
        Self { width }
    }
}

impl ReceiptModal for ConsoleModal {
    fn width(&self) -> u32 {
        self.width
    }

    fn set_body(&self, html: &str) {
        println!("{html}");
    }

    fn modal(&self, command: &str) {
        info!(command, "receipt modal");
    }
}

pub(crate) struct ConsoleAlert;

impl UserAlert for ConsoleAlert {
    fn alert(&self, message: &str) {
        println!("[alert] {message}");
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
