use std::fmt;

use async_trait::async_trait;

use super::domain::{Bill, BillKey, BillPayload, CreatedBill, ReceiptUpload};

/// Remote bill persistence. Rejections carry the server's message untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;
    async fn create(&self, upload: ReceiptUpload) -> Result<CreatedBill, StoreError>;
    async fn update(&self, key: BillKey, payload: BillPayload) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Rejected(String),
}

/// Page identifiers understood by the routing shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait NavigationPort: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Dialog used to preview a receipt.
#[cfg_attr(test, mockall::automock)]
pub trait ReceiptModal: Send + Sync {
    fn width(&self) -> u32;
    fn set_body(&self, html: &str);
    fn modal(&self, command: &str);
}

/// Blocking user-facing alert.
#[cfg_attr(test, mockall::automock)]
pub trait UserAlert: Send + Sync {
    fn alert(&self, message: &str);
}
