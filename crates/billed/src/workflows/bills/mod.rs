//! Employee expense bills: receipt upload, draft finalization, and the personal bill list.
//!
//! Both workflows talk to the outside world only through the ports in [`ports`], so the
//! host decides what the store, router, dialog and alerts actually are.

pub mod domain;
pub mod listing;
pub mod ports;
pub mod submission;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Bill, BillForm, BillId, BillKey, BillPayload, BillStatus, CreatedBill, CurrentUser, DateKey,
    DraftReceipt, ReceiptFile, ReceiptUpload, SessionError, UserKind, DEFAULT_VAT_PCT,
    SUPPORTED_RECEIPT_EXTENSIONS,
};
pub use listing::{sort_rows, BillListing, BillRow, BillsPage, ListingError};
pub use ports::{BillStore, NavigationPort, ReceiptModal, Route, StoreError, UserAlert};
pub use submission::{
    BillSubmission, SubmissionError, SubmissionPhase, UNSUPPORTED_RECEIPT_MESSAGE,
};
pub use views::{receipt_preview_html, render_bills_page, render_new_bill_page};
