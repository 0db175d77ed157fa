use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Receipt extensions accepted by the upload step, compared case-insensitively.
pub const SUPPORTED_RECEIPT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Percentage applied when the form leaves `pct` empty.
pub const DEFAULT_VAT_PCT: u32 = 20;

/// Identifier assigned by the store to a persisted bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillId(pub String);

/// Store key handed back by `create`; every later update targets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillKey(pub String);

impl fmt::Display for BillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refused",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserKind {
    Employee,
    Admin,
}

/// Authenticated user read once from the session and injected into the workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(rename = "type")]
    pub kind: UserKind,
    pub email: String,
}

impl CurrentUser {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            kind: UserKind::Employee,
            email: email.into(),
        }
    }

    /// Parse the `user` entry the login flow leaves in session storage.
    pub fn from_session_json(raw: &str) -> Result<Self, SessionError> {
        let user: CurrentUser = serde_json::from_str(raw)?;
        if user.email.trim().is_empty() {
            return Err(SessionError::MissingEmail);
        }
        Ok(user)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session user is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("session user has no email")]
    MissingEmail,
}

/// File picked by the user in the receipt input.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFile {
    pub name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    pub fn new(name: impl Into<String>, content_type: mime::Mime, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }

    /// Lowercased text after the last `.` of the file name.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    pub fn has_supported_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| SUPPORTED_RECEIPT_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Calendar date parsed from the zero-padded, year-first text the store keeps.
///
/// Accepts `-`, space, `/` or `.` as separators, years 1900-2099, and compares
/// chronologically while keeping the original text for display.
#[derive(Debug, Clone)]
pub struct DateKey {
    date: NaiveDate,
    raw: String,
}

impl DateKey {
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        if bytes.len() != 10 {
            return None;
        }
        let is_separator = |b: u8| matches!(b, b'-' | b' ' | b'/' | b'.');
        if !is_separator(bytes[4]) || !is_separator(bytes[7]) {
            return None;
        }
        let digits = |range: std::ops::Range<usize>| -> Option<u32> {
            let part = &raw[range];
            if part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse().ok()
            } else {
                None
            }
        };

        let year = digits(0..4)?;
        let month = digits(5..7)?;
        let day = digits(8..10)?;
        if !(1900..2100).contains(&year) {
            return None;
        }

        let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
        Some(Self {
            date,
            raw: raw.to_string(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for DateKey {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for DateKey {}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

/// Bill record as the store returns it from `list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default)]
    pub id: BillId,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub expense_type: String,
    #[serde(default)]
    pub name: String,
    /// Stored as any JSON number; records entered outside the form may be signed or fractional.
    #[serde(default)]
    pub amount: f64,
    /// Raw store text; not guaranteed to parse as a [`DateKey`].
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub vat: String,
    #[serde(default)]
    pub pct: Option<u32>,
    #[serde(default)]
    pub commentary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_admin: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

/// Fields the employee fills in on the new bill form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillForm {
    pub expense_type: String,
    pub name: String,
    pub amount: u32,
    pub date: NaiveDate,
    pub vat: String,
    pub pct: Option<u32>,
    pub commentary: String,
}

/// Full record sent to `update` when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayload {
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: u32,
    pub date: NaiveDate,
    pub vat: String,
    pub pct: u32,
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
    pub status: BillStatus,
}

impl BillPayload {
    pub fn from_form(form: BillForm, email: &str, draft: &DraftReceipt) -> Self {
        Self {
            email: email.to_string(),
            expense_type: form.expense_type,
            name: form.name,
            amount: form.amount,
            date: form.date,
            vat: form.vat,
            pct: form.pct.unwrap_or(DEFAULT_VAT_PCT),
            commentary: form.commentary,
            file_url: draft.file_url.clone(),
            file_name: draft.file_name.clone(),
            status: BillStatus::Pending,
        }
    }
}

/// Multipart body of the `create` call: the receipt and its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptUpload {
    pub file: ReceiptFile,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBill {
    pub file_url: String,
    pub key: BillKey,
}

/// Identifiers a submission tracks once its receipt is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftReceipt {
    pub key: BillKey,
    pub file_url: String,
    pub file_name: String,
}
