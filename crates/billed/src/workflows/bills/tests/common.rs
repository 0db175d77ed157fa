use std::sync::Mutex;

use chrono::NaiveDate;

use crate::workflows::bills::domain::{
    Bill, BillForm, BillId, BillStatus, CurrentUser, ReceiptFile,
};
use crate::workflows::bills::ports::{ReceiptModal, UserAlert};

pub(super) fn employee() -> CurrentUser {
    CurrentUser::employee("toto")
}

pub(super) fn receipt(name: &str) -> ReceiptFile {
    let content_type = if name.to_ascii_lowercase().ends_with(".txt") {
        mime::TEXT_PLAIN
    } else {
        mime::IMAGE_JPEG
    };
    ReceiptFile::new(name, content_type, b"receipt".to_vec())
}

pub(super) fn form() -> BillForm {
    BillForm {
        expense_type: "Transports".to_string(),
        name: "Vol Paris Londres".to_string(),
        amount: 348,
        date: NaiveDate::from_ymd_opt(2023, 4, 12).expect("valid date"),
        vat: "70".to_string(),
        pct: Some(20),
        commentary: "séminaire".to_string(),
    }
}

fn bill(id: &str, name: &str, date: &str, status: BillStatus) -> Bill {
    Bill {
        id: BillId(id.to_string()),
        email: "a@a".to_string(),
        expense_type: "Hôtel et logement".to_string(),
        name: name.to_string(),
        amount: 100.0,
        date: date.to_string(),
        vat: "80".to_string(),
        pct: Some(20),
        commentary: String::new(),
        comment_admin: None,
        file_url: Some(format!("https://files.test/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
        status,
    }
}

/// Store order deliberately unsorted.
pub(super) fn fixture_bills() -> Vec<Bill> {
    vec![
        bill("47qAXb6fIm2zOKkLzMro", "encore", "2004-04-04", BillStatus::Pending),
        bill("BeKy5Mo4jkmdfPGYpTxZ", "test1", "2001-01-01", BillStatus::Refused),
        bill("UIUZtnPQvnbFnB0ozvJh", "test3", "2003-03-03", BillStatus::Accepted),
        bill("qcCK3SzECmaZAGRrHjaC", "test2", "2002-02-02", BillStatus::Refused),
    ]
}

#[derive(Default)]
pub(super) struct RecordingAlerts {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub(super) fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("alert mutex poisoned").clone()
    }
}

impl UserAlert for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.messages
            .lock()
            .expect("alert mutex poisoned")
            .push(message.to_string());
    }
}

pub(super) struct RecordingModal {
    width: u32,
    bodies: Mutex<Vec<String>>,
    commands: Mutex<Vec<String>>,
}

impl RecordingModal {
    pub(super) fn new(width: u32) -> Self {
        Self {
            width,
            bodies: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn bodies(&self) -> Vec<String> {
        self.bodies.lock().expect("modal mutex poisoned").clone()
    }

    pub(super) fn commands(&self) -> Vec<String> {
        self.commands.lock().expect("modal mutex poisoned").clone()
    }
}

impl ReceiptModal for RecordingModal {
    fn width(&self) -> u32 {
        self.width
    }

    fn set_body(&self, html: &str) {
        self.bodies
            .lock()
            .expect("modal mutex poisoned")
            .push(html.to_string());
    }

    fn modal(&self, command: &str) {
        self.commands
            .lock()
            .expect("modal mutex poisoned")
            .push(command.to_string());
    }
}
