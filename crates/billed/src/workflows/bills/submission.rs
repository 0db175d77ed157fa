use std::sync::Arc;

use tracing::{error, info, warn};

use super::domain::{
    BillForm, BillKey, BillPayload, CurrentUser, DraftReceipt, ReceiptFile, ReceiptUpload,
};
use super::ports::{BillStore, NavigationPort, Route, StoreError, UserAlert};

/// Alert shown when the receipt is not an image the back office can preview.
pub const UNSUPPORTED_RECEIPT_MESSAGE: &str =
    "Veuillez sélectionner un fichier avec une extension jpg, jpeg ou png.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// No receipt uploaded yet.
    Empty,
    /// Receipt uploaded; the store holds a draft keyed by [`BillSubmission::bill_id`].
    Drafted,
    /// Form persisted and the shell sent back to the listing.
    Finalized,
}

/// Drives one new bill from receipt upload to final update.
pub struct BillSubmission {
    store: Arc<dyn BillStore>,
    navigation: Arc<dyn NavigationPort>,
    alerts: Arc<dyn UserAlert>,
    user: CurrentUser,
    draft: Option<DraftReceipt>,
    phase: SubmissionPhase,
    last_error: Option<String>,
}

impl BillSubmission {
    pub fn new(
        store: Arc<dyn BillStore>,
        navigation: Arc<dyn NavigationPort>,
        alerts: Arc<dyn UserAlert>,
        user: CurrentUser,
    ) -> Self {
        Self {
            store,
            navigation,
            alerts,
            user,
            draft: None,
            phase: SubmissionPhase::Empty,
            last_error: None,
        }
    }

    pub fn bill_id(&self) -> Option<&BillKey> {
        self.draft.as_ref().map(|draft| &draft.key)
    }

    pub fn draft(&self) -> Option<&DraftReceipt> {
        self.draft.as_ref()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate the picked receipt and upload it as a new draft.
    ///
    /// An unsupported extension only raises the alert. A rejected upload keeps
    /// whatever draft was tracked before. A later valid selection replaces the
    /// current draft.
    pub async fn on_file_selected(
        &mut self,
        file: ReceiptFile,
    ) -> Result<&DraftReceipt, SubmissionError> {
        if !file.has_supported_extension() {
            warn!(file_name = %file.name, "receipt rejected: unsupported extension");
            self.alerts.alert(UNSUPPORTED_RECEIPT_MESSAGE);
            return Err(SubmissionError::UnsupportedReceipt {
                file_name: file.name,
            });
        }

        let file_name = file.name.clone();
        let upload = ReceiptUpload {
            file,
            email: self.user.email.clone(),
        };

        let created = match self.store.create(upload).await {
            Ok(created) => created,
            Err(err) => {
                error!(%file_name, error = %err, "receipt upload failed");
                let err = SubmissionError::Upload(err);
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        info!(key = %created.key, %file_name, "draft bill created");
        self.last_error = None;
        self.phase = SubmissionPhase::Drafted;
        Ok(self.draft.insert(DraftReceipt {
            key: created.key,
            file_url: created.file_url,
            file_name,
        }))
    }

    /// Persist the form into the tracked draft, then send the shell to the listing.
    pub async fn on_submit(&mut self, form: BillForm) -> Result<(), SubmissionError> {
        let draft = match (&self.draft, self.phase) {
            (Some(draft), SubmissionPhase::Drafted) => draft,
            _ => {
                warn!("bill submitted without an uploaded receipt");
                return Err(SubmissionError::MissingDraft);
            }
        };

        let key = draft.key.clone();
        let payload = BillPayload::from_form(form, &self.user.email, draft);

        if let Err(err) = self.store.update(key.clone(), payload).await {
            error!(%key, error = %err, "bill update failed");
            let err = SubmissionError::Persist(err);
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        info!(%key, "bill submitted");
        self.last_error = None;
        self.phase = SubmissionPhase::Finalized;
        self.navigation.navigate(Route::Bills);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{}", UNSUPPORTED_RECEIPT_MESSAGE)]
    UnsupportedReceipt { file_name: String },
    #[error("receipt upload failed: {0}")]
    Upload(#[source] StoreError),
    #[error("bill update failed: {0}")]
    Persist(#[source] StoreError),
    #[error("no receipt has been uploaded for this bill")]
    MissingDraft,
}
