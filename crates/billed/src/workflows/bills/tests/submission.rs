use std::sync::Arc;

use mockall::predicate::eq;
use mockall::Sequence;

use super::common::*;
use crate::workflows::bills::domain::{BillKey, CreatedBill, DEFAULT_VAT_PCT};
use crate::workflows::bills::ports::{MockBillStore, MockNavigationPort, Route, StoreError};
use crate::workflows::bills::submission::{
    BillSubmission, SubmissionError, SubmissionPhase, UNSUPPORTED_RECEIPT_MESSAGE,
};

fn created(key: &str) -> CreatedBill {
    CreatedBill {
        file_url: format!("https://files.test/{key}.png"),
        key: BillKey(key.to_string()),
    }
}

fn submission(
    store: MockBillStore,
    navigation: MockNavigationPort,
    alerts: Arc<RecordingAlerts>,
) -> BillSubmission {
    BillSubmission::new(
        Arc::new(store),
        Arc::new(navigation),
        alerts,
        employee(),
    )
}

#[tokio::test]
async fn supported_extensions_create_one_draft_each() {
    for name in ["ticket.jpg", "ticket.JPEG", "ticket.Png"] {
        let mut store = MockBillStore::new();
        let expected_name = name.to_string();
        store
            .expect_create()
            .withf(move |upload| upload.email == "toto" && upload.file.name == expected_name)
            .times(1)
            .returning(|_| Ok(created("key")));
        let alerts = Arc::new(RecordingAlerts::default());
        let mut submission = submission(store, MockNavigationPort::new(), alerts.clone());

        let draft = submission
            .on_file_selected(receipt(name))
            .await
            .expect("supported receipt uploads")
            .clone();

        assert_eq!(draft.key, BillKey("key".to_string()));
        assert_eq!(draft.file_name, name);
        assert_eq!(submission.bill_id(), Some(&BillKey("key".to_string())));
        assert!(!submission.bill_id().expect("tracked").0.is_empty());
        assert_eq!(submission.phase(), SubmissionPhase::Drafted);
        assert!(alerts.messages().is_empty());
    }
}

#[tokio::test]
async fn unsupported_extension_alerts_without_calling_store() {
    let mut store = MockBillStore::new();
    store.expect_create().never();
    let alerts = Arc::new(RecordingAlerts::default());
    let mut submission = submission(store, MockNavigationPort::new(), alerts.clone());

    match submission.on_file_selected(receipt("test.txt")).await {
        Err(SubmissionError::UnsupportedReceipt { file_name }) => assert_eq!(file_name, "test.txt"),
        other => panic!("expected unsupported receipt, got {other:?}"),
    }

    assert_eq!(alerts.messages(), vec![UNSUPPORTED_RECEIPT_MESSAGE.to_string()]);
    assert_eq!(
        UNSUPPORTED_RECEIPT_MESSAGE,
        "Veuillez sélectionner un fichier avec une extension jpg, jpeg ou png."
    );
    assert!(submission.bill_id().is_none());
    assert_eq!(submission.phase(), SubmissionPhase::Empty);
    assert!(submission.last_error().is_none());
}

#[tokio::test]
async fn reselecting_a_receipt_replaces_the_draft() {
    let mut store = MockBillStore::new();
    let mut seq = Sequence::new();
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(created("first")));
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(created("second")));
    let mut submission = submission(
        store,
        MockNavigationPort::new(),
        Arc::new(RecordingAlerts::default()),
    );

    submission
        .on_file_selected(receipt("one.jpg"))
        .await
        .expect("first upload");
    submission
        .on_file_selected(receipt("two.png"))
        .await
        .expect("second upload");

    let draft = submission.draft().expect("draft tracked");
    assert_eq!(draft.key, BillKey("second".to_string()));
    assert_eq!(draft.file_name, "two.png");
}

#[tokio::test]
async fn rejected_upload_keeps_previous_draft() {
    let mut store = MockBillStore::new();
    let mut seq = Sequence::new();
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(created("kept")));
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(StoreError::Rejected("Erreur 500".to_string())));
    let mut submission = submission(
        store,
        MockNavigationPort::new(),
        Arc::new(RecordingAlerts::default()),
    );

    submission
        .on_file_selected(receipt("one.jpg"))
        .await
        .expect("first upload");
    let err = submission
        .on_file_selected(receipt("two.jpg"))
        .await
        .expect_err("second upload rejected");

    assert!(matches!(err, SubmissionError::Upload(_)));
    assert_eq!(submission.bill_id(), Some(&BillKey("kept".to_string())));
    assert_eq!(submission.draft().expect("draft").file_name, "one.jpg");
    assert_eq!(submission.phase(), SubmissionPhase::Drafted);
    assert_eq!(
        submission.last_error(),
        Some("receipt upload failed: Erreur 500")
    );
}

#[tokio::test]
async fn submit_updates_draft_then_navigates_to_bills() {
    let mut seq = Sequence::new();
    let mut store = MockBillStore::new();
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(created("key")));
    store
        .expect_update()
        .withf(|key, payload| {
            let json = serde_json::to_string(payload).expect("payload serializes");
            key.0 == "key"
                && json.contains(r#""email":"toto""#)
                && json.contains(r#""fileUrl":"https://files.test/key.png""#)
                && json.contains(r#""fileName":"ticket.jpg""#)
                && json.contains(r#""status":"pending""#)
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    let mut navigation = MockNavigationPort::new();
    navigation
        .expect_navigate()
        .with(eq(Route::Bills))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut submission = submission(store, navigation, Arc::new(RecordingAlerts::default()));
    submission
        .on_file_selected(receipt("ticket.jpg"))
        .await
        .expect("upload");
    submission.on_submit(form()).await.expect("submit succeeds");

    assert_eq!(submission.phase(), SubmissionPhase::Finalized);
    assert!(submission.last_error().is_none());
}

#[tokio::test]
async fn submit_defaults_missing_pct() {
    let mut store = MockBillStore::new();
    store.expect_create().returning(|_| Ok(created("key")));
    store
        .expect_update()
        .withf(|_, payload| payload.pct == DEFAULT_VAT_PCT)
        .times(1)
        .returning(|_, _| Ok(()));
    let mut navigation = MockNavigationPort::new();
    navigation.expect_navigate().times(1).return_const(());

    let mut submission = submission(store, navigation, Arc::new(RecordingAlerts::default()));
    submission
        .on_file_selected(receipt("ticket.jpg"))
        .await
        .expect("upload");
    let mut form = form();
    form.pct = None;
    submission.on_submit(form).await.expect("submit succeeds");
}

#[tokio::test]
async fn submit_without_draft_is_rejected_before_store() {
    let mut store = MockBillStore::new();
    store.expect_update().never();
    let mut navigation = MockNavigationPort::new();
    navigation.expect_navigate().never();

    let mut submission = submission(store, navigation, Arc::new(RecordingAlerts::default()));

    assert!(matches!(
        submission.on_submit(form()).await,
        Err(SubmissionError::MissingDraft)
    ));
    assert_eq!(submission.phase(), SubmissionPhase::Empty);
}

#[tokio::test]
async fn failed_update_does_not_navigate_and_allows_retry() {
    let mut seq = Sequence::new();
    let mut store = MockBillStore::new();
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(created("key")));
    store
        .expect_update()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(StoreError::Rejected("Erreur 500".to_string())));
    store
        .expect_update()
        .withf(|key, _| key.0 == "key")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    let mut navigation = MockNavigationPort::new();
    navigation
        .expect_navigate()
        .with(eq(Route::Bills))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut submission = submission(store, navigation, Arc::new(RecordingAlerts::default()));
    submission
        .on_file_selected(receipt("ticket.jpg"))
        .await
        .expect("upload");

    let err = submission.on_submit(form()).await.expect_err("first update fails");
    assert!(matches!(err, SubmissionError::Persist(_)));
    assert_eq!(submission.phase(), SubmissionPhase::Drafted);
    assert_eq!(submission.bill_id(), Some(&BillKey("key".to_string())));
    assert_eq!(submission.last_error(), Some("bill update failed: Erreur 500"));

    submission.on_submit(form()).await.expect("retry succeeds");
    assert_eq!(submission.phase(), SubmissionPhase::Finalized);
}

#[tokio::test]
async fn finalized_bill_cannot_be_submitted_twice() {
    let mut store = MockBillStore::new();
    store.expect_create().times(1).returning(|_| Ok(created("key")));
    store.expect_update().times(1).returning(|_, _| Ok(()));
    let mut navigation = MockNavigationPort::new();
    navigation
        .expect_navigate()
        .with(eq(Route::Bills))
        .times(1)
        .return_const(());

    let mut submission = submission(store, navigation, Arc::new(RecordingAlerts::default()));
    submission
        .on_file_selected(receipt("ticket.jpg"))
        .await
        .expect("upload");
    submission.on_submit(form()).await.expect("first submit");

    assert!(matches!(
        submission.on_submit(form()).await,
        Err(SubmissionError::MissingDraft)
    ));
    assert_eq!(submission.phase(), SubmissionPhase::Finalized);
}

#[tokio::test]
async fn finalized_submission_starts_a_new_draft_for_the_next_bill() {
    let mut seq = Sequence::new();
    let mut store = MockBillStore::new();
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(created("first")));
    store
        .expect_update()
        .withf(|key, _| key.0 == "first")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(StoreError::Rejected("Erreur 500".to_string())));
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(created("second")));
    store
        .expect_update()
        .withf(|key, payload| key.0 == "second" && payload.file_name == "second.png")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    let mut navigation = MockNavigationPort::new();
    navigation
        .expect_navigate()
        .with(eq(Route::Bills))
        .times(2)
        .return_const(());

    let mut submission = submission(store, navigation, Arc::new(RecordingAlerts::default()));
    submission
        .on_file_selected(receipt("first.jpg"))
        .await
        .expect("first upload");
    submission.on_submit(form()).await.expect("first submit");
    assert_eq!(submission.phase(), SubmissionPhase::Finalized);

    submission
        .on_file_selected(receipt("retry.png"))
        .await
        .expect_err("upload rejected");
    assert_eq!(submission.phase(), SubmissionPhase::Finalized);
    assert_eq!(
        submission.last_error(),
        Some("receipt upload failed: Erreur 500")
    );

    submission
        .on_file_selected(receipt("second.png"))
        .await
        .expect("second upload");
    assert_eq!(submission.phase(), SubmissionPhase::Drafted);
    assert_eq!(submission.bill_id(), Some(&BillKey("second".to_string())));
    assert!(submission.last_error().is_none());

    submission.on_submit(form()).await.expect("second submit");
    assert_eq!(submission.phase(), SubmissionPhase::Finalized);
}
