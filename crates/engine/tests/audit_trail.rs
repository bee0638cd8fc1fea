//! Integration tests for the audit recorder: ordering, idempotent reads,
//! provenance capture, and integrity-chain verification.

mod common;

use assert_matches::assert_matches;

use apflow_core::audit::Provenance;
use apflow_core::error::CoreError;
use apflow_core::roles::Role;
use apflow_core::status::{InvoiceAction, InvoiceStatus};
use apflow_engine::{ActionRequest, AuditRecorder};
use apflow_store::traits::InvoiceStore;

use common::{fixture, request, submitted_invoice};

#[tokio::test]
async fn each_transition_appends_exactly_one_entry_in_order() {
    let f = fixture().await;
    let recorder = AuditRecorder::new(f.invoices.clone());
    let invoice = submitted_invoice(&f).await;

    f.engine
        .apply_invoice_action(request(invoice.id, InvoiceAction::RequestInfo, f.pm.id))
        .await
        .unwrap();
    f.engine
        .apply_invoice_action(request(invoice.id, InvoiceAction::Resubmit, f.vendor.id))
        .await
        .unwrap();
    f.engine
        .apply_invoice_action(request(invoice.id, InvoiceAction::Approve, f.pm.id))
        .await
        .unwrap();

    let history = recorder.history(invoice.id).await.unwrap();
    assert_eq!(history.len(), 3);

    assert_eq!(history[0].action, InvoiceAction::RequestInfo);
    assert_eq!(history[0].previous_status, InvoiceStatus::Submitted);
    assert_eq!(history[0].new_status, InvoiceStatus::MoreInfoNeeded);
    assert_eq!(history[0].actor_role, Role::ProjectManager);

    assert_eq!(history[1].action, InvoiceAction::Resubmit);
    assert_eq!(history[1].actor, "Vera");

    assert_eq!(history[2].action, InvoiceAction::Approve);
    assert_eq!(history[2].new_status, InvoiceStatus::PendingFinanceReview);
}

#[tokio::test]
async fn history_is_idempotent() {
    let f = fixture().await;
    let recorder = AuditRecorder::new(f.invoices.clone());
    let invoice = submitted_invoice(&f).await;

    f.engine
        .apply_invoice_action(request(invoice.id, InvoiceAction::Approve, f.pm.id))
        .await
        .unwrap();

    let first = recorder.history(invoice.id).await.unwrap();
    let second = recorder.history(invoice.id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn history_of_unknown_invoice_is_not_found() {
    let f = fixture().await;
    let recorder = AuditRecorder::new(f.invoices.clone());
    assert_matches!(
        recorder.history(424242).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn provenance_and_notes_are_captured() {
    let f = fixture().await;
    let recorder = AuditRecorder::new(f.invoices.clone());
    let invoice = submitted_invoice(&f).await;

    f.engine
        .apply_invoice_action(ActionRequest {
            invoice_id: invoice.id,
            action: InvoiceAction::Approve,
            actor_id: f.pm.id,
            notes: Some("rate card checked".into()),
            provenance: Provenance {
                ip_address: Some("10.1.2.3".into()),
                user_agent: Some("apflow-cli/0.1".into()),
            },
        })
        .await
        .unwrap();

    let history = recorder.history(invoice.id).await.unwrap();
    assert_eq!(history[0].notes.as_deref(), Some("rate card checked"));
    assert_eq!(history[0].ip_address.as_deref(), Some("10.1.2.3"));
    assert_eq!(history[0].user_agent.as_deref(), Some("apflow-cli/0.1"));
}

#[tokio::test]
async fn chain_verifies_and_detects_tampering() {
    let f = fixture().await;
    let recorder = AuditRecorder::new(f.invoices.clone());
    let invoice = submitted_invoice(&f).await;

    f.engine
        .apply_invoice_action(request(invoice.id, InvoiceAction::Approve, f.pm.id))
        .await
        .unwrap();
    f.engine
        .apply_invoice_action(request(invoice.id, InvoiceAction::Approve, f.finance.id))
        .await
        .unwrap();

    let check = recorder.verify(invoice.id).await.unwrap();
    assert!(check.chain_valid);
    assert_eq!(check.verified_entries, 2);

    // Tamper with the first entry behind the engine's back.
    let mut tampered = f.invoices.find_by_id(invoice.id).await.unwrap().unwrap();
    tampered.audit_trail[0].notes = Some("nothing to see here".into());
    f.invoices.update(tampered).await.unwrap();

    let check = recorder.verify(invoice.id).await.unwrap();
    assert!(!check.chain_valid);
    assert_eq!(check.first_break, Some(0));
}
