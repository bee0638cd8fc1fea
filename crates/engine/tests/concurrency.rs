//! Concurrent transitions against one invoice are serialized: the loser
//! of the race observes the moved status and fails instead of silently
//! overwriting.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;

use apflow_core::error::CoreError;
use apflow_core::status::{InvoiceAction, InvoiceStatus};
use apflow_store::traits::InvoiceStore;

use common::{fixture, request, submitted_invoice};

#[tokio::test]
async fn racing_approvals_produce_one_transition_and_one_stale_failure() {
    let f = Arc::new(fixture().await);
    let invoice = submitted_invoice(&f).await;

    let first = {
        let f = Arc::clone(&f);
        let id = invoice.id;
        let pm = f.pm.id;
        tokio::spawn(async move {
            f.engine
                .apply_invoice_action(request(id, InvoiceAction::Approve, pm))
                .await
        })
    };
    let second = {
        let f = Arc::clone(&f);
        let id = invoice.id;
        let pm = f.pm.id;
        tokio::spawn(async move {
            f.engine
                .apply_invoice_action(request(id, InvoiceAction::Approve, pm))
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let failures: Vec<_> = results.into_iter().filter_map(|r| r.err()).collect();

    assert_eq!(successes, 1, "exactly one approval may win");
    assert_eq!(failures.len(), 1);
    // The loser re-read the moved status and failed the table check.
    assert_matches!(failures[0], CoreError::InvalidTransition { .. });

    let settled = f.invoices.find_by_id(invoice.id).await.unwrap().unwrap();
    assert_eq!(settled.status, InvoiceStatus::PendingFinanceReview);
    assert_eq!(settled.audit_trail.len(), 1);
}

#[tokio::test]
async fn transitions_on_different_invoices_proceed_independently() {
    let f = Arc::new(fixture().await);
    let a = submitted_invoice(&f).await;
    let b = f
        .engine
        .submit_invoice(common::new_invoice(f.vendor.id, Some(f.pm.id)), f.vendor.id)
        .await
        .unwrap();

    let handles: Vec<_> = [a.id, b.id]
        .into_iter()
        .map(|id| {
            let f = Arc::clone(&f);
            let pm = f.pm.id;
            tokio::spawn(async move {
                f.engine
                    .apply_invoice_action(request(id, InvoiceAction::Approve, pm))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for id in [a.id, b.id] {
        let settled = f.invoices.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(settled.status, InvoiceStatus::PendingFinanceReview);
    }
}
