//! Builds notification instructions for applied transitions.
//!
//! Instructions are directives for the external dispatcher. Building them
//! is best-effort: a store hiccup here degrades to fewer notifications,
//! never to a failed transition.

use apflow_core::notification::{categories, NotificationInstruction};
use apflow_core::roles::Role;
use apflow_core::transitions::TransitionOutcome;
use apflow_core::types::DbId;
use apflow_store::models::invoice::Invoice;
use apflow_store::traits::UserStore;

use crate::workflow::RoutingOutcome;

/// "A new invoice landed in your queue" -- sent to the assigned PM on
/// creation.
pub(crate) fn submission(invoice: &Invoice, pm_id: DbId) -> NotificationInstruction {
    NotificationInstruction::new(
        pm_id,
        categories::STATUS,
        format!("Invoice {} submitted", invoice.invoice_number),
        format!(
            "Invoice {} ({} {}) was submitted for project {} and awaits your review.",
            invoice.invoice_number,
            format_amount(invoice.amount_cents),
            invoice.currency,
            invoice.project_id
        ),
    )
}

/// Instructions for one applied transition.
pub(crate) async fn transition(
    users: &dyn UserStore,
    invoice: &Invoice,
    outcome: TransitionOutcome,
    routing: &RoutingOutcome,
) -> Vec<NotificationInstruction> {
    use TransitionOutcome::*;

    let number = &invoice.invoice_number;
    let mut instructions = Vec::new();

    match outcome {
        IntakeAccepted => {
            if let Some(pm_id) = invoice.assigned_pm {
                instructions.push(NotificationInstruction::new(
                    pm_id,
                    categories::STATUS,
                    format!("Invoice {number} accepted for review"),
                    format!("Invoice {number} was accepted into your approval queue."),
                ));
            }
        }
        PmApproved => {
            if let Some(finance_id) = invoice.assigned_finance_user {
                instructions.push(NotificationInstruction::new(
                    finance_id,
                    categories::APPROVAL,
                    format!("Invoice {number} awaits finance review"),
                    format!("Invoice {number} was approved by the project manager and awaits your review."),
                ));
            }
        }
        PmRejected | FinanceRejected => {
            instructions.push(NotificationInstruction::new(
                invoice.submitted_by,
                categories::REJECTION,
                format!("Invoice {number} rejected"),
                format!("Invoice {number} was rejected. See the invoice notes for details."),
            ));
        }
        PmInfoRequested | FinanceInfoRequested => {
            instructions.push(NotificationInstruction::new(
                invoice.submitted_by,
                categories::INFO_REQUEST,
                format!("More information needed for invoice {number}"),
                format!("A reviewer requested more information on invoice {number}. Please resubmit with the requested details."),
            ));
        }
        InfoResolved => {
            let reviewer = if invoice.status
                == apflow_core::status::InvoiceStatus::PendingFinanceReview
            {
                invoice.assigned_finance_user
            } else {
                invoice.assigned_pm
            };
            if let Some(reviewer_id) = reviewer {
                instructions.push(NotificationInstruction::new(
                    reviewer_id,
                    categories::STATUS,
                    format!("Invoice {number} returned to your queue"),
                    format!("The info request on invoice {number} was resolved; it is back in your queue."),
                ));
            }
        }
        Resubmitted | SentBack | Restored => {
            if let Some(pm_id) = invoice.assigned_pm {
                instructions.push(NotificationInstruction::new(
                    pm_id,
                    categories::STATUS,
                    format!("Invoice {number} back in your queue"),
                    format!("Invoice {number} returned to PM review."),
                ));
            }
        }
        FinanceApproved => {
            instructions.push(NotificationInstruction::new(
                invoice.submitted_by,
                categories::APPROVAL,
                format!("Invoice {number} approved"),
                format!("Invoice {number} completed finance review and is approved for payment."),
            ));
            if let Some(pm_id) = invoice.assigned_pm {
                instructions.push(NotificationInstruction::new(
                    pm_id,
                    categories::STATUS,
                    format!("Invoice {number} approved"),
                    format!("Invoice {number} completed finance review."),
                ));
            }
        }
    }

    if matches!(routing, RoutingOutcome::Unresolved) {
        match users.list_by_role(Role::Admin).await {
            Ok(admins) => {
                for admin in admins.iter().filter(|a| a.is_active) {
                    instructions.push(NotificationInstruction::new(
                        admin.id,
                        categories::ROUTING,
                        format!("Invoice {number} needs manual routing"),
                        format!(
                            "No finance user could be resolved for invoice {number}; assign one manually."
                        ),
                    ));
                }
            }
            Err(err) => {
                tracing::warn!(
                    invoice_id = invoice.id,
                    error = %err,
                    "Could not list admins for routing alert"
                );
            }
        }
    }

    instructions
}

fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_format_with_two_decimals() {
        assert_eq!(format_amount(125_00), "125.00");
        assert_eq!(format_amount(9), "0.09");
        assert_eq!(format_amount(10_50), "10.50");
    }
}
