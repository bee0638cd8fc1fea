//! The workflow engine: validates and applies invoice actions.
//!
//! Each transition is request-scoped and runs to completion under the
//! invoice's own lock. The engine re-reads the invoice's status inside the
//! lock before consulting the transition table, so a request racing a
//! concurrent transition fails `InvalidTransition` instead of silently
//! overwriting. Status, approval records, and the audit entry are written
//! back in a single store update.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use apflow_core::approval::ApprovalRecord;
use apflow_core::audit::{AuditEntry, Provenance};
use apflow_core::error::CoreError;
use apflow_core::notification::NotificationInstruction;
use apflow_core::roles::Role;
use apflow_core::status::{ApprovalState, InvoiceAction, InvoiceStatus};
use apflow_core::transitions::{TransitionContext, TransitionOutcome, TransitionTable};
use apflow_core::types::DbId;
use apflow_store::models::invoice::{Invoice, NewInvoice};
use apflow_store::models::user::User;
use apflow_store::traits::{InvoiceStore, NotificationSink, UserStore};

use crate::notify;
use crate::resolver::{HierarchyResolver, Resolution, ResolutionStrategy};

/// One requested action against one invoice.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub invoice_id: DbId,
    pub action: InvoiceAction,
    pub actor_id: DbId,
    pub notes: Option<String>,
    pub provenance: Provenance,
}

/// How finance routing went for a transition that entered finance review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoutingOutcome {
    /// The transition did not enter finance review.
    NotNeeded,
    /// A finance user was already assigned.
    AlreadyAssigned { finance_user: DbId },
    Resolved {
        finance_user: DbId,
        strategy: ResolutionStrategy,
    },
    /// No finance user could be derived. The invoice proceeds, flagged for
    /// manual assignment -- never a guessed default.
    Unresolved,
}

/// The result of one applied transition.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub invoice: Invoice,
    pub previous_status: InvoiceStatus,
    pub new_status: InvoiceStatus,
    pub routing: RoutingOutcome,
    pub audit_entry: AuditEntry,
    pub notifications: Vec<NotificationInstruction>,
}

/// Validates and applies invoice actions against the transition table.
pub struct WorkflowEngine {
    table: TransitionTable,
    users: Arc<dyn UserStore>,
    invoices: Arc<dyn InvoiceStore>,
    sink: Arc<dyn NotificationSink>,
    resolver: HierarchyResolver,
    /// Per-invoice serialization points. Entries are created on first use
    /// and kept for the invoice's lifetime.
    locks: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl WorkflowEngine {
    pub fn new(
        table: TransitionTable,
        users: Arc<dyn UserStore>,
        invoices: Arc<dyn InvoiceStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let resolver = HierarchyResolver::new(Arc::clone(&users));
        Self {
            table,
            users,
            invoices,
            sink,
            resolver,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolver(&self) -> &HierarchyResolver {
        &self.resolver
    }

    async fn lock_for(&self, invoice_id: DbId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(invoice_id).or_default())
    }

    async fn load_actor(&self, actor_id: DbId) -> Result<User, CoreError> {
        let actor = self
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: actor_id,
            })?;
        if !actor.is_active {
            return Err(CoreError::Unauthorized(format!(
                "user {} is deactivated",
                actor.display_name
            )));
        }
        Ok(actor)
    }

    /// Create an invoice.
    ///
    /// Vendors submit on their own behalf (the invoice enters
    /// `Submitted`); Admins perform manual intake straight into
    /// `PendingPmApproval` for a named vendor.
    pub async fn submit_invoice(
        &self,
        mut input: NewInvoice,
        actor_id: DbId,
    ) -> Result<Invoice, CoreError> {
        let actor = self.load_actor(actor_id).await?;

        match actor.role {
            Role::Vendor => {
                input.submitted_by = actor.id;
                input.status = InvoiceStatus::Submitted;
            }
            Role::Admin => {
                let submitter = self
                    .users
                    .find_by_id(input.submitted_by)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "User",
                        id: input.submitted_by,
                    })?;
                if submitter.role != Role::Vendor {
                    return Err(CoreError::Validation(format!(
                        "submitted_by must reference a vendor, {} is a {}",
                        submitter.display_name, submitter.role
                    )));
                }
                input.status = InvoiceStatus::PendingPmApproval;
            }
            other => {
                return Err(CoreError::Unauthorized(format!(
                    "{other} users may not submit invoices"
                )));
            }
        }

        if let Some(pm_id) = input.assigned_pm {
            let pm = self
                .users
                .find_by_id(pm_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: pm_id,
                })?;
            if pm.role != Role::ProjectManager {
                return Err(CoreError::Validation(format!(
                    "assigned_pm must reference a project manager, {} is a {}",
                    pm.display_name, pm.role
                )));
            }
        }

        let invoice = self.invoices.insert(input).await?;

        tracing::info!(
            invoice_id = invoice.id,
            invoice_number = %invoice.invoice_number,
            status = %invoice.status,
            actor_id,
            "Invoice created"
        );

        if let Some(pm_id) = invoice.assigned_pm {
            let note = notify::submission(&invoice, pm_id);
            self.deliver(std::iter::once(note)).await;
        }

        Ok(invoice)
    }

    /// Validate and apply one action. The single entry point for every
    /// status or approval-record mutation.
    pub async fn apply_invoice_action(
        &self,
        request: ActionRequest,
    ) -> Result<ActionOutcome, CoreError> {
        let actor = self.load_actor(request.actor_id).await?;

        let lock = self.lock_for(request.invoice_id).await;
        let _guard = lock.lock().await;

        // Re-read under the lock: the status may have moved since the
        // caller looked.
        let mut invoice = self
            .invoices
            .find_by_id(request.invoice_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Invoice",
                id: request.invoice_id,
            })?;

        let previous_status = invoice.status;

        let context = TransitionContext {
            status: invoice.status,
            action: request.action,
            actor_role: actor.role,
            pm_assignment_ok: pm_assignment_ok(&actor, &invoice),
            pm_approved: invoice.pm_approval.status == ApprovalState::Approved,
            finance_requested_info: invoice.finance_approval.status
                == ApprovalState::InfoRequested,
        };

        let decision = self.table.evaluate(&context).inspect_err(|err| {
            tracing::warn!(
                invoice_id = invoice.id,
                actor_id = actor.id,
                actor_role = %actor.role,
                action = %request.action,
                status = %previous_status,
                error = %err,
                "Transition rejected"
            );
        })?;

        // Vendors act only on their own invoices. Checked after the table
        // so a vendor using the wrong action still reads as Unauthorized.
        if actor.role == Role::Vendor && invoice.submitted_by != actor.id {
            tracing::warn!(
                invoice_id = invoice.id,
                actor_id = actor.id,
                "Vendor attempted to act on another vendor's invoice"
            );
            return Err(CoreError::Forbidden(
                "vendors may only resubmit their own invoices".into(),
            ));
        }

        apply_outcome(&mut invoice, decision.outcome, &actor, &request);
        invoice.status = decision.next_status;

        let routing = self.route_to_finance(&mut invoice).await?;

        let entry = AuditEntry::chained(
            invoice
                .audit_trail
                .last()
                .map(|e| e.integrity_hash.as_str()),
            request.action,
            actor.display_name.clone(),
            actor.id,
            actor.role,
            chrono::Utc::now(),
            previous_status,
            decision.next_status,
            request.notes.clone(),
            request.provenance.clone(),
        );
        invoice.audit_trail.push(entry.clone());

        let invoice = self.invoices.update(invoice).await?;

        tracing::info!(
            invoice_id = invoice.id,
            actor_id = actor.id,
            actor_role = %actor.role,
            action = %request.action,
            previous_status = %previous_status,
            new_status = %invoice.status,
            "Transition applied"
        );

        let notifications =
            notify::transition(self.users.as_ref(), &invoice, decision.outcome, &routing).await;
        self.deliver(notifications.iter().cloned()).await;

        Ok(ActionOutcome {
            previous_status,
            new_status: invoice.status,
            routing,
            audit_entry: entry,
            notifications,
            invoice,
        })
    }

    /// On entry into finance review with no assigned finance user, run the
    /// resolver and persist the result -- or flag the invoice instead of
    /// guessing.
    async fn route_to_finance(&self, invoice: &mut Invoice) -> Result<RoutingOutcome, CoreError> {
        if invoice.status != InvoiceStatus::PendingFinanceReview {
            return Ok(RoutingOutcome::NotNeeded);
        }
        if let Some(finance_user) = invoice.assigned_finance_user {
            return Ok(RoutingOutcome::AlreadyAssigned { finance_user });
        }

        match self.resolver.resolve_for_invoice(invoice).await? {
            Resolution {
                finance_user: Some(finance_user),
                strategy,
            } => {
                invoice.assigned_finance_user = Some(finance_user);
                invoice.needs_manual_routing = false;
                Ok(RoutingOutcome::Resolved {
                    finance_user,
                    strategy,
                })
            }
            _ => {
                invoice.needs_manual_routing = true;
                tracing::warn!(
                    invoice_id = invoice.id,
                    "No finance user could be resolved; invoice flagged for manual routing"
                );
                Ok(RoutingOutcome::Unresolved)
            }
        }
    }

    /// Best-effort delivery: a transition never fails because notifying
    /// did.
    async fn deliver(&self, instructions: impl Iterator<Item = NotificationInstruction>) {
        for instruction in instructions {
            if let Err(err) = self.sink.deliver(instruction.clone()).await {
                tracing::warn!(
                    recipient_id = instruction.recipient_id,
                    category = %instruction.category,
                    error = %err,
                    "Notification delivery failed"
                );
            }
        }
    }
}

/// Whether the actor satisfies the PM assignment gate for this invoice.
fn pm_assignment_ok(actor: &User, invoice: &Invoice) -> bool {
    invoice.assigned_pm == Some(actor.id)
        || actor.assigned_projects.contains(&invoice.project_id)
}

/// Write the stage consequence into the approval records. The caller sets
/// `status` from the same decision immediately after -- the two never
/// change independently.
fn apply_outcome(
    invoice: &mut Invoice,
    outcome: TransitionOutcome,
    actor: &User,
    request: &ActionRequest,
) {
    use TransitionOutcome::*;

    let now = chrono::Utc::now();
    let decide = |state: ApprovalState| {
        ApprovalRecord::decide(state, actor.id, actor.role, now, request.notes.clone())
    };

    match outcome {
        IntakeAccepted => {}
        PmApproved => invoice.pm_approval = decide(ApprovalState::Approved),
        PmRejected => invoice.pm_approval = decide(ApprovalState::Rejected),
        PmInfoRequested => invoice.pm_approval = decide(ApprovalState::InfoRequested),
        FinanceApproved => invoice.finance_approval = decide(ApprovalState::Approved),
        FinanceRejected => invoice.finance_approval = decide(ApprovalState::Rejected),
        FinanceInfoRequested => invoice.finance_approval = decide(ApprovalState::InfoRequested),
        InfoResolved => {
            if invoice.finance_approval.status == ApprovalState::InfoRequested {
                invoice.finance_approval.reset();
            } else {
                invoice.pm_approval.reset();
            }
        }
        Resubmitted => {
            invoice.pm_approval.reset();
            if invoice.finance_approval.status == ApprovalState::InfoRequested {
                invoice.finance_approval.reset();
            }
        }
        SentBack | Restored => {
            invoice.pm_approval.reset();
            invoice.finance_approval.reset();
        }
    }
}
