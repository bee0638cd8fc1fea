//! The declarative transition table and the pure transition evaluator.
//!
//! The table is immutable, process-wide configuration: built once via
//! [`TransitionTable::standard`] and injected into the workflow engine,
//! never referenced as an ambient global. Each rule names the states, the
//! action, the roles that may take the edge, and the *stage outcome* the
//! edge produces. The next status is computed from the outcome -- approval
//! records are the cause of a status change, the status is the consequence.
//!
//! [`TransitionTable::evaluate`] is a pure function over a
//! [`TransitionContext`]; it performs no I/O, so the full gating matrix is
//! testable without a store.

use crate::error::CoreError;
use crate::roles::Role;
use crate::status::{InvoiceAction, InvoiceStatus};

/// The stage consequence of taking a transition edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionOutcome {
    /// Admin accepted a raw submission into the PM queue.
    IntakeAccepted,
    /// The PM stage approved; the invoice moves to finance review.
    PmApproved,
    PmRejected,
    PmInfoRequested,
    FinanceApproved,
    FinanceRejected,
    FinanceInfoRequested,
    /// An info request was answered; the invoice returns to whichever
    /// stage issued the request.
    InfoResolved,
    /// The vendor resubmitted after an info request.
    Resubmitted,
    /// Finance sent the invoice back to the PM stage; both stages reset.
    SentBack,
    /// Admin reopened a rejected invoice; both stages reset.
    Restored,
}

/// One legal edge: state + action + eligible roles + outcome.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub from: InvoiceStatus,
    pub action: InvoiceAction,
    pub roles: &'static [Role],
    pub outcome: TransitionOutcome,
}

const PM_ONLY: &[Role] = &[Role::ProjectManager];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const PM_OR_ADMIN: &[Role] = &[Role::ProjectManager, Role::Admin];
const FINANCE_OR_ADMIN: &[Role] = &[Role::FinanceUser, Role::Admin];
const VENDOR_ONLY: &[Role] = &[Role::Vendor];

/// States in which a ProjectManager may act at all.
const PM_STATE_WINDOW: &[InvoiceStatus] = &[
    InvoiceStatus::Submitted,
    InvoiceStatus::PendingPmApproval,
    InvoiceStatus::MoreInfoNeeded,
];

/// Everything the evaluator needs to know about one attempted transition.
///
/// The caller (the workflow engine) derives this from the invoice and the
/// actor; the evaluator itself never touches a store.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub status: InvoiceStatus,
    pub action: InvoiceAction,
    pub actor_role: Role,
    /// Whether the actor is the invoice's assigned PM or has the invoice's
    /// project among their assigned projects. Only consulted for
    /// ProjectManager actors.
    pub pm_assignment_ok: bool,
    /// Whether the PM stage currently reads Approved.
    pub pm_approved: bool,
    /// Whether the finance stage currently reads InfoRequested (decides
    /// the MORE_INFO_NEEDED return destination).
    pub finance_requested_info: bool,
}

/// A validated transition: the edge's outcome and the status it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDecision {
    pub outcome: TransitionOutcome,
    pub next_status: InvoiceStatus,
}

/// The declarative map of legal moves.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: Vec<TransitionRule>,
}

impl TransitionTable {
    /// The standard invoice approval pipeline.
    ///
    /// Admin edges are explicit rather than a generic advance: from
    /// `Submitted`, an Admin's approval is intake into the PM queue, while
    /// the assigned PM's approval *is* the PM approval and moves the
    /// invoice straight to finance review.
    pub fn standard() -> Self {
        use InvoiceAction::*;
        use InvoiceStatus::*;
        use TransitionOutcome::*;

        let rules = vec![
            rule(Submitted, Approve, PM_ONLY, PmApproved),
            rule(Submitted, Approve, ADMIN_ONLY, IntakeAccepted),
            rule(Submitted, Reject, PM_OR_ADMIN, TransitionOutcome::PmRejected),
            rule(Submitted, RequestInfo, PM_OR_ADMIN, PmInfoRequested),
            rule(PendingPmApproval, Approve, PM_OR_ADMIN, PmApproved),
            rule(PendingPmApproval, Reject, PM_OR_ADMIN, TransitionOutcome::PmRejected),
            rule(PendingPmApproval, RequestInfo, PM_OR_ADMIN, PmInfoRequested),
            rule(PendingFinanceReview, Approve, FINANCE_OR_ADMIN, TransitionOutcome::FinanceApproved),
            rule(PendingFinanceReview, Reject, FINANCE_OR_ADMIN, TransitionOutcome::FinanceRejected),
            rule(
                PendingFinanceReview,
                RequestInfo,
                FINANCE_OR_ADMIN,
                FinanceInfoRequested,
            ),
            rule(PendingFinanceReview, SendBack, FINANCE_OR_ADMIN, SentBack),
            rule(MoreInfoNeeded, Approve, PM_OR_ADMIN, InfoResolved),
            rule(MoreInfoNeeded, Reject, PM_OR_ADMIN, TransitionOutcome::PmRejected),
            rule(MoreInfoNeeded, RequestInfo, PM_OR_ADMIN, PmInfoRequested),
            rule(MoreInfoNeeded, Resubmit, VENDOR_ONLY, Resubmitted),
            rule(InvoiceStatus::PmRejected, Restore, ADMIN_ONLY, Restored),
            rule(InvoiceStatus::FinanceRejected, Restore, ADMIN_ONLY, Restored),
        ];

        Self { rules }
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// Whether `role` may invoke `action` in *any* state. Distinguishes
    /// `Unauthorized` (never) from `InvalidTransition` (not here).
    pub fn action_available_to_role(&self, role: Role, action: InvoiceAction) -> bool {
        self.rules
            .iter()
            .any(|r| r.action == action && r.roles.contains(&role))
    }

    fn find_rule(
        &self,
        from: InvoiceStatus,
        action: InvoiceAction,
        role: Role,
    ) -> Option<&TransitionRule> {
        self.rules
            .iter()
            .find(|r| r.from == from && r.action == action && r.roles.contains(&role))
    }

    /// Validate one attempted transition and compute its consequence.
    ///
    /// Gating order: role capability, role state-window and PM assignment,
    /// the finance precondition, then the table itself. The error kinds are
    /// part of the contract -- `Unauthorized` (wrong role entirely),
    /// `Forbidden` (right role, not your invoice), `InvalidTransition`
    /// (right role, wrong state).
    pub fn evaluate(&self, ctx: &TransitionContext) -> Result<TransitionDecision, CoreError> {
        if !self.action_available_to_role(ctx.actor_role, ctx.action) {
            return Err(CoreError::Unauthorized(format!(
                "{} users may not {} invoices",
                ctx.actor_role, ctx.action
            )));
        }

        match ctx.actor_role {
            Role::ProjectManager => {
                if !PM_STATE_WINDOW.contains(&ctx.status) {
                    return Err(invalid(ctx, "the invoice is outside the PM review stage"));
                }
                if !ctx.pm_assignment_ok {
                    return Err(CoreError::Forbidden(
                        "project managers may only act on invoices assigned to them or to one of their projects"
                            .into(),
                    ));
                }
            }
            Role::FinanceUser => {
                if ctx.status != InvoiceStatus::PendingFinanceReview {
                    return Err(invalid(ctx, "the invoice is not in finance review"));
                }
                if !ctx.pm_approved {
                    return Err(invalid(
                        ctx,
                        "finance may not act before the PM stage has approved",
                    ));
                }
            }
            Role::Vendor => {
                if ctx.status != InvoiceStatus::MoreInfoNeeded {
                    return Err(invalid(
                        ctx,
                        "resubmission is only possible after an info request",
                    ));
                }
            }
            Role::Admin => {}
        }

        let rule = self
            .find_rule(ctx.status, ctx.action, ctx.actor_role)
            .ok_or_else(|| invalid(ctx, "no such transition is defined"))?;

        // The PM stage must have approved before anything decides the
        // finance stage, regardless of who is acting. Guards the
        // data-corruption case where status and approval records drift.
        if matches!(
            rule.outcome,
            TransitionOutcome::FinanceApproved
                | TransitionOutcome::FinanceRejected
                | TransitionOutcome::FinanceInfoRequested
        ) && !ctx.pm_approved
        {
            return Err(invalid(
                ctx,
                "finance may not act before the PM stage has approved",
            ));
        }

        Ok(TransitionDecision {
            outcome: rule.outcome,
            next_status: next_status(rule.outcome, ctx),
        })
    }
}

fn rule(
    from: InvoiceStatus,
    action: InvoiceAction,
    roles: &'static [Role],
    outcome: TransitionOutcome,
) -> TransitionRule {
    TransitionRule {
        from,
        action,
        roles,
        outcome,
    }
}

fn invalid(ctx: &TransitionContext, reason: &str) -> CoreError {
    CoreError::InvalidTransition {
        status: ctx.status,
        action: ctx.action,
        reason: reason.into(),
    }
}

/// The status each outcome produces. The info-request return edge resolves
/// against which stage issued the request.
fn next_status(outcome: TransitionOutcome, ctx: &TransitionContext) -> InvoiceStatus {
    use TransitionOutcome::*;

    match outcome {
        IntakeAccepted | Resubmitted | SentBack | Restored => InvoiceStatus::PendingPmApproval,
        PmApproved => InvoiceStatus::PendingFinanceReview,
        PmRejected => InvoiceStatus::PmRejected,
        PmInfoRequested | FinanceInfoRequested => InvoiceStatus::MoreInfoNeeded,
        FinanceApproved => InvoiceStatus::FinanceApproved,
        FinanceRejected => InvoiceStatus::FinanceRejected,
        InfoResolved => {
            if ctx.finance_requested_info {
                InvoiceStatus::PendingFinanceReview
            } else {
                InvoiceStatus::PendingPmApproval
            }
        }
    }
}
