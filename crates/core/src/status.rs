//! Invoice lifecycle statuses, per-stage approval states, and actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The seven workflow states an invoice moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Submitted,
    PendingPmApproval,
    PendingFinanceReview,
    MoreInfoNeeded,
    PmRejected,
    FinanceRejected,
    FinanceApproved,
}

/// All statuses, in pipeline order.
pub const ALL_STATUSES: &[InvoiceStatus] = &[
    InvoiceStatus::Submitted,
    InvoiceStatus::PendingPmApproval,
    InvoiceStatus::PendingFinanceReview,
    InvoiceStatus::MoreInfoNeeded,
    InvoiceStatus::PmRejected,
    InvoiceStatus::FinanceRejected,
    InvoiceStatus::FinanceApproved,
];

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Submitted => "SUBMITTED",
            InvoiceStatus::PendingPmApproval => "PENDING_PM_APPROVAL",
            InvoiceStatus::PendingFinanceReview => "PENDING_FINANCE_REVIEW",
            InvoiceStatus::MoreInfoNeeded => "MORE_INFO_NEEDED",
            InvoiceStatus::PmRejected => "PM_REJECTED",
            InvoiceStatus::FinanceRejected => "FINANCE_REJECTED",
            InvoiceStatus::FinanceApproved => "FINANCE_APPROVED",
        }
    }

    /// Terminal states admit no further transitions except Admin restore.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InvoiceStatus::PmRejected
                | InvoiceStatus::FinanceRejected
                | InvoiceStatus::FinanceApproved
        )
    }

    /// Only the two rejected terminals can be reopened; a finance-approved
    /// invoice is final.
    pub fn is_restorable(self) -> bool {
        matches!(
            self,
            InvoiceStatus::PmRejected | InvoiceStatus::FinanceRejected
        )
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-stage decision state inside an [`ApprovalRecord`](crate::approval::ApprovalRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
    InfoRequested,
}

impl ApprovalState {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalState::Pending => "PENDING",
            ApprovalState::Approved => "APPROVED",
            ApprovalState::Rejected => "REJECTED",
            ApprovalState::InfoRequested => "INFO_REQUESTED",
        }
    }
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The actions callers may request against an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceAction {
    Approve,
    Reject,
    RequestInfo,
    Resubmit,
    SendBack,
    Restore,
}

/// All actions.
pub const ALL_ACTIONS: &[InvoiceAction] = &[
    InvoiceAction::Approve,
    InvoiceAction::Reject,
    InvoiceAction::RequestInfo,
    InvoiceAction::Resubmit,
    InvoiceAction::SendBack,
    InvoiceAction::Restore,
];

impl InvoiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceAction::Approve => "APPROVE",
            InvoiceAction::Reject => "REJECT",
            InvoiceAction::RequestInfo => "REQUEST_INFO",
            InvoiceAction::Resubmit => "RESUBMIT",
            InvoiceAction::SendBack => "SEND_BACK",
            InvoiceAction::Restore => "RESTORE",
        }
    }
}

impl fmt::Display for InvoiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "approve" => Ok(InvoiceAction::Approve),
            "reject" => Ok(InvoiceAction::Reject),
            "requestinfo" => Ok(InvoiceAction::RequestInfo),
            "resubmit" => Ok(InvoiceAction::Resubmit),
            "sendback" => Ok(InvoiceAction::SendBack),
            "restore" => Ok(InvoiceAction::Restore),
            _ => Err(CoreError::Validation(format!(
                "Unknown action '{s}'. Must be one of: APPROVE, REJECT, REQUEST_INFO, RESUBMIT, SEND_BACK, RESTORE"
            ))),
        }
    }
}
