//! Notification instructions emitted alongside successful transitions.
//!
//! These are directives for the external dispatcher, not core state: the
//! engine produces them, a sink consumes them, and delivery failures never
//! fail a transition.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Known notification categories.
pub mod categories {
    pub const APPROVAL: &str = "approval";
    pub const REJECTION: &str = "rejection";
    pub const INFO_REQUEST: &str = "info_request";
    pub const STATUS: &str = "status";
    /// Finance-user resolution failed; operators must assign manually.
    pub const ROUTING: &str = "routing";
}

/// All valid notification categories.
pub const VALID_CATEGORIES: &[&str] = &[
    categories::APPROVAL,
    categories::REJECTION,
    categories::INFO_REQUEST,
    categories::STATUS,
    categories::ROUTING,
];

/// A single fire-and-forget instruction for the external dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationInstruction {
    pub recipient_id: DbId,
    pub subject: String,
    pub body: String,
    pub category: String,
}

impl NotificationInstruction {
    pub fn new(
        recipient_id: DbId,
        category: &str,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id,
            subject: subject.into(),
            body: body.into(),
            category: category.to_string(),
        }
    }
}
