//! Append-only audit trail entries with integrity-hash chaining.
//!
//! Every applied transition appends exactly one entry. Entries are never
//! edited or removed; insertion order is the canonical history. Each entry
//! carries a SHA-256 hash over the previous entry's hash plus its own
//! canonical content, so tampering anywhere in the trail is detectable.

use serde::{Deserialize, Serialize};

use crate::hashing;
use crate::roles::Role;
use crate::status::{InvoiceAction, InvoiceStatus};
use crate::types::{DbId, Timestamp};

/// Known seed value for the first entry in a hash chain.
const CHAIN_SEED: &str = "INVOICE_AUDIT_CHAIN_SEED_V1";

/// One immutable record of an applied transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: InvoiceAction,
    /// Display name of the acting user at the time of the action.
    pub actor: String,
    pub actor_id: DbId,
    pub actor_role: Role,
    pub timestamp: Timestamp,
    pub previous_status: InvoiceStatus,
    pub new_status: InvoiceStatus,
    pub notes: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub integrity_hash: String,
}

/// Request provenance captured into each audit entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditEntry {
    /// Build an entry chained onto `prev_hash` (`None` for the first entry).
    #[allow(clippy::too_many_arguments)]
    pub fn chained(
        prev_hash: Option<&str>,
        action: InvoiceAction,
        actor: String,
        actor_id: DbId,
        actor_role: Role,
        timestamp: Timestamp,
        previous_status: InvoiceStatus,
        new_status: InvoiceStatus,
        notes: Option<String>,
        provenance: Provenance,
    ) -> Self {
        let mut entry = Self {
            action,
            actor,
            actor_id,
            actor_role,
            timestamp,
            previous_status,
            new_status,
            notes,
            ip_address: provenance.ip_address,
            user_agent: provenance.user_agent,
            integrity_hash: String::new(),
        };
        entry.integrity_hash = compute_integrity_hash(prev_hash, &entry.canonical_data());
        entry
    }

    /// Canonical string representation of the entry's content, excluding
    /// the hash itself. Input to the chain computation.
    fn canonical_data(&self) -> String {
        serde_json::json!({
            "action": self.action,
            "actor_id": self.actor_id,
            "actor_role": self.actor_role,
            "timestamp": self.timestamp.to_rfc3339(),
            "previous_status": self.previous_status,
            "new_status": self.new_status,
            "notes": self.notes,
        })
        .to_string()
    }
}

/// Compute the integrity hash for an entry given the previous entry's hash
/// (or the chain seed for the first entry) and the entry's canonical data.
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let prev = prev_hash.unwrap_or(CHAIN_SEED);
    let combined = format!("{prev}|{entry_data}");
    hashing::sha256_hex(combined.as_bytes())
}

/// Result of walking a trail's integrity chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainCheck {
    /// Number of entries verified before stopping.
    pub verified_entries: usize,
    /// Whether the entire chain is intact.
    pub chain_valid: bool,
    /// Zero-based index of the first entry where the chain breaks, if any.
    pub first_break: Option<usize>,
}

/// Verify a trail's hash chain, oldest entry first.
pub fn verify_chain(trail: &[AuditEntry]) -> ChainCheck {
    let mut prev: Option<&str> = None;
    for (index, entry) in trail.iter().enumerate() {
        let expected = compute_integrity_hash(prev, &entry.canonical_data());
        if entry.integrity_hash != expected {
            return ChainCheck {
                verified_entries: index,
                chain_valid: false,
                first_break: Some(index),
            };
        }
        prev = Some(entry.integrity_hash.as_str());
    }
    ChainCheck {
        verified_entries: trail.len(),
        chain_valid: true,
        first_break: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prev: Option<&str>, notes: &str) -> AuditEntry {
        AuditEntry::chained(
            prev,
            InvoiceAction::Approve,
            "Alice".into(),
            1,
            Role::ProjectManager,
            chrono::Utc::now(),
            InvoiceStatus::Submitted,
            InvoiceStatus::PendingFinanceReview,
            Some(notes.into()),
            Provenance::default(),
        )
    }

    #[test]
    fn first_entry_uses_seed() {
        let e = entry(None, "first");
        assert_eq!(e.integrity_hash.len(), 64);
    }

    #[test]
    fn chained_entries_differ() {
        let first = entry(None, "first");
        let second = entry(Some(&first.integrity_hash), "second");
        assert_ne!(first.integrity_hash, second.integrity_hash);
    }

    #[test]
    fn intact_chain_verifies() {
        let first = entry(None, "first");
        let second = entry(Some(&first.integrity_hash), "second");
        let third = entry(Some(&second.integrity_hash), "third");
        let check = verify_chain(&[first, second, third]);
        assert!(check.chain_valid);
        assert_eq!(check.verified_entries, 3);
        assert_eq!(check.first_break, None);
    }

    #[test]
    fn tampered_entry_is_detected() {
        let first = entry(None, "first");
        let mut second = entry(Some(&first.integrity_hash), "second");
        second.notes = Some("edited after the fact".into());
        let third = entry(Some(&second.integrity_hash), "third");
        let check = verify_chain(&[first, second, third]);
        assert!(!check.chain_valid);
        assert_eq!(check.first_break, Some(1));
        assert_eq!(check.verified_entries, 1);
    }

    #[test]
    fn empty_trail_is_valid() {
        let check = verify_chain(&[]);
        assert!(check.chain_valid);
        assert_eq!(check.verified_entries, 0);
    }
}
