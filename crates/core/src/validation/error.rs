//! Engine fault types.
//!
//! Broken rules on submitted data are never errors; they are collected in a
//! [`ValidationResult`](super::ValidationResult). The types here cover the
//! two conditions that abort a check: a rule set that cannot be evaluated,
//! and a backing store that failed to answer.

/// Error raised by a [`RuleCatalog`](super::RuleCatalog) or
/// [`RecordStore`](super::RecordStore) implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule set references something that does not exist or cannot be
    /// evaluated (unknown `matches` target, `unique_update` without an id,
    /// malformed pattern).
    #[error("Invalid rule for field '{field}': {reason}")]
    Configuration { field: String, reason: String },

    /// The catalog or record store failed during a lookup.
    #[error("Rule store error: {0}")]
    Store(#[source] StoreError),
}

impl RuleError {
    pub(crate) fn configuration(field: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
