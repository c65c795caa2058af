//! Record store collaborator used by uniqueness checks.

use std::future::Future;

use super::error::StoreError;
use crate::types::DbId;

/// Read-only duplicate lookups against the application's tables.
///
/// `table` and `column` come from rule definitions, `value` from sanitized
/// user input. Implementations decide comparison semantics (the PostgreSQL
/// store compares with `=`, i.e. case-sensitively).
pub trait RecordStore: Send + Sync {
    /// Count rows in `table` whose `column` equals `value`.
    fn count_matching(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Count rows in `table` other than `exclude_id` whose `column` equals `value`.
    fn count_matching_excluding(
        &self,
        table: &str,
        exclude_id: DbId,
        column: &str,
        value: &str,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;
}
