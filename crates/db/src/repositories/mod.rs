//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod group_repo;
pub mod user_repo;
pub mod validate_rule_repo;

pub use group_repo::GroupRepo;
pub use user_repo::UserRepo;
pub use validate_rule_repo::ValidateRuleRepo;
