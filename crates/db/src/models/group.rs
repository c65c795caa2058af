//! Group entity model and DTOs.

use roster_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub short_name: String,
    pub grouptype_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub short_name: String,
    pub grouptype_id: Option<DbId>,
}

/// DTO for updating a group. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub grouptype_id: Option<DbId>,
}
