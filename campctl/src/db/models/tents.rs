//! Database models for tents.

use crate::types::{GroupId, TentId};
use chrono::{DateTime, Utc};

/// Database request for creating a tent.
///
/// `group_id` is always filled in by the handler from the authenticated
/// group, never from client input.
#[derive(Debug, Clone)]
pub struct TentCreateDBRequest {
    pub group_id: GroupId,
    pub name: String,
    pub state: String,
    pub remarks: Option<String>,
    pub capacity: Option<i32>,
    pub tent_type: Option<String>,
    pub colors: Option<Vec<String>>,
    pub integrated: bool,
}

/// Database request for updating a tent. The owning group is not part of
/// the update surface: a tent can never change hands.
#[derive(Debug, Clone, Default)]
pub struct TentUpdateDBRequest {
    pub name: Option<String>,
    pub state: Option<String>,
    pub remarks: Option<String>,
    pub capacity: Option<i32>,
    pub tent_type: Option<String>,
    pub colors: Option<Vec<String>>,
    pub integrated: Option<bool>,
}

/// Database response for a tent
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TentDBResponse {
    pub id: TentId,
    pub group_id: GroupId,
    pub name: String,
    pub state: String,
    pub remarks: Option<String>,
    pub capacity: Option<i32>,
    pub tent_type: Option<String>,
    pub colors: Option<Vec<String>>,
    pub integrated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
