//! Database models for groups (the tenant/principal entity).

use crate::types::GroupId;
use chrono::{DateTime, Utc};

/// Database request for creating a new group
#[derive(Debug, Clone)]
pub struct GroupCreateDBRequest {
    pub userlogin: String,
    pub password_hash: String,
    pub name: String,
    pub email: Option<String>,
    pub members: Option<Vec<String>>,
}

/// Database request for updating a group's self-service profile fields.
/// Only `Some` fields are applied; the login and password hash are not
/// mutable through this path.
#[derive(Debug, Clone, Default)]
pub struct GroupUpdateDBRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub members: Option<Vec<String>>,
}

/// Database response for a group
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupDBResponse {
    pub id: GroupId,
    pub userlogin: String,
    pub password_hash: String,
    pub name: String,
    pub email: Option<String>,
    pub members: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
