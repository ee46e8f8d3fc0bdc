//! Database models for tent inspections.
//!
//! The checklist is an open string-keyed JSON map; ownership is transitive
//! through the referenced tent.

use crate::types::{InspectionId, TentId, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct InspectionCreateDBRequest {
    pub tent_id: TentId,
    pub user_id: UserId,
    pub inspected_at: Option<DateTime<Utc>>,
    pub checklist: serde_json::Value,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InspectionUpdateDBRequest {
    pub tent_id: Option<TentId>,
    pub user_id: Option<UserId>,
    pub inspected_at: Option<DateTime<Utc>>,
    pub checklist: Option<serde_json::Value>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InspectionDBResponse {
    pub id: InspectionId,
    pub tent_id: TentId,
    pub user_id: UserId,
    pub inspected_at: DateTime<Utc>,
    pub checklist: serde_json::Value,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
