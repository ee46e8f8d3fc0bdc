//! Database models for events.

use crate::types::{EventId, GroupId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct EventCreateDBRequest {
    pub group_id: GroupId,
    pub name: String,
    pub event_type: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tent_ids: Option<Vec<i32>>,
    pub unit_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default)]
pub struct EventUpdateDBRequest {
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tent_ids: Option<Vec<i32>>,
    pub unit_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventDBResponse {
    pub id: EventId,
    pub group_id: GroupId,
    pub name: String,
    pub event_type: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tent_ids: Option<Vec<i32>>,
    pub unit_ids: Option<Vec<i32>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
