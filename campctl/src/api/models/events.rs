//! API models for events.

use crate::db::models::events::EventDBResponse;
use crate::types::{EventId, GroupId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by the event list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EventListParams {
    pub event_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EventCreateRequest {
    pub name: String,
    pub event_type: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tent_ids: Option<Vec<i32>>,
    pub unit_ids: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventUpdateRequest {
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub tent_ids: Option<Vec<i32>>,
    pub unit_ids: Option<Vec<i32>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
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

impl From<EventDBResponse> for EventResponse {
    fn from(event: EventDBResponse) -> Self {
        Self {
            id: event.id,
            group_id: event.group_id,
            name: event.name,
            event_type: event.event_type,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            tent_ids: event.tent_ids,
            unit_ids: event.unit_ids,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}
