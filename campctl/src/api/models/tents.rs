//! API models for tents.
//!
//! Create and update payloads carry no group field at all; ownership is
//! stamped server-side from the authenticated group.

use crate::db::models::tents::TentDBResponse;
use crate::types::{GroupId, TentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by the tent list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TentListParams {
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TentCreateRequest {
    pub name: String,
    pub state: String,
    pub remarks: Option<String>,
    pub capacity: Option<i32>,
    pub tent_type: Option<String>,
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub integrated: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TentUpdateRequest {
    pub name: Option<String>,
    pub state: Option<String>,
    pub remarks: Option<String>,
    pub capacity: Option<i32>,
    pub tent_type: Option<String>,
    pub colors: Option<Vec<String>>,
    pub integrated: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TentResponse {
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

impl From<TentDBResponse> for TentResponse {
    fn from(tent: TentDBResponse) -> Self {
        Self {
            id: tent.id,
            group_id: tent.group_id,
            name: tent.name,
            state: tent.state,
            remarks: tent.remarks,
            capacity: tent.capacity,
            tent_type: tent.tent_type,
            colors: tent.colors,
            integrated: tent.integrated,
            created_at: tent.created_at,
            updated_at: tent.updated_at,
        }
    }
}
