//! API models for tent inspections.

use crate::db::models::inspections::InspectionDBResponse;
use crate::types::{InspectionId, TentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct InspectionCreateRequest {
    pub tent_id: TentId,
    pub user_id: UserId,
    pub inspected_at: Option<DateTime<Utc>>,
    /// Open string-keyed checklist; replaced wholesale on update.
    #[serde(default)]
    pub checklist: serde_json::Value,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InspectionUpdateRequest {
    pub tent_id: Option<TentId>,
    pub user_id: Option<UserId>,
    pub inspected_at: Option<DateTime<Utc>>,
    pub checklist: Option<serde_json::Value>,
    pub remarks: Option<String>,
}

/// Query parameters accepted by the inspection list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct InspectionListParams {
    pub tent_id: Option<TentId>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InspectionResponse {
    pub id: InspectionId,
    pub tent_id: TentId,
    pub user_id: UserId,
    pub inspected_at: DateTime<Utc>,
    pub checklist: serde_json::Value,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InspectionDBResponse> for InspectionResponse {
    fn from(inspection: InspectionDBResponse) -> Self {
        Self {
            id: inspection.id,
            tent_id: inspection.tent_id,
            user_id: inspection.user_id,
            inspected_at: inspection.inspected_at,
            checklist: inspection.checklist,
            remarks: inspection.remarks,
            created_at: inspection.created_at,
            updated_at: inspection.updated_at,
        }
    }
}
