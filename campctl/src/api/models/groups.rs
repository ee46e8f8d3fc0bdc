//! API models for groups.

use crate::db::models::groups::GroupDBResponse;
use crate::types::GroupId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The authenticated group, resolved from the bearer token by the
/// `FromRequestParts` extractor in `auth::current_group`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentGroup {
    pub id: GroupId,
    pub userlogin: String,
    pub name: String,
    pub email: Option<String>,
    pub members: Option<Vec<String>>,
}

/// Registration payload. The password arrives in clear and is hashed before
/// it reaches the database layer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GroupCreateRequest {
    pub userlogin: String,
    pub password: String,
    pub name: String,
    pub email: Option<String>,
    pub members: Option<Vec<String>>,
}

/// Outward group representation. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub id: GroupId,
    pub userlogin: String,
    pub name: String,
    pub email: Option<String>,
    pub members: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupDBResponse> for GroupResponse {
    fn from(group: GroupDBResponse) -> Self {
        Self {
            id: group.id,
            userlogin: group.userlogin,
            name: group.name,
            email: group.email,
            members: group.members,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMembersRequest {
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNameRequest {
    pub name: String,
}
