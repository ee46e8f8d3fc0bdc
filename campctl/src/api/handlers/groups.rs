//! Self-service profile endpoints. The acting group always comes from the
//! bearer token; no id is ever taken from the client.

use axum::{extract::State, Json};

use crate::{
    api::models::groups::{CurrentGroup, GroupResponse, UpdateEmailRequest, UpdateMembersRequest, UpdateNameRequest},
    db::{
        errors::DbError,
        handlers::Groups,
        models::groups::GroupUpdateDBRequest,
    },
    errors::Error,
    AppState,
};

/// Get the authenticated group's profile
#[utoipa::path(
    get,
    path = "/v2/groups/me",
    tag = "groups",
    responses(
        (status = 200, description = "Current group", body = GroupResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn me(State(state): State<AppState>, current: CurrentGroup) -> Result<Json<GroupResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let group = Groups::new(&mut conn)
        .get_by_id(current.id)
        .await?
        .ok_or(Error::Unauthenticated { message: None })?;

    Ok(Json(GroupResponse::from(group)))
}

/// Change the group's contact email
#[utoipa::path(
    patch,
    path = "/v2/groups/me/email",
    request_body = UpdateEmailRequest,
    tag = "groups",
    responses(
        (status = 200, description = "Email updated", body = GroupResponse),
        (status = 400, description = "Email already used by another group"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn update_email(
    State(state): State<AppState>,
    current: CurrentGroup,
    Json(request): Json<UpdateEmailRequest>,
) -> Result<Json<GroupResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;
    let mut groups = Groups::new(&mut tx);

    if groups.email_taken_by_other(&request.email, current.id).await? {
        return Err(Error::BadRequest {
            message: "This email address is already in use".to_string(),
        });
    }

    let updated = groups
        .update(
            current.id,
            &GroupUpdateDBRequest {
                email: Some(request.email),
                ..Default::default()
            },
        )
        .await?;

    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(GroupResponse::from(updated)))
}

/// Replace the group's member roster
#[utoipa::path(
    patch,
    path = "/v2/groups/me/members",
    request_body = UpdateMembersRequest,
    tag = "groups",
    responses(
        (status = 200, description = "Members updated", body = GroupResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn update_members(
    State(state): State<AppState>,
    current: CurrentGroup,
    Json(request): Json<UpdateMembersRequest>,
) -> Result<Json<GroupResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let updated = Groups::new(&mut conn)
        .update(
            current.id,
            &GroupUpdateDBRequest {
                members: Some(request.members),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(GroupResponse::from(updated)))
}

/// Rename the group
#[utoipa::path(
    patch,
    path = "/v2/groups/me/name",
    request_body = UpdateNameRequest,
    tag = "groups",
    responses(
        (status = 200, description = "Name updated", body = GroupResponse),
        (status = 400, description = "Empty name"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn update_name(
    State(state): State<AppState>,
    current: CurrentGroup,
    Json(request): Json<UpdateNameRequest>,
) -> Result<Json<GroupResponse>, Error> {
    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "name must not be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let updated = Groups::new(&mut conn)
        .update(
            current.id,
            &GroupUpdateDBRequest {
                name: Some(request.name),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(GroupResponse::from(updated)))
}
