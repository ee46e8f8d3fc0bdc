//! Tent endpoints. Everything here is scoped to the authenticated group by
//! constructing the repository with the caller's group id.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        groups::CurrentGroup,
        tents::{TentCreateRequest, TentListParams, TentResponse, TentUpdateRequest},
    },
    db::{
        errors::DbError,
        handlers::{Repository, Tents},
        models::tents::{TentCreateDBRequest, TentUpdateDBRequest},
    },
    errors::Error,
    types::TentId,
    AppState,
};

fn tent_not_found(id: TentId) -> Error {
    Error::NotFound {
        resource: "Tent".to_string(),
        id: id.to_string(),
    }
}

/// List the group's tents
#[utoipa::path(
    get,
    path = "/v2/tents",
    params(TentListParams),
    tag = "tents",
    responses(
        (status = 200, description = "Tents owned by the group", body = [TentResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn list_tents(
    State(state): State<AppState>,
    current: CurrentGroup,
    Query(params): Query<TentListParams>,
) -> Result<Json<Vec<TentResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let tents = Tents::new(&mut conn, current.id)
        .list(&crate::db::handlers::tents::TentFilter {
            state: params.state,
            ..Default::default()
        })
        .await?;

    Ok(Json(tents.into_iter().map(TentResponse::from).collect()))
}

/// Register a new tent
#[utoipa::path(
    post,
    path = "/v2/tents",
    request_body = TentCreateRequest,
    tag = "tents",
    responses(
        (status = 201, description = "Tent created", body = TentResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn create_tent(
    State(state): State<AppState>,
    current: CurrentGroup,
    Json(request): Json<TentCreateRequest>,
) -> Result<(StatusCode, Json<TentResponse>), Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let tent = Tents::new(&mut conn, current.id)
        .create(&TentCreateDBRequest {
            group_id: current.id,
            name: request.name,
            state: request.state,
            remarks: request.remarks,
            capacity: request.capacity,
            tent_type: request.tent_type,
            colors: request.colors,
            integrated: request.integrated,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TentResponse::from(tent))))
}

/// Get one tent
#[utoipa::path(
    get,
    path = "/v2/tents/{id}",
    params(("id" = i32, Path, description = "Tent id")),
    tag = "tents",
    responses(
        (status = 200, description = "The tent", body = TentResponse),
        (status = 404, description = "Unknown id, or a tent of another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, tent_id = id))]
pub async fn get_tent(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<TentId>,
) -> Result<Json<TentResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let tent = Tents::new(&mut conn, current.id)
        .get_by_id(id)
        .await?
        .ok_or_else(|| tent_not_found(id))?;

    Ok(Json(TentResponse::from(tent)))
}

/// Update a tent
#[utoipa::path(
    put,
    path = "/v2/tents/{id}",
    params(("id" = i32, Path, description = "Tent id")),
    request_body = TentUpdateRequest,
    tag = "tents",
    responses(
        (status = 200, description = "Updated tent", body = TentResponse),
        (status = 404, description = "Unknown id, or a tent of another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, tent_id = id))]
pub async fn update_tent(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<TentId>,
    Json(request): Json<TentUpdateRequest>,
) -> Result<Json<TentResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let tent = Tents::new(&mut conn, current.id)
        .update(
            id,
            &TentUpdateDBRequest {
                name: request.name,
                state: request.state,
                remarks: request.remarks,
                capacity: request.capacity,
                tent_type: request.tent_type,
                colors: request.colors,
                integrated: request.integrated,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => tent_not_found(id),
            other => other.into(),
        })?;

    Ok(Json(TentResponse::from(tent)))
}

/// Delete a tent and its inspection history
#[utoipa::path(
    delete,
    path = "/v2/tents/{id}",
    params(("id" = i32, Path, description = "Tent id")),
    tag = "tents",
    responses(
        (status = 204, description = "Tent and its inspections deleted"),
        (status = 404, description = "Unknown id, or a tent of another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, tent_id = id))]
pub async fn delete_tent(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<TentId>,
) -> Result<StatusCode, Error> {
    // inspections and the tent go in one transaction
    let mut tx = state.db.begin().await.map_err(DbError::from)?;
    let deleted = Tents::new(&mut tx, current.id).delete(id).await?;
    if !deleted {
        return Err(tent_not_found(id));
    }
    tx.commit().await.map_err(DbError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
