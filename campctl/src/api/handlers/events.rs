//! Event endpoints, group-scoped like tents.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        events::{EventCreateRequest, EventListParams, EventResponse, EventUpdateRequest},
        groups::CurrentGroup,
    },
    db::{
        errors::DbError,
        handlers::{events::EventFilter, Events, Repository},
        models::events::{EventCreateDBRequest, EventUpdateDBRequest},
    },
    errors::Error,
    types::EventId,
    AppState,
};

fn event_not_found(id: EventId) -> Error {
    Error::NotFound {
        resource: "Event".to_string(),
        id: id.to_string(),
    }
}

/// List the group's events
#[utoipa::path(
    get,
    path = "/v2/events",
    params(EventListParams),
    tag = "events",
    responses(
        (status = 200, description = "Events owned by the group", body = [EventResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn list_events(
    State(state): State<AppState>,
    current: CurrentGroup,
    Query(params): Query<EventListParams>,
) -> Result<Json<Vec<EventResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let events = Events::new(&mut conn, current.id)
        .list(&EventFilter {
            event_type: params.event_type,
            ..Default::default()
        })
        .await?;

    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/v2/events",
    request_body = EventCreateRequest,
    tag = "events",
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn create_event(
    State(state): State<AppState>,
    current: CurrentGroup,
    Json(request): Json<EventCreateRequest>,
) -> Result<(StatusCode, Json<EventResponse>), Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let event = Events::new(&mut conn, current.id)
        .create(&EventCreateDBRequest {
            group_id: current.id,
            name: request.name,
            event_type: request.event_type,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            tent_ids: request.tent_ids,
            unit_ids: request.unit_ids,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// Get one event
#[utoipa::path(
    get,
    path = "/v2/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    tag = "events",
    responses(
        (status = 200, description = "The event", body = EventResponse),
        (status = 404, description = "Unknown id, or an event of another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, event_id = id))]
pub async fn get_event(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<EventId>,
) -> Result<Json<EventResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let event = Events::new(&mut conn, current.id)
        .get_by_id(id)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    Ok(Json(EventResponse::from(event)))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/v2/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    request_body = EventUpdateRequest,
    tag = "events",
    responses(
        (status = 200, description = "Updated event", body = EventResponse),
        (status = 404, description = "Unknown id, or an event of another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, event_id = id))]
pub async fn update_event(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<EventId>,
    Json(request): Json<EventUpdateRequest>,
) -> Result<Json<EventResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let event = Events::new(&mut conn, current.id)
        .update(
            id,
            &EventUpdateDBRequest {
                name: request.name,
                event_type: request.event_type,
                starts_at: request.starts_at,
                ends_at: request.ends_at,
                tent_ids: request.tent_ids,
                unit_ids: request.unit_ids,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => event_not_found(id),
            other => other.into(),
        })?;

    Ok(Json(EventResponse::from(event)))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/v2/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    tag = "events",
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Unknown id, or an event of another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, event_id = id))]
pub async fn delete_event(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<EventId>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Events::new(&mut conn, current.id).delete(id).await?;
    if !deleted {
        return Err(event_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}
