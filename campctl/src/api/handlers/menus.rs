//! Menu catalog and event-menu schedule endpoints.
//!
//! Authentication is required but rows are shared across groups; the
//! extractor still runs so anonymous callers get 401.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        groups::CurrentGroup,
        menus::{
            validate_ingredients, EventMenuCreateRequest, EventMenuListParams, EventMenuResponse,
            EventMenuUpdateRequest, MenuCreateRequest, MenuListParams, MenuResponse, MenuUpdateRequest,
        },
    },
    db::{
        errors::DbError,
        handlers::{
            menus::{EventMenuFilter, MenuFilter},
            EventMenus, Menus, Repository,
        },
        models::menus::{
            EventMenuCreateDBRequest, EventMenuUpdateDBRequest, MenuCreateDBRequest, MenuUpdateDBRequest,
        },
    },
    errors::Error,
    types::{EventMenuId, MenuId},
    AppState,
};

fn menu_not_found(id: MenuId) -> Error {
    Error::NotFound {
        resource: "Menu".to_string(),
        id: id.to_string(),
    }
}

fn event_menu_not_found(id: EventMenuId) -> Error {
    Error::NotFound {
        resource: "Event menu".to_string(),
        id: id.to_string(),
    }
}

/// List menus
#[utoipa::path(
    get,
    path = "/v2/menus",
    params(MenuListParams),
    tag = "menus",
    responses(
        (status = 200, description = "Menu catalog", body = [MenuResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_menus(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Query(params): Query<MenuListParams>,
) -> Result<Json<Vec<MenuResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let menus = Menus::new(&mut conn)
        .list(&MenuFilter {
            search: params.search,
            tag: params.tag,
            ..Default::default()
        })
        .await?;

    Ok(Json(menus.into_iter().map(MenuResponse::from).collect()))
}

/// Add a menu to the catalog
#[utoipa::path(
    post,
    path = "/v2/menus",
    request_body = MenuCreateRequest,
    tag = "menus",
    responses(
        (status = 201, description = "Menu created", body = MenuResponse),
        (status = 400, description = "Malformed ingredient list"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Json(request): Json<MenuCreateRequest>,
) -> Result<(StatusCode, Json<MenuResponse>), Error> {
    validate_ingredients(&request.ingredients)?;

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let menu = Menus::new(&mut conn)
        .create(&MenuCreateDBRequest {
            title: request.title,
            instructions: request.instructions,
            ingredients: request.ingredients,
            allergens: request.allergens,
            tags: request.tags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MenuResponse::from(menu))))
}

/// Get one menu
#[utoipa::path(
    get,
    path = "/v2/menus/{id}",
    params(("id" = i32, Path, description = "Menu id")),
    tag = "menus",
    responses(
        (status = 200, description = "The menu", body = MenuResponse),
        (status = 404, description = "Unknown id"),
    )
)]
#[tracing::instrument(skip_all, fields(menu_id = id))]
pub async fn get_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Path(id): Path<MenuId>,
) -> Result<Json<MenuResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let menu = Menus::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| menu_not_found(id))?;

    Ok(Json(MenuResponse::from(menu)))
}

/// Update a menu
#[utoipa::path(
    put,
    path = "/v2/menus/{id}",
    params(("id" = i32, Path, description = "Menu id")),
    request_body = MenuUpdateRequest,
    tag = "menus",
    responses(
        (status = 200, description = "Updated menu", body = MenuResponse),
        (status = 400, description = "Malformed ingredient list"),
        (status = 404, description = "Unknown id"),
    )
)]
#[tracing::instrument(skip_all, fields(menu_id = id))]
pub async fn update_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Path(id): Path<MenuId>,
    Json(request): Json<MenuUpdateRequest>,
) -> Result<Json<MenuResponse>, Error> {
    if let Some(ref ingredients) = request.ingredients {
        validate_ingredients(ingredients)?;
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let menu = Menus::new(&mut conn)
        .update(
            id,
            &MenuUpdateDBRequest {
                title: request.title,
                instructions: request.instructions,
                ingredients: request.ingredients,
                allergens: request.allergens,
                tags: request.tags,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => menu_not_found(id),
            other => other.into(),
        })?;

    Ok(Json(MenuResponse::from(menu)))
}

/// Delete a menu
#[utoipa::path(
    delete,
    path = "/v2/menus/{id}",
    params(("id" = i32, Path, description = "Menu id")),
    tag = "menus",
    responses(
        (status = 204, description = "Menu deleted"),
        (status = 404, description = "Unknown id"),
    )
)]
#[tracing::instrument(skip_all, fields(menu_id = id))]
pub async fn delete_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Path(id): Path<MenuId>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Menus::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(menu_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List the menu schedule of an event
#[utoipa::path(
    get,
    path = "/v2/event-menus",
    params(EventMenuListParams),
    tag = "event-menus",
    responses(
        (status = 200, description = "Scheduled menus for the event", body = [EventMenuResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(event_id = params.event_id))]
pub async fn list_event_menus(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Query(params): Query<EventMenuListParams>,
) -> Result<Json<Vec<EventMenuResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let rows = EventMenus::new(&mut conn)
        .list(&EventMenuFilter {
            served_on: params.served_on,
            ..EventMenuFilter::for_event(params.event_id)
        })
        .await?;

    Ok(Json(rows.into_iter().map(EventMenuResponse::from).collect()))
}

/// Schedule a menu for an event
#[utoipa::path(
    post,
    path = "/v2/event-menus",
    request_body = EventMenuCreateRequest,
    tag = "event-menus",
    responses(
        (status = 201, description = "Menu scheduled", body = EventMenuResponse),
        (status = 400, description = "Unknown event or menu reference"),
    )
)]
#[tracing::instrument(skip_all, fields(event_id = request.event_id, menu_id = request.menu_id))]
pub async fn create_event_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Json(request): Json<EventMenuCreateRequest>,
) -> Result<(StatusCode, Json<EventMenuResponse>), Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let row = EventMenus::new(&mut conn)
        .create(&EventMenuCreateDBRequest {
            event_id: request.event_id,
            menu_id: request.menu_id,
            served_on: request.served_on,
            meal_type: request.meal_type,
            headcount: request.headcount,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(EventMenuResponse::from(row))))
}

/// Get one schedule entry
#[utoipa::path(
    get,
    path = "/v2/event-menus/{id}",
    params(("id" = i32, Path, description = "Schedule entry id")),
    tag = "event-menus",
    responses(
        (status = 200, description = "The schedule entry", body = EventMenuResponse),
        (status = 404, description = "Unknown id"),
    )
)]
#[tracing::instrument(skip_all, fields(event_menu_id = id))]
pub async fn get_event_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Path(id): Path<EventMenuId>,
) -> Result<Json<EventMenuResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let row = EventMenus::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| event_menu_not_found(id))?;

    Ok(Json(EventMenuResponse::from(row)))
}

/// Update a schedule entry
#[utoipa::path(
    put,
    path = "/v2/event-menus/{id}",
    params(("id" = i32, Path, description = "Schedule entry id")),
    request_body = EventMenuUpdateRequest,
    tag = "event-menus",
    responses(
        (status = 200, description = "Updated schedule entry", body = EventMenuResponse),
        (status = 404, description = "Unknown id"),
    )
)]
#[tracing::instrument(skip_all, fields(event_menu_id = id))]
pub async fn update_event_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Path(id): Path<EventMenuId>,
    Json(request): Json<EventMenuUpdateRequest>,
) -> Result<Json<EventMenuResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let row = EventMenus::new(&mut conn)
        .update(
            id,
            &EventMenuUpdateDBRequest {
                served_on: request.served_on,
                meal_type: request.meal_type,
                headcount: request.headcount,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => event_menu_not_found(id),
            other => other.into(),
        })?;

    Ok(Json(EventMenuResponse::from(row)))
}

/// Remove a schedule entry
#[utoipa::path(
    delete,
    path = "/v2/event-menus/{id}",
    params(("id" = i32, Path, description = "Schedule entry id")),
    tag = "event-menus",
    responses(
        (status = 204, description = "Schedule entry deleted"),
        (status = 404, description = "Unknown id"),
    )
)]
#[tracing::instrument(skip_all, fields(event_menu_id = id))]
pub async fn delete_event_menu(
    State(state): State<AppState>,
    _current: CurrentGroup,
    Path(id): Path<EventMenuId>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = EventMenus::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(event_menu_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}
