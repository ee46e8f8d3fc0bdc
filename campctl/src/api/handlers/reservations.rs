//! Reservation endpoints. Ownership is transitive through the tent, so
//! creating or re-pointing a reservation first checks that the referenced
//! tent belongs to the caller.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        groups::CurrentGroup,
        reservations::{ReservationCreateRequest, ReservationListParams, ReservationResponse, ReservationUpdateRequest},
    },
    db::{
        errors::DbError,
        handlers::{reservations::ReservationFilter, Repository, Reservations, Tents},
        models::reservations::{ReservationCreateDBRequest, ReservationUpdateDBRequest},
    },
    errors::Error,
    types::ReservationId,
    AppState,
};

fn reservation_not_found(id: ReservationId) -> Error {
    Error::NotFound {
        resource: "Reservation".to_string(),
        id: id.to_string(),
    }
}

fn foreign_tent() -> Error {
    Error::Forbidden {
        resource: "tent".to_string(),
    }
}

/// List reservations for the group's tents
#[utoipa::path(
    get,
    path = "/v2/reservations",
    params(ReservationListParams),
    tag = "reservations",
    responses(
        (status = 200, description = "Reservations on the group's tents", body = [ReservationResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn list_reservations(
    State(state): State<AppState>,
    current: CurrentGroup,
    Query(params): Query<ReservationListParams>,
) -> Result<Json<Vec<ReservationResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let reservations = Reservations::new(&mut conn, current.id)
        .list(&ReservationFilter {
            tent_id: params.tent_id,
            event_id: params.event_id,
            ..Default::default()
        })
        .await?;

    Ok(Json(reservations.into_iter().map(ReservationResponse::from).collect()))
}

/// Reserve a tent for an event
#[utoipa::path(
    post,
    path = "/v2/reservations",
    request_body = ReservationCreateRequest,
    tag = "reservations",
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 403, description = "Referenced tent belongs to another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, tent_id = request.tent_id))]
pub async fn create_reservation(
    State(state): State<AppState>,
    current: CurrentGroup,
    Json(request): Json<ReservationCreateRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), Error> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    if !Tents::new(&mut tx, current.id).exists(request.tent_id).await? {
        return Err(foreign_tent());
    }

    let reservation = Reservations::new(&mut tx, current.id)
        .create(&ReservationCreateDBRequest {
            tent_id: request.tent_id,
            event_id: request.event_id,
            starts_on: request.starts_on,
            ends_on: request.ends_on,
        })
        .await?;

    tx.commit().await.map_err(DbError::from)?;

    Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

/// Get one reservation
#[utoipa::path(
    get,
    path = "/v2/reservations/{id}",
    params(("id" = i32, Path, description = "Reservation id")),
    tag = "reservations",
    responses(
        (status = 200, description = "The reservation", body = ReservationResponse),
        (status = 404, description = "Unknown id, or a reservation on another group's tent"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, reservation_id = id))]
pub async fn get_reservation(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<ReservationId>,
) -> Result<Json<ReservationResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let reservation = Reservations::new(&mut conn, current.id)
        .get_by_id(id)
        .await?
        .ok_or_else(|| reservation_not_found(id))?;

    Ok(Json(ReservationResponse::from(reservation)))
}

/// Update a reservation
#[utoipa::path(
    put,
    path = "/v2/reservations/{id}",
    params(("id" = i32, Path, description = "Reservation id")),
    request_body = ReservationUpdateRequest,
    tag = "reservations",
    responses(
        (status = 200, description = "Updated reservation", body = ReservationResponse),
        (status = 403, description = "Re-pointed at another group's tent"),
        (status = 404, description = "Unknown id, or a reservation on another group's tent"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, reservation_id = id))]
pub async fn update_reservation(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<ReservationId>,
    Json(request): Json<ReservationUpdateRequest>,
) -> Result<Json<ReservationResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    // a new tent reference must itself be owned by the caller
    if let Some(tent_id) = request.tent_id {
        if !Tents::new(&mut tx, current.id).exists(tent_id).await? {
            return Err(foreign_tent());
        }
    }

    let reservation = Reservations::new(&mut tx, current.id)
        .update(
            id,
            &ReservationUpdateDBRequest {
                tent_id: request.tent_id,
                event_id: request.event_id,
                starts_on: request.starts_on,
                ends_on: request.ends_on,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => reservation_not_found(id),
            other => other.into(),
        })?;

    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(ReservationResponse::from(reservation)))
}

/// Delete a reservation
#[utoipa::path(
    delete,
    path = "/v2/reservations/{id}",
    params(("id" = i32, Path, description = "Reservation id")),
    tag = "reservations",
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Unknown id, or a reservation on another group's tent"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, reservation_id = id))]
pub async fn delete_reservation(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<ReservationId>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Reservations::new(&mut conn, current.id).delete(id).await?;
    if !deleted {
        return Err(reservation_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::test::utils::{access_token, seed_event, seed_group, seed_tent, test_app};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_create_with_foreign_tent_is_forbidden(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        let foreign_tent = seed_tent(&pool, loutres.id, "Est").await;
        let event = seed_event(&pool, castors.id, "Camp d'ete").await;
        let token = access_token(&castors);
        let server = TestServer::new(test_app(pool.clone())).unwrap();

        let response = server
            .post("/v2/reservations")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"tent_id": foreign_tent.id, "event_id": event.id}))
            .await;
        response.assert_status_forbidden();

        // nothing was written
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test]
    async fn test_create_and_list_with_filters(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let tent = seed_tent(&pool, group.id, "Nord").await;
        let event = seed_event(&pool, group.id, "Camp d'ete").await;
        let token = access_token(&group);
        let server = TestServer::new(test_app(pool)).unwrap();

        let created = server
            .post("/v2/reservations")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({
                "tent_id": tent.id,
                "event_id": event.id,
                "starts_on": "2026-07-01",
                "ends_on": "2026-07-14"
            }))
            .await;
        created.assert_status(axum::http::StatusCode::CREATED);

        let filtered: Value = server
            .get("/v2/reservations")
            .add_query_param("tent_id", tent.id)
            .add_header("authorization", format!("Bearer {token}"))
            .await
            .json();
        assert_eq!(filtered.as_array().unwrap().len(), 1);

        let other: Value = server
            .get("/v2/reservations")
            .add_query_param("event_id", event.id + 1)
            .add_header("authorization", format!("Bearer {token}"))
            .await
            .json();
        assert!(other.as_array().unwrap().is_empty());
    }

    #[sqlx::test]
    async fn test_update_cannot_repoint_to_foreign_tent(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        let own_tent = seed_tent(&pool, castors.id, "Nord").await;
        let foreign_tent = seed_tent(&pool, loutres.id, "Est").await;
        let event = seed_event(&pool, castors.id, "Camp d'ete").await;
        let token = access_token(&castors);
        let server = TestServer::new(test_app(pool)).unwrap();

        let created: Value = server
            .post("/v2/reservations")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"tent_id": own_tent.id, "event_id": event.id}))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();

        let response = server
            .put(&format!("/v2/reservations/{id}"))
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"tent_id": foreign_tent.id}))
            .await;
        response.assert_status_forbidden();
    }
}
