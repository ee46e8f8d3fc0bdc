//! Inspection endpoints, scoped through the owning tent like reservations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        groups::CurrentGroup,
        inspections::{InspectionCreateRequest, InspectionListParams, InspectionResponse, InspectionUpdateRequest},
    },
    db::{
        errors::DbError,
        handlers::{inspections::InspectionFilter, Inspections, Repository, Tents},
        models::inspections::{InspectionCreateDBRequest, InspectionUpdateDBRequest},
    },
    errors::Error,
    types::InspectionId,
    AppState,
};

fn inspection_not_found(id: InspectionId) -> Error {
    Error::NotFound {
        resource: "Inspection".to_string(),
        id: id.to_string(),
    }
}

fn foreign_tent() -> Error {
    Error::Forbidden {
        resource: "tent".to_string(),
    }
}

/// List inspections of the group's tents
#[utoipa::path(
    get,
    path = "/v2/inspections",
    params(InspectionListParams),
    tag = "inspections",
    responses(
        (status = 200, description = "Inspections of the group's tents", body = [InspectionResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id))]
pub async fn list_inspections(
    State(state): State<AppState>,
    current: CurrentGroup,
    Query(params): Query<InspectionListParams>,
) -> Result<Json<Vec<InspectionResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let inspections = Inspections::new(&mut conn, current.id)
        .list(&InspectionFilter {
            tent_id: params.tent_id,
            ..Default::default()
        })
        .await?;

    Ok(Json(inspections.into_iter().map(InspectionResponse::from).collect()))
}

/// Record a tent inspection
#[utoipa::path(
    post,
    path = "/v2/inspections",
    request_body = InspectionCreateRequest,
    tag = "inspections",
    responses(
        (status = 201, description = "Inspection recorded", body = InspectionResponse),
        (status = 403, description = "Referenced tent belongs to another group"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, tent_id = request.tent_id))]
pub async fn create_inspection(
    State(state): State<AppState>,
    current: CurrentGroup,
    Json(request): Json<InspectionCreateRequest>,
) -> Result<(StatusCode, Json<InspectionResponse>), Error> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    if !Tents::new(&mut tx, current.id).exists(request.tent_id).await? {
        return Err(foreign_tent());
    }

    let inspection = Inspections::new(&mut tx, current.id)
        .create(&InspectionCreateDBRequest {
            tent_id: request.tent_id,
            user_id: request.user_id,
            inspected_at: request.inspected_at,
            checklist: request.checklist,
            remarks: request.remarks,
        })
        .await?;

    tx.commit().await.map_err(DbError::from)?;

    Ok((StatusCode::CREATED, Json(InspectionResponse::from(inspection))))
}

/// Get one inspection
#[utoipa::path(
    get,
    path = "/v2/inspections/{id}",
    params(("id" = i32, Path, description = "Inspection id")),
    tag = "inspections",
    responses(
        (status = 200, description = "The inspection", body = InspectionResponse),
        (status = 404, description = "Unknown id, or an inspection of another group's tent"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, inspection_id = id))]
pub async fn get_inspection(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<InspectionId>,
) -> Result<Json<InspectionResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let inspection = Inspections::new(&mut conn, current.id)
        .get_by_id(id)
        .await?
        .ok_or_else(|| inspection_not_found(id))?;

    Ok(Json(InspectionResponse::from(inspection)))
}

/// Update an inspection
#[utoipa::path(
    put,
    path = "/v2/inspections/{id}",
    params(("id" = i32, Path, description = "Inspection id")),
    request_body = InspectionUpdateRequest,
    tag = "inspections",
    responses(
        (status = 200, description = "Updated inspection", body = InspectionResponse),
        (status = 403, description = "Re-pointed at another group's tent"),
        (status = 404, description = "Unknown id, or an inspection of another group's tent"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, inspection_id = id))]
pub async fn update_inspection(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<InspectionId>,
    Json(request): Json<InspectionUpdateRequest>,
) -> Result<Json<InspectionResponse>, Error> {
    let mut tx = state.db.begin().await.map_err(DbError::from)?;

    if let Some(tent_id) = request.tent_id {
        if !Tents::new(&mut tx, current.id).exists(tent_id).await? {
            return Err(foreign_tent());
        }
    }

    let inspection = Inspections::new(&mut tx, current.id)
        .update(
            id,
            &InspectionUpdateDBRequest {
                tent_id: request.tent_id,
                user_id: request.user_id,
                inspected_at: request.inspected_at,
                checklist: request.checklist,
                remarks: request.remarks,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => inspection_not_found(id),
            other => other.into(),
        })?;

    tx.commit().await.map_err(DbError::from)?;

    Ok(Json(InspectionResponse::from(inspection)))
}

/// Delete an inspection
#[utoipa::path(
    delete,
    path = "/v2/inspections/{id}",
    params(("id" = i32, Path, description = "Inspection id")),
    tag = "inspections",
    responses(
        (status = 204, description = "Inspection deleted"),
        (status = 404, description = "Unknown id, or an inspection of another group's tent"),
    )
)]
#[tracing::instrument(skip_all, fields(group_id = current.id, inspection_id = id))]
pub async fn delete_inspection(
    State(state): State<AppState>,
    current: CurrentGroup,
    Path(id): Path<InspectionId>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Inspections::new(&mut conn, current.id).delete(id).await?;
    if !deleted {
        return Err(inspection_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::test::utils::{access_token, seed_group, seed_tent, test_app};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_record_inspection_on_own_tent(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let tent = seed_tent(&pool, group.id, "Nord").await;
        let token = access_token(&group);
        let server = TestServer::new(test_app(pool)).unwrap();

        let response = server
            .post("/v2/inspections")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({
                "tent_id": tent.id,
                "user_id": 7,
                "checklist": {"zippers": "ok", "groundsheet": "wet"},
                "remarks": "dry before storing"
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["tent_id"], tent.id);
        assert_eq!(body["checklist"]["zippers"], "ok");
        assert!(body["inspected_at"].is_string());
    }

    #[sqlx::test]
    async fn test_inspecting_foreign_tent_is_forbidden(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        let foreign_tent = seed_tent(&pool, loutres.id, "Est").await;
        let token = access_token(&castors);
        let server = TestServer::new(test_app(pool)).unwrap();

        let response = server
            .post("/v2/inspections")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"tent_id": foreign_tent.id, "user_id": 7, "checklist": {}}))
            .await;
        response.assert_status_forbidden();
    }

    #[sqlx::test]
    async fn test_repoint_to_same_group_tent_allowed_foreign_denied(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        let nord = seed_tent(&pool, castors.id, "Nord").await;
        let sud = seed_tent(&pool, castors.id, "Sud").await;
        let foreign_tent = seed_tent(&pool, loutres.id, "Est").await;
        let token = access_token(&castors);
        let server = TestServer::new(test_app(pool)).unwrap();

        let created: Value = server
            .post("/v2/inspections")
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"tent_id": nord.id, "user_id": 7, "checklist": {}}))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();

        let same_group = server
            .put(&format!("/v2/inspections/{id}"))
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"tent_id": sud.id}))
            .await;
        same_group.assert_status_ok();
        let body: Value = same_group.json();
        assert_eq!(body["tent_id"], sud.id);

        let foreign = server
            .put(&format!("/v2/inspections/{id}"))
            .add_header("authorization", format!("Bearer {token}"))
            .json(&json!({"tent_id": foreign_tent.id}))
            .await;
        foreign.assert_status_forbidden();
    }
}
