use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::models::{
        auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse},
        groups::{GroupCreateRequest, GroupResponse},
    },
    auth::password,
    db::{
        errors::DbError,
        handlers::Groups,
        models::groups::GroupCreateDBRequest,
    },
    errors::Error,
    AppState,
};

const TOKEN_TYPE: &str = "bearer";

/// Login with group credentials
#[utoipa::path(
    post,
    path = "/v2/auth/login",
    request_body = LoginRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut groups = Groups::new(&mut conn);

    // Unknown login and wrong password produce the same response
    let Some(group) = groups.get_by_userlogin(&request.userlogin).await? else {
        return Err(Error::Unauthenticated { message: None });
    };

    // Verify on a blocking thread to avoid stalling the async runtime
    let password = request.password;
    let hash = group.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })?;

    if !verified {
        return Err(Error::Unauthenticated { message: None });
    }

    let pair = state.tokens.issue_pair(group.id, &group.userlogin)?;

    Ok(Json(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: TOKEN_TYPE.to_string(),
        group_id: group.id,
        name: group.name,
        userlogin: group.userlogin,
    }))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/v2/auth/refresh",
    request_body = RefreshRequest,
    tag = "auth",
    responses(
        (status = 200, description = "New token pair", body = RefreshResponse),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 403, description = "Access token presented instead of a refresh token"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn refresh(State(state): State<AppState>, Json(request): Json<RefreshRequest>) -> Result<Json<RefreshResponse>, Error> {
    let pair = state.tokens.refresh(&request.refresh_token)?;

    Ok(Json(RefreshResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

/// Register a new group
#[utoipa::path(
    post,
    path = "/v2/auth/groups",
    request_body = GroupCreateRequest,
    tag = "auth",
    responses(
        (status = 201, description = "Group registered", body = GroupResponse),
        (status = 400, description = "Login already taken or invalid input"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<GroupCreateRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), Error> {
    if request.userlogin.trim().is_empty() || request.password.is_empty() || request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "userlogin, password and name are required".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(DbError::from)?;
    let mut groups = Groups::new(&mut tx);

    if groups.userlogin_taken(&request.userlogin).await? {
        return Err(Error::BadRequest {
            message: "This login is already taken".to_string(),
        });
    }

    // Hash on a blocking thread; argon2 is deliberately slow
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let created = groups
        .create(&GroupCreateDBRequest {
            userlogin: request.userlogin,
            password_hash,
            name: request.name,
            email: request.email,
            members: request.members,
        })
        .await?;

    tx.commit().await.map_err(DbError::from)?;

    Ok((StatusCode::CREATED, Json(GroupResponse::from(created))))
}
