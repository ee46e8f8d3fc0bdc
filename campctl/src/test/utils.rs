//! Shared helpers for repository and endpoint tests.

use crate::auth::password::hash_string;
use crate::auth::token::TokenCodec;
use crate::config::Config;
use crate::db::models::{
    events::EventDBResponse,
    groups::GroupDBResponse,
    tents::TentDBResponse,
};
use crate::types::GroupId;
use crate::AppState;
use sqlx::PgPool;

/// Password used by every seeded group.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Config with a fixed signing secret so tokens verify across test helpers.
pub fn test_config() -> Config {
    Config {
        secret_key: Some("test-secret-not-for-production".to_string()),
        ..Default::default()
    }
}

/// Full application router backed by the given pool.
pub fn test_app(pool: PgPool) -> axum::Router {
    let config = test_config();
    let tokens = TokenCodec::from_config(&config).expect("token codec");
    let state = AppState::builder().db(pool).config(config).tokens(tokens).build();
    crate::build_router(state)
}

/// Mint a valid access token for a seeded group.
pub fn access_token(group: &GroupDBResponse) -> String {
    let codec = TokenCodec::from_config(&test_config()).expect("token codec");
    codec.issue_access(group.id, &group.userlogin).expect("token issuance")
}

/// Insert a group directly, returning the stored row.
pub async fn seed_group(pool: &PgPool, userlogin: &str) -> GroupDBResponse {
    let password_hash = hash_string(TEST_PASSWORD).expect("hashing failed");
    sqlx::query_as::<_, GroupDBResponse>(
        r#"
        INSERT INTO groups (userlogin, password_hash, name, email, members)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(userlogin)
    .bind(password_hash)
    .bind(format!("Groupe {userlogin}"))
    .bind(format!("{userlogin}@camp.example"))
    .bind(vec!["Alice".to_string(), "Benoit".to_string()])
    .fetch_one(pool)
    .await
    .expect("Failed to seed group")
}

/// Insert a tent owned by the given group.
pub async fn seed_tent(pool: &PgPool, group_id: GroupId, name: &str) -> TentDBResponse {
    sqlx::query_as::<_, TentDBResponse>(
        r#"
        INSERT INTO tents (group_id, name, state, integrated)
        VALUES ($1, $2, 'good', false)
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("Failed to seed tent")
}

/// Insert an event owned by the given group.
pub async fn seed_event(pool: &PgPool, group_id: GroupId, name: &str) -> EventDBResponse {
    sqlx::query_as::<_, EventDBResponse>(
        r#"
        INSERT INTO events (group_id, name, event_type)
        VALUES ($1, $2, 'camp')
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("Failed to seed event")
}
