//! Database repository for groups.
//!
//! Groups are the tenant/principal entity, so this repository is deliberately
//! narrow: it exists for registration, credential lookup at login, and the
//! self-service profile updates. There is no list or delete surface.

use crate::db::{
    errors::{DbError, Result},
    models::groups::{GroupCreateDBRequest, GroupDBResponse, GroupUpdateDBRequest},
};
use crate::types::GroupId;
use sqlx::PgConnection;
use tracing::instrument;

pub struct Groups<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Groups<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(userlogin = %request.userlogin), err)]
    pub async fn create(&mut self, request: &GroupCreateDBRequest) -> Result<GroupDBResponse> {
        let group = sqlx::query_as::<_, GroupDBResponse>(
            r#"
            INSERT INTO groups (userlogin, password_hash, name, email, members)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.userlogin)
        .bind(&request.password_hash)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.members)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(group)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: GroupId) -> Result<Option<GroupDBResponse>> {
        let group = sqlx::query_as::<_, GroupDBResponse>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(group)
    }

    /// Credential lookup for login. Returns the full row including the
    /// password hash; callers must not serialize it outward.
    #[instrument(skip(self), err)]
    pub async fn get_by_userlogin(&mut self, userlogin: &str) -> Result<Option<GroupDBResponse>> {
        let group = sqlx::query_as::<_, GroupDBResponse>("SELECT * FROM groups WHERE userlogin = $1")
            .bind(userlogin)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(group)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&mut self, id: GroupId, request: &GroupUpdateDBRequest) -> Result<GroupDBResponse> {
        // Atomic update with conditional field updates
        let group = sqlx::query_as::<_, GroupDBResponse>(
            r#"
            UPDATE groups SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                members = COALESCE($4, members),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.members)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(group)
    }

    #[instrument(skip(self), err)]
    pub async fn userlogin_taken(&mut self, userlogin: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM groups WHERE userlogin = $1")
            .bind(userlogin)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count > 0)
    }

    /// True if another group already uses this email address.
    #[instrument(skip(self), err)]
    pub async fn email_taken_by_other(&mut self, email: &str, own_id: GroupId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM groups WHERE email = $1 AND id != $2")
            .bind(email)
            .bind(own_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count > 0)
    }
}
