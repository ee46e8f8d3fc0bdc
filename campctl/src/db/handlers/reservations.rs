//! Database repository for reservations.
//!
//! Reservations carry no group column, so every read and write joins through
//! the tents table to resolve ownership. Referenced-tent validation on create
//! and on tent re-pointing happens at the API layer before this code runs.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::reservations::{ReservationCreateDBRequest, ReservationDBResponse, ReservationUpdateDBRequest},
};
use crate::types::{EventId, GroupId, ReservationId, TentId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing reservations
#[derive(Debug, Clone)]
pub struct ReservationFilter {
    pub skip: i64,
    pub limit: i64,
    pub tent_id: Option<TentId>,
    pub event_id: Option<EventId>,
}

impl Default for ReservationFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, tent_id: None, event_id: None }
    }
}

pub struct Reservations<'c> {
    db: &'c mut PgConnection,
    group_id: GroupId,
}

impl<'c> Reservations<'c> {
    pub fn new(db: &'c mut PgConnection, group_id: GroupId) -> Self {
        Self { db, group_id }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Reservations<'c> {
    type CreateRequest = ReservationCreateDBRequest;
    type UpdateRequest = ReservationUpdateDBRequest;
    type Response = ReservationDBResponse;
    type Id = ReservationId;
    type Filter = ReservationFilter;

    #[instrument(skip(self, request), fields(group_id = self.group_id, tent_id = request.tent_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let reservation = sqlx::query_as::<_, ReservationDBResponse>(
            r#"
            INSERT INTO reservations (tent_id, event_id, starts_on, ends_on)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.tent_id)
        .bind(request.event_id)
        .bind(request.starts_on)
        .bind(request.ends_on)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(reservation)
    }

    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let reservation = sqlx::query_as::<_, ReservationDBResponse>(
            r#"
            SELECT r.* FROM reservations r
            JOIN tents t ON r.tent_id = t.id
            WHERE r.id = $1 AND t.group_id = $2
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(reservation)
    }

    #[instrument(skip(self, filter), fields(group_id = self.group_id, limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        use sqlx::QueryBuilder;

        let mut query = QueryBuilder::new(
            "SELECT r.* FROM reservations r JOIN tents t ON r.tent_id = t.id WHERE t.group_id = ",
        );
        query.push_bind(self.group_id);

        if let Some(tent_id) = filter.tent_id {
            query.push(" AND r.tent_id = ");
            query.push_bind(tent_id);
        }
        if let Some(event_id) = filter.event_id {
            query.push(" AND r.event_id = ");
            query.push_bind(event_id);
        }

        query.push(" ORDER BY r.starts_on NULLS LAST, r.id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let reservations = query
            .build_query_as::<ReservationDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;

        Ok(reservations)
    }

    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM reservations r
            USING tents t
            WHERE r.id = $1 AND r.tent_id = t.id AND t.group_id = $2
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(group_id = self.group_id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // ownership is checked against the tent the row currently points at
        let reservation = sqlx::query_as::<_, ReservationDBResponse>(
            r#"
            UPDATE reservations r SET
                tent_id = COALESCE($3, r.tent_id),
                event_id = COALESCE($4, r.event_id),
                starts_on = COALESCE($5, r.starts_on),
                ends_on = COALESCE($6, r.ends_on),
                updated_at = NOW()
            FROM tents t
            WHERE r.id = $1 AND r.tent_id = t.id AND t.group_id = $2
            RETURNING r.*
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .bind(request.tent_id)
        .bind(request.event_id)
        .bind(request.starts_on)
        .bind(request.ends_on)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(reservation)
    }
}
