//! Database repository for events, bound to the acting group.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::events::{EventCreateDBRequest, EventDBResponse, EventUpdateDBRequest},
};
use crate::types::{EventId, GroupId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing events
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub skip: i64,
    pub limit: i64,
    pub event_type: Option<String>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, event_type: None }
    }
}

pub struct Events<'c> {
    db: &'c mut PgConnection,
    group_id: GroupId,
}

impl<'c> Events<'c> {
    pub fn new(db: &'c mut PgConnection, group_id: GroupId) -> Self {
        Self { db, group_id }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Events<'c> {
    type CreateRequest = EventCreateDBRequest;
    type UpdateRequest = EventUpdateDBRequest;
    type Response = EventDBResponse;
    type Id = EventId;
    type Filter = EventFilter;

    #[instrument(skip(self, request), fields(group_id = self.group_id, name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        debug_assert_eq!(request.group_id, self.group_id);

        let event = sqlx::query_as::<_, EventDBResponse>(
            r#"
            INSERT INTO events (group_id, name, event_type, starts_at, ends_at, tent_ids, unit_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(self.group_id)
        .bind(&request.name)
        .bind(&request.event_type)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(&request.tent_ids)
        .bind(&request.unit_ids)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(event)
    }

    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let event = sqlx::query_as::<_, EventDBResponse>("SELECT * FROM events WHERE id = $1 AND group_id = $2")
            .bind(id)
            .bind(self.group_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(event)
    }

    #[instrument(skip(self, filter), fields(group_id = self.group_id, limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        use sqlx::QueryBuilder;

        let mut query = QueryBuilder::new("SELECT * FROM events WHERE group_id = ");
        query.push_bind(self.group_id);

        if let Some(ref event_type) = filter.event_type {
            query.push(" AND event_type = ");
            query.push_bind(event_type);
        }

        query.push(" ORDER BY starts_at NULLS LAST, name LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let events = query.build_query_as::<EventDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(events)
    }

    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND group_id = $2")
            .bind(id)
            .bind(self.group_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(group_id = self.group_id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let event = sqlx::query_as::<_, EventDBResponse>(
            r#"
            UPDATE events SET
                name = COALESCE($3, name),
                event_type = COALESCE($4, event_type),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                tent_ids = COALESCE($7, tent_ids),
                unit_ids = COALESCE($8, unit_ids),
                updated_at = NOW()
            WHERE id = $1 AND group_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .bind(&request.name)
        .bind(&request.event_type)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(&request.tent_ids)
        .bind(&request.unit_ids)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_event, seed_group};
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_create_and_get(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Events::new(&mut conn, group.id);
        let event = repo
            .create(&EventCreateDBRequest {
                group_id: group.id,
                name: "Camp d'ete".to_string(),
                event_type: Some("camp".to_string()),
                starts_at: None,
                ends_at: None,
                tent_ids: Some(vec![1, 2]),
                unit_ids: None,
            })
            .await
            .expect("Failed to create event");

        assert_eq!(event.group_id, group.id);

        let found = repo.get_by_id(event.id).await.unwrap().expect("Event should exist");
        assert_eq!(found.name, "Camp d'ete");
        assert_eq!(found.tent_ids, Some(vec![1, 2]));
    }

    #[sqlx::test]
    async fn test_cross_group_isolation(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        let event = seed_event(&pool, castors.id, "Camp d'ete").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut foreign = Events::new(&mut conn, loutres.id);

        assert!(foreign.get_by_id(event.id).await.unwrap().is_none());
        assert!(foreign.list(&EventFilter::default()).await.unwrap().is_empty());
        assert!(!foreign.delete(event.id).await.unwrap());

        let err = foreign
            .update(event.id, &EventUpdateDBRequest::default())
            .await
            .expect_err("Foreign update should fail");
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    async fn test_list_event_type_filter(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        seed_event(&pool, group.id, "Camp d'ete").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Events::new(&mut conn, group.id);
        repo.create(&EventCreateDBRequest {
            group_id: group.id,
            name: "Sortie velo".to_string(),
            event_type: Some("outing".to_string()),
            starts_at: None,
            ends_at: None,
            tent_ids: None,
            unit_ids: None,
        })
        .await
        .unwrap();

        let outings = repo
            .list(&EventFilter { event_type: Some("outing".to_string()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(outings.len(), 1);
        assert_eq!(outings[0].name, "Sortie velo");
    }
}
