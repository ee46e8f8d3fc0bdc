//! Database repository for tent inspections, scoped through the owning tent.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::inspections::{InspectionCreateDBRequest, InspectionDBResponse, InspectionUpdateDBRequest},
};
use crate::types::{GroupId, InspectionId, TentId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing inspections
#[derive(Debug, Clone)]
pub struct InspectionFilter {
    pub skip: i64,
    pub limit: i64,
    pub tent_id: Option<TentId>,
}

impl Default for InspectionFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, tent_id: None }
    }
}

pub struct Inspections<'c> {
    db: &'c mut PgConnection,
    group_id: GroupId,
}

impl<'c> Inspections<'c> {
    pub fn new(db: &'c mut PgConnection, group_id: GroupId) -> Self {
        Self { db, group_id }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Inspections<'c> {
    type CreateRequest = InspectionCreateDBRequest;
    type UpdateRequest = InspectionUpdateDBRequest;
    type Response = InspectionDBResponse;
    type Id = InspectionId;
    type Filter = InspectionFilter;

    #[instrument(skip(self, request), fields(group_id = self.group_id, tent_id = request.tent_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let inspection = sqlx::query_as::<_, InspectionDBResponse>(
            r#"
            INSERT INTO inspections (tent_id, user_id, inspected_at, checklist, remarks)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.tent_id)
        .bind(request.user_id)
        .bind(request.inspected_at)
        .bind(&request.checklist)
        .bind(&request.remarks)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(inspection)
    }

    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let inspection = sqlx::query_as::<_, InspectionDBResponse>(
            r#"
            SELECT i.* FROM inspections i
            JOIN tents t ON i.tent_id = t.id
            WHERE i.id = $1 AND t.group_id = $2
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(inspection)
    }

    #[instrument(skip(self, filter), fields(group_id = self.group_id, limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        use sqlx::QueryBuilder;

        let mut query = QueryBuilder::new(
            "SELECT i.* FROM inspections i JOIN tents t ON i.tent_id = t.id WHERE t.group_id = ",
        );
        query.push_bind(self.group_id);

        if let Some(tent_id) = filter.tent_id {
            query.push(" AND i.tent_id = ");
            query.push_bind(tent_id);
        }

        query.push(" ORDER BY i.inspected_at DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let inspections = query
            .build_query_as::<InspectionDBResponse>()
            .fetch_all(&mut *self.db)
            .await?;

        Ok(inspections)
    }

    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM inspections i
            USING tents t
            WHERE i.id = $1 AND i.tent_id = t.id AND t.group_id = $2
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
        let inspection = sqlx::query_as::<_, InspectionDBResponse>(
            r#"
            UPDATE inspections i SET
                tent_id = COALESCE($3, i.tent_id),
                user_id = COALESCE($4, i.user_id),
                inspected_at = COALESCE($5, i.inspected_at),
                checklist = COALESCE($6, i.checklist),
                remarks = COALESCE($7, i.remarks),
                updated_at = NOW()
            FROM tents t
            WHERE i.id = $1 AND i.tent_id = t.id AND t.group_id = $2
            RETURNING i.*
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .bind(request.tent_id)
        .bind(request.user_id)
        .bind(request.inspected_at)
        .bind(&request.checklist)
        .bind(&request.remarks)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(inspection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_group, seed_tent};
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    async fn test_create_defaults_inspected_at(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let tent = seed_tent(&pool, group.id, "Nord").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inspections::new(&mut conn, group.id);
        let inspection = repo
            .create(&InspectionCreateDBRequest {
                tent_id: tent.id,
                user_id: 7,
                inspected_at: None,
                checklist: json!({"zippers": "ok", "groundsheet": "wet"}),
                remarks: Some("dry before storing".to_string()),
            })
            .await
            .expect("Failed to create inspection");

        assert_eq!(inspection.tent_id, tent.id);
        assert_eq!(inspection.checklist["groundsheet"], "wet");
        // COALESCE(NULL, NOW()) filled the timestamp in
        assert!(inspection.inspected_at <= chrono::Utc::now());
    }

    #[sqlx::test]
    async fn test_scope_follows_the_tent(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        let tent = seed_tent(&pool, castors.id, "Nord").await;

        let inspection = {
            let mut conn = pool.acquire().await.unwrap();
            let mut repo = Inspections::new(&mut conn, castors.id);
            repo.create(&InspectionCreateDBRequest {
                tent_id: tent.id,
                user_id: 7,
                inspected_at: None,
                checklist: json!({}),
                remarks: None,
            })
            .await
            .unwrap()
        };

        let mut conn = pool.acquire().await.unwrap();
        let mut foreign = Inspections::new(&mut conn, loutres.id);
        assert!(foreign.get_by_id(inspection.id).await.unwrap().is_none());
        assert!(!foreign.delete(inspection.id).await.unwrap());

        let err = foreign
            .update(inspection.id, &InspectionUpdateDBRequest::default())
            .await
            .expect_err("Foreign update should fail");
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    async fn test_list_by_tent(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let nord = seed_tent(&pool, group.id, "Nord").await;
        let sud = seed_tent(&pool, group.id, "Sud").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inspections::new(&mut conn, group.id);
        for tent_id in [nord.id, nord.id, sud.id] {
            repo.create(&InspectionCreateDBRequest {
                tent_id,
                user_id: 7,
                inspected_at: None,
                checklist: json!({}),
                remarks: None,
            })
            .await
            .unwrap();
        }

        let for_nord = repo
            .list(&InspectionFilter { tent_id: Some(nord.id), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(for_nord.len(), 2);

        let all = repo.list(&InspectionFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[sqlx::test]
    async fn test_update_merges_checklist_wholesale(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let tent = seed_tent(&pool, group.id, "Nord").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Inspections::new(&mut conn, group.id);
        let inspection = repo
            .create(&InspectionCreateDBRequest {
                tent_id: tent.id,
                user_id: 7,
                inspected_at: None,
                checklist: json!({"zippers": "ok"}),
                remarks: None,
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                inspection.id,
                &InspectionUpdateDBRequest {
                    checklist: Some(json!({"zippers": "broken", "poles": "ok"})),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // the checklist is replaced as a whole, not key-merged
        assert_eq!(updated.checklist, json!({"zippers": "broken", "poles": "ok"}));
        assert_eq!(updated.user_id, 7);
    }
}
