//! Database repository for tents.
//!
//! The repository is bound to the acting group at construction; every query
//! carries the group filter so cross-tenant ids behave exactly like absent
//! rows.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::tents::{TentCreateDBRequest, TentDBResponse, TentUpdateDBRequest},
};
use crate::types::{GroupId, TentId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing tents
#[derive(Debug, Clone)]
pub struct TentFilter {
    pub skip: i64,
    pub limit: i64,
    pub state: Option<String>,
}

impl Default for TentFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, state: None }
    }
}

pub struct Tents<'c> {
    db: &'c mut PgConnection,
    group_id: GroupId,
}

impl<'c> Tents<'c> {
    pub fn new(db: &'c mut PgConnection, group_id: GroupId) -> Self {
        Self { db, group_id }
    }

    /// Ownership probe used before creating reservations or inspections that
    /// reference a tent.
    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    pub async fn exists(&mut self, id: TentId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tents WHERE id = $1 AND group_id = $2")
            .bind(id)
            .bind(self.group_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Tents<'c> {
    type CreateRequest = TentCreateDBRequest;
    type UpdateRequest = TentUpdateDBRequest;
    type Response = TentDBResponse;
    type Id = TentId;
    type Filter = TentFilter;

    #[instrument(skip(self, request), fields(group_id = self.group_id, name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // the group column comes from the bound group, never from the request
        // payload reaching this layer with a different id
        debug_assert_eq!(request.group_id, self.group_id);

        let tent = sqlx::query_as::<_, TentDBResponse>(
            r#"
            INSERT INTO tents (group_id, name, state, remarks, capacity, tent_type, colors, integrated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(self.group_id)
        .bind(&request.name)
        .bind(&request.state)
        .bind(&request.remarks)
        .bind(request.capacity)
        .bind(&request.tent_type)
        .bind(&request.colors)
        .bind(request.integrated)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(tent)
    }

    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let tent = sqlx::query_as::<_, TentDBResponse>("SELECT * FROM tents WHERE id = $1 AND group_id = $2")
            .bind(id)
            .bind(self.group_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(tent)
    }

    #[instrument(skip(self, filter), fields(group_id = self.group_id, limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        use sqlx::QueryBuilder;

        let mut query = QueryBuilder::new("SELECT * FROM tents WHERE group_id = ");
        query.push_bind(self.group_id);

        if let Some(ref state) = filter.state {
            query.push(" AND state = ");
            query.push_bind(state);
        }

        query.push(" ORDER BY name LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let tents = query.build_query_as::<TentDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(tents)
    }

    /// Deletes a tent and its inspections. The caller wraps this in a
    /// transaction so the two statements commit or roll back together.
    #[instrument(skip(self), fields(group_id = self.group_id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        sqlx::query(
            r#"
            DELETE FROM inspections i
            USING tents t
            WHERE i.tent_id = t.id AND t.id = $1 AND t.group_id = $2
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .execute(&mut *self.db)
        .await?;

        let result = sqlx::query("DELETE FROM tents WHERE id = $1 AND group_id = $2")
            .bind(id)
            .bind(self.group_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(group_id = self.group_id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // group_id never appears in the SET list: a tent cannot change hands
        let tent = sqlx::query_as::<_, TentDBResponse>(
            r#"
            UPDATE tents SET
                name = COALESCE($3, name),
                state = COALESCE($4, state),
                remarks = COALESCE($5, remarks),
                capacity = COALESCE($6, capacity),
                tent_type = COALESCE($7, tent_type),
                colors = COALESCE($8, colors),
                integrated = COALESCE($9, integrated),
                updated_at = NOW()
            WHERE id = $1 AND group_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(self.group_id)
        .bind(&request.name)
        .bind(&request.state)
        .bind(&request.remarks)
        .bind(request.capacity)
        .bind(&request.tent_type)
        .bind(&request.colors)
        .bind(request.integrated)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(tent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_group, seed_tent};
    use sqlx::{Acquire, PgPool};

    #[sqlx::test]
    async fn test_create_stamps_bound_group(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Tents::new(&mut conn, group.id);
        let tent = repo
            .create(&TentCreateDBRequest {
                group_id: group.id,
                name: "Patrouille Nord".to_string(),
                state: "good".to_string(),
                remarks: None,
                capacity: Some(8),
                tent_type: Some("patrol".to_string()),
                colors: Some(vec!["green".to_string()]),
                integrated: false,
            })
            .await
            .expect("Failed to create tent");

        assert_eq!(tent.group_id, group.id);
        assert_eq!(tent.capacity, Some(8));
    }

    #[sqlx::test]
    async fn test_cross_group_lookup_behaves_like_absent(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        let tent = seed_tent(&pool, castors.id, "Patrouille Nord").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut foreign = Tents::new(&mut conn, loutres.id);

        assert!(foreign.get_by_id(tent.id).await.unwrap().is_none());
        assert!(!foreign.exists(tent.id).await.unwrap());

        let err = foreign
            .update(tent.id, &TentUpdateDBRequest::default())
            .await
            .expect_err("Foreign update should fail");
        assert!(matches!(err, DbError::NotFound));

        assert!(!foreign.delete(tent.id).await.unwrap());

        // the tent is untouched for its real owner
        let mut conn = pool.acquire().await.unwrap();
        let mut own = Tents::new(&mut conn, castors.id);
        assert!(own.get_by_id(tent.id).await.unwrap().is_some());
    }

    #[sqlx::test]
    async fn test_list_is_tenant_filtered(pool: PgPool) {
        let castors = seed_group(&pool, "castors").await;
        let loutres = seed_group(&pool, "loutres").await;
        seed_tent(&pool, castors.id, "Nord").await;
        seed_tent(&pool, castors.id, "Sud").await;
        seed_tent(&pool, loutres.id, "Est").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Tents::new(&mut conn, castors.id);
        let tents = repo.list(&TentFilter::default()).await.expect("List failed");

        assert_eq!(tents.len(), 2);
        assert!(tents.iter().all(|t| t.group_id == castors.id));
    }

    #[sqlx::test]
    async fn test_list_state_filter(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Tents::new(&mut conn, group.id);

        for (name, state) in [("Nord", "good"), ("Sud", "torn"), ("Ouest", "good")] {
            repo.create(&TentCreateDBRequest {
                group_id: group.id,
                name: name.to_string(),
                state: state.to_string(),
                remarks: None,
                capacity: None,
                tent_type: None,
                colors: None,
                integrated: false,
            })
            .await
            .unwrap();
        }

        let torn = repo
            .list(&TentFilter { state: Some("torn".to_string()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(torn.len(), 1);
        assert_eq!(torn[0].name, "Sud");
    }

    #[sqlx::test]
    async fn test_update_keeps_unset_fields(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let tent = seed_tent(&pool, group.id, "Nord").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Tents::new(&mut conn, group.id);
        let updated = repo
            .update(
                tent.id,
                &TentUpdateDBRequest {
                    state: Some("torn".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");

        assert_eq!(updated.state, "torn");
        assert_eq!(updated.name, tent.name);
        assert_eq!(updated.group_id, group.id);
    }

    #[sqlx::test]
    async fn test_delete_cascades_inspections(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let tent = seed_tent(&pool, group.id, "Nord").await;

        sqlx::query("INSERT INTO inspections (tent_id, user_id, checklist) VALUES ($1, 1, '{}'::jsonb)")
            .bind(tent.id)
            .execute(&pool)
            .await
            .unwrap();

        {
            let mut tx = pool.begin().await.unwrap();
            let mut repo = Tents::new(tx.acquire().await.unwrap(), group.id);
            assert!(repo.delete(tent.id).await.expect("Delete failed"));
            tx.commit().await.unwrap();
        }

        let inspections: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inspections WHERE tent_id = $1")
            .bind(tent.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(inspections, 0);
    }
}
