//! Database repositories for the recipe catalog and its event schedule.
//!
//! Both tables are a shared catalog: authentication is required at the API
//! layer but rows are not tenant-filtered here.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::menus::{
        EventMenuCreateDBRequest, EventMenuDBResponse, EventMenuUpdateDBRequest, MenuCreateDBRequest,
        MenuDBResponse, MenuUpdateDBRequest,
    },
};
use crate::types::{EventId, EventMenuId, MenuId};
use chrono::NaiveDate;
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing menus
#[derive(Debug, Clone)]
pub struct MenuFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>, // Case-insensitive substring search on title
    pub tag: Option<String>,
}

impl Default for MenuFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100, search: None, tag: None }
    }
}

pub struct Menus<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Menus<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Menus<'c> {
    type CreateRequest = MenuCreateDBRequest;
    type UpdateRequest = MenuUpdateDBRequest;
    type Response = MenuDBResponse;
    type Id = MenuId;
    type Filter = MenuFilter;

    #[instrument(skip(self, request), fields(title = %request.title), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let menu = sqlx::query_as::<_, MenuDBResponse>(
            r#"
            INSERT INTO menus (title, instructions, ingredients, allergens, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.title)
        .bind(&request.instructions)
        .bind(&request.ingredients)
        .bind(&request.allergens)
        .bind(&request.tags)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(menu)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let menu = sqlx::query_as::<_, MenuDBResponse>("SELECT * FROM menus WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(menu)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        use sqlx::QueryBuilder;

        let mut query = QueryBuilder::new("SELECT * FROM menus WHERE 1=1");

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query.push(" AND LOWER(title) LIKE ");
            query.push_bind(pattern);
        }
        if let Some(ref tag) = filter.tag {
            query.push(" AND tags @> ARRAY[");
            query.push_bind(tag);
            query.push("]::text[]");
        }

        query.push(" ORDER BY title LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let menus = query.build_query_as::<MenuDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(menus)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let menu = sqlx::query_as::<_, MenuDBResponse>(
            r#"
            UPDATE menus SET
                title = COALESCE($2, title),
                instructions = COALESCE($3, instructions),
                ingredients = COALESCE($4, ingredients),
                allergens = COALESCE($5, allergens),
                tags = COALESCE($6, tags),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.instructions)
        .bind(&request.ingredients)
        .bind(&request.allergens)
        .bind(&request.tags)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(menu)
    }
}

/// Filter for listing event-menu schedule rows
#[derive(Debug, Clone)]
pub struct EventMenuFilter {
    pub skip: i64,
    pub limit: i64,
    pub event_id: EventId,
    pub served_on: Option<NaiveDate>,
}

impl EventMenuFilter {
    pub fn for_event(event_id: EventId) -> Self {
        Self { skip: 0, limit: 100, event_id, served_on: None }
    }
}

pub struct EventMenus<'c> {
    db: &'c mut PgConnection,
}

impl<'c> EventMenus<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for EventMenus<'c> {
    type CreateRequest = EventMenuCreateDBRequest;
    type UpdateRequest = EventMenuUpdateDBRequest;
    type Response = EventMenuDBResponse;
    type Id = EventMenuId;
    type Filter = EventMenuFilter;

    #[instrument(skip(self, request), fields(event_id = request.event_id, menu_id = request.menu_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let row = sqlx::query_as::<_, EventMenuDBResponse>(
            r#"
            INSERT INTO event_menus (event_id, menu_id, served_on, meal_type, headcount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.event_id)
        .bind(request.menu_id)
        .bind(request.served_on)
        .bind(&request.meal_type)
        .bind(request.headcount)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let row = sqlx::query_as::<_, EventMenuDBResponse>("SELECT * FROM event_menus WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(row)
    }

    #[instrument(skip(self, filter), fields(event_id = filter.event_id), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        use sqlx::QueryBuilder;

        let mut query = QueryBuilder::new("SELECT * FROM event_menus WHERE event_id = ");
        query.push_bind(filter.event_id);

        if let Some(served_on) = filter.served_on {
            query.push(" AND served_on = ");
            query.push_bind(served_on);
        }

        query.push(" ORDER BY served_on NULLS LAST, id LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        let rows = query.build_query_as::<EventMenuDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(rows)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM event_menus WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let row = sqlx::query_as::<_, EventMenuDBResponse>(
            r#"
            UPDATE event_menus SET
                served_on = COALESCE($2, served_on),
                meal_type = COALESCE($3, meal_type),
                headcount = COALESCE($4, headcount),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.served_on)
        .bind(&request.meal_type)
        .bind(request.headcount)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_event, seed_group};
    use serde_json::json;
    use sqlx::PgPool;

    fn spaghetti() -> MenuCreateDBRequest {
        MenuCreateDBRequest {
            title: "Spaghetti bolognaise".to_string(),
            instructions: Some("Brown the meat, simmer the sauce.".to_string()),
            ingredients: json!([
                {"name": "spaghetti", "quantity": 500, "unit": "g"},
                {"name": "minced beef", "quantity": 400, "unit": "g"}
            ]),
            allergens: Some(vec!["gluten".to_string()]),
            tags: Some(vec!["dinner".to_string()]),
        }
    }

    #[sqlx::test]
    async fn test_menu_crud(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Menus::new(&mut conn);

        let menu = repo.create(&spaghetti()).await.expect("Failed to create menu");
        assert_eq!(menu.title, "Spaghetti bolognaise");

        let updated = repo
            .update(
                menu.id,
                &MenuUpdateDBRequest {
                    tags: Some(vec!["dinner".to_string(), "classic".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.tags.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(updated.ingredients, menu.ingredients);

        assert!(repo.delete(menu.id).await.unwrap());
        assert!(repo.get_by_id(menu.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_menu_list_search_and_tag(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Menus::new(&mut conn);

        repo.create(&spaghetti()).await.unwrap();
        repo.create(&MenuCreateDBRequest {
            title: "Porridge".to_string(),
            instructions: None,
            ingredients: json!([{"name": "oats", "quantity": 300, "unit": "g"}]),
            allergens: None,
            tags: Some(vec!["breakfast".to_string()]),
        })
        .await
        .unwrap();

        let hits = repo
            .list(&MenuFilter { search: Some("SPAGHETTI".to_string()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let breakfast = repo
            .list(&MenuFilter { tag: Some("breakfast".to_string()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(breakfast.len(), 1);
        assert_eq!(breakfast[0].title, "Porridge");
    }

    #[sqlx::test]
    async fn test_event_menu_schedule_filtering(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let camp = seed_event(&pool, group.id, "Camp d'ete").await;
        let weekend = seed_event(&pool, group.id, "Weekend").await;

        let mut conn = pool.acquire().await.unwrap();
        let menu = Menus::new(&mut conn).create(&spaghetti()).await.unwrap();

        let day1 = chrono::NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let day2 = chrono::NaiveDate::from_ymd_opt(2026, 7, 2).unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = EventMenus::new(&mut conn);
        for (event_id, served_on) in [(camp.id, day1), (camp.id, day2), (weekend.id, day1)] {
            repo.create(&EventMenuCreateDBRequest {
                event_id,
                menu_id: menu.id,
                served_on: Some(served_on),
                meal_type: Some("dinner".to_string()),
                headcount: Some(24),
            })
            .await
            .unwrap();
        }

        let camp_rows = repo.list(&EventMenuFilter::for_event(camp.id)).await.unwrap();
        assert_eq!(camp_rows.len(), 2);

        let camp_day1 = repo
            .list(&EventMenuFilter { served_on: Some(day1), ..EventMenuFilter::for_event(camp.id) })
            .await
            .unwrap();
        assert_eq!(camp_day1.len(), 1);
        assert_eq!(camp_day1[0].served_on, Some(day1));
    }

    #[sqlx::test]
    async fn test_event_menu_update_headcount(pool: PgPool) {
        let group = seed_group(&pool, "castors").await;
        let camp = seed_event(&pool, group.id, "Camp d'ete").await;

        let mut conn = pool.acquire().await.unwrap();
        let menu = Menus::new(&mut conn).create(&spaghetti()).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = EventMenus::new(&mut conn);
        let row = repo
            .create(&EventMenuCreateDBRequest {
                event_id: camp.id,
                menu_id: menu.id,
                served_on: None,
                meal_type: Some("lunch".to_string()),
                headcount: None,
            })
            .await
            .unwrap();

        let updated = repo
            .update(row.id, &EventMenuUpdateDBRequest { headcount: Some(31), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.headcount, Some(31));
        assert_eq!(updated.meal_type.as_deref(), Some("lunch"));
    }
}
