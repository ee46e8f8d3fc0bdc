//! Database models for the recipe catalog and its event scheduling join.
//!
//! Menus are not group-scoped (shared catalog - see DESIGN.md); ingredient
//! shape is validated at the API edge before these requests are built.

use crate::types::{EventId, EventMenuId, MenuId};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct MenuCreateDBRequest {
    pub title: String,
    pub instructions: Option<String>,
    pub ingredients: serde_json::Value,
    pub allergens: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct MenuUpdateDBRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Option<serde_json::Value>,
    pub allergens: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MenuDBResponse {
    pub id: MenuId,
    pub title: String,
    pub instructions: Option<String>,
    pub ingredients: serde_json::Value,
    pub allergens: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EventMenuCreateDBRequest {
    pub event_id: EventId,
    pub menu_id: MenuId,
    pub served_on: Option<NaiveDate>,
    pub meal_type: Option<String>,
    pub headcount: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct EventMenuUpdateDBRequest {
    pub served_on: Option<NaiveDate>,
    pub meal_type: Option<String>,
    pub headcount: Option<i32>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventMenuDBResponse {
    pub id: EventMenuId,
    pub event_id: EventId,
    pub menu_id: MenuId,
    pub served_on: Option<NaiveDate>,
    pub meal_type: Option<String>,
    pub headcount: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
