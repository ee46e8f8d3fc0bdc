//! API models for menus and the event-menu schedule, including the
//! ingredient shape validation applied at the edge.

use crate::db::models::menus::{EventMenuDBResponse, MenuDBResponse};
use crate::errors::Error;
use crate::types::{EventId, EventMenuId, MenuId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Every ingredient entry must carry a name, a quantity, and a unit.
/// Additional keys are allowed and stored untouched.
pub fn validate_ingredients(ingredients: &serde_json::Value) -> Result<(), Error> {
    let entries = ingredients.as_array().ok_or_else(|| Error::BadRequest {
        message: "ingredients must be a list".to_string(),
    })?;

    for (index, entry) in entries.iter().enumerate() {
        let obj = entry.as_object().ok_or_else(|| Error::BadRequest {
            message: format!("ingredient {index} must be an object"),
        })?;

        for field in ["name", "quantity", "unit"] {
            let missing = match obj.get(field) {
                None => true,
                Some(value) => value.is_null() || value.as_str().is_some_and(str::is_empty),
            };
            if missing {
                return Err(Error::BadRequest {
                    message: format!("ingredient {index} is missing '{field}'"),
                });
            }
        }
    }

    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuCreateRequest {
    pub title: String,
    pub instructions: Option<String>,
    #[serde(default = "empty_ingredients")]
    pub ingredients: serde_json::Value,
    pub allergens: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

fn empty_ingredients() -> serde_json::Value {
    serde_json::Value::Array(vec![])
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MenuUpdateRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub ingredients: Option<serde_json::Value>,
    pub allergens: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Query parameters accepted by the menu list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MenuListParams {
    pub search: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub id: MenuId,
    pub title: String,
    pub instructions: Option<String>,
    pub ingredients: serde_json::Value,
    pub allergens: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuDBResponse> for MenuResponse {
    fn from(menu: MenuDBResponse) -> Self {
        Self {
            id: menu.id,
            title: menu.title,
            instructions: menu.instructions,
            ingredients: menu.ingredients,
            allergens: menu.allergens,
            tags: menu.tags,
            created_at: menu.created_at,
            updated_at: menu.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EventMenuCreateRequest {
    pub event_id: EventId,
    pub menu_id: MenuId,
    pub served_on: Option<NaiveDate>,
    pub meal_type: Option<String>,
    pub headcount: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventMenuUpdateRequest {
    pub served_on: Option<NaiveDate>,
    pub meal_type: Option<String>,
    pub headcount: Option<i32>,
}

/// Query parameters accepted by the event-menu list endpoint. The event is
/// mandatory; the day is optional.
#[derive(Debug, Deserialize, IntoParams)]
pub struct EventMenuListParams {
    pub event_id: EventId,
    pub served_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventMenuResponse {
    pub id: EventMenuId,
    pub event_id: EventId,
    pub menu_id: MenuId,
    pub served_on: Option<NaiveDate>,
    pub meal_type: Option<String>,
    pub headcount: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventMenuDBResponse> for EventMenuResponse {
    fn from(row: EventMenuDBResponse) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            menu_id: row.menu_id,
            served_on: row.served_on,
            meal_type: row.meal_type,
            headcount: row.headcount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_ingredients_pass() {
        let ingredients = json!([
            {"name": "spaghetti", "quantity": 500, "unit": "g"},
            {"name": "olive oil", "quantity": "2", "unit": "tbsp", "note": "extra virgin"}
        ]);
        assert!(validate_ingredients(&ingredients).is_ok());
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert!(validate_ingredients(&json!([])).is_ok());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let ingredients = json!([
            {"name": "spaghetti", "quantity": 500, "unit": "g"},
            {"name": "salt", "quantity": 1}
        ]);
        let err = validate_ingredients(&ingredients).unwrap_err();
        assert!(matches!(err, Error::BadRequest { ref message } if message.contains("'unit'")));
        assert!(err.user_message().contains("ingredient 1"));
    }

    #[test]
    fn test_null_and_empty_values_are_rejected() {
        let null_name = json!([{"name": null, "quantity": 1, "unit": "g"}]);
        assert!(validate_ingredients(&null_name).is_err());

        let empty_unit = json!([{"name": "salt", "quantity": 1, "unit": ""}]);
        assert!(validate_ingredients(&empty_unit).is_err());
    }

    #[test]
    fn test_non_list_and_non_object_entries_are_rejected() {
        assert!(validate_ingredients(&json!({"name": "salt"})).is_err());
        assert!(validate_ingredients(&json!(["just a string"])).is_err());
    }
}
