//! Database models for reservations.
//!
//! A reservation carries no group column; it is owned by whichever group
//! owns the referenced tent.

use crate::types::{EventId, ReservationId, TentId};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct ReservationCreateDBRequest {
    pub tent_id: TentId,
    pub event_id: EventId,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ReservationUpdateDBRequest {
    pub tent_id: Option<TentId>,
    pub event_id: Option<EventId>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReservationDBResponse {
    pub id: ReservationId,
    pub tent_id: TentId,
    pub event_id: EventId,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
