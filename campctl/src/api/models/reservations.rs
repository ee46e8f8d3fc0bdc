//! API models for reservations.

use crate::db::models::reservations::ReservationDBResponse;
use crate::types::{EventId, ReservationId, TentId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReservationCreateRequest {
    pub tent_id: TentId,
    pub event_id: EventId,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReservationUpdateRequest {
    pub tent_id: Option<TentId>,
    pub event_id: Option<EventId>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

/// Query parameters accepted by the reservation list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReservationListParams {
    pub tent_id: Option<TentId>,
    pub event_id: Option<EventId>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub tent_id: TentId,
    pub event_id: EventId,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReservationDBResponse> for ReservationResponse {
    fn from(reservation: ReservationDBResponse) -> Self {
        Self {
            id: reservation.id,
            tent_id: reservation.tent_id,
            event_id: reservation.event_id,
            starts_on: reservation.starts_on,
            ends_on: reservation.ends_on,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}
