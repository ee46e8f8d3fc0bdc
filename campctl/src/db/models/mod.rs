//! Database record structures matching table schemas.
//!
//! Each entity has three shapes: a `*CreateDBRequest` built by the API layer
//! (with ownership already stamped), a `*UpdateDBRequest` of optional fields
//! applied via `COALESCE`, and a `*DBResponse` row image.

pub mod events;
pub mod groups;
pub mod inspections;
pub mod menus;
pub mod reservations;
pub mod tents;
