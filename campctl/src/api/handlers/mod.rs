//! Axum handler functions, one module per resource.

pub mod auth;
pub mod events;
pub mod groups;
pub mod inspections;
pub mod menus;
pub mod reservations;
pub mod tents;
