//! Request and response bodies for the HTTP API.

pub mod auth;
pub mod events;
pub mod groups;
pub mod inspections;
pub mod menus;
pub mod reservations;
pub mod tents;
