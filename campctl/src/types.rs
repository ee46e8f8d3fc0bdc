//! Common type definitions.
//!
//! Entity identifiers are `SERIAL` integers in PostgreSQL; the aliases below
//! keep signatures readable and make the ownership paths explicit:
//!
//! - [`GroupId`]: the tenant/principal. Tents and events reference it
//!   directly; reservations and inspections reach it through their tent.
//! - [`TentId`], [`EventId`], [`ReservationId`], [`InspectionId`]: resources.
//! - [`MenuId`], [`EventMenuId`]: the (unscoped) recipe catalog.
//! - [`UserId`]: the inspecting person recorded on an inspection.

pub type GroupId = i32;
pub type TentId = i32;
pub type EventId = i32;
pub type ReservationId = i32;
pub type InspectionId = i32;
pub type MenuId = i32;
pub type EventMenuId = i32;
pub type UserId = i32;
