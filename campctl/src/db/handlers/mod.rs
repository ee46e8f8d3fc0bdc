//! Repository layer over `PgConnection`.
//!
//! Group-scoped repositories (`Tents`, `Events`, `Reservations`,
//! `Inspections`) are constructed with the acting group id; `Groups` handles
//! registration and credentials; `Menus`/`EventMenus` are the shared catalog.

pub mod events;
pub mod groups;
pub mod inspections;
pub mod menus;
pub mod repository;
pub mod reservations;
pub mod tents;

pub use events::Events;
pub use groups::Groups;
pub use inspections::Inspections;
pub use menus::{EventMenus, Menus};
pub use repository::Repository;
pub use reservations::Reservations;
pub use tents::Tents;
