//! Entity catalogs
//!
//! Each catalog wires one entity's remote endpoints to the shared list,
//! filter and detail machinery and owns its cache and coordinator.

pub mod detail;
pub mod list;
pub mod movies;
pub mod people;
pub mod tv;

pub use detail::{DetailState, DetailStore};
pub use list::{ListKind, ListSource, ListState, ListStore};
pub use movies::MovieCatalog;
pub use people::{PersonCatalog, PersonMedia};
pub use tv::TvCatalog;
