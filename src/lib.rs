//! Posyandu immunization engine core library
//!
//! Classifies each vaccine for a child as FUTURE, DUE, PARTIAL, COMPLETE or
//! MISSED, derives coverage and the four-tier patient status, and gates
//! dose recording through the session lifecycle. Persistence, auth and UI
//! live elsewhere; everything here takes plain records and returns plain
//! results.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod report;

pub use crate::core::{Calculator, Catalog, VaccineStatus, VaccineStatusEntry};
pub use crate::error::{CatalogError, LifecycleError};
