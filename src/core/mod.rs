//! Immunization engine: status calculator, coverage, session lifecycle.

pub mod age;
pub mod catalog;
pub mod coverage;
pub mod eligibility;
pub mod lifecycle;

pub use age::age_in_months;
pub use catalog::Catalog;
pub use coverage::{expected_by_age, given_count, progress_percent, summarize, PatientStatus, PatientStatusSummary};
pub use eligibility::{eligible_for_visit, evaluate_patient, Calculator, VaccineStatus, VaccineStatusEntry};
pub use lifecycle::{can_complete, evaluate, is_locked, LifecycleVerdict, Transition};
