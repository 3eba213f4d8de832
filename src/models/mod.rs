//! Plain records exchanged with the persistence layer.

pub mod dose;
pub mod patient;
pub mod session;
pub mod vaccine;

pub use dose::DoseRecord;
pub use patient::{Patient, PatientId};
pub use session::{Attendance, OutcomeCounts, Session, SessionId, SessionStatus, VisitOutcome};
pub use vaccine::{VaccineDefinition, VaccineId};
