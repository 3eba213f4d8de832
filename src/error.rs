//! Error types for catalog validation and session mutations.
//!
//! The status calculator itself has no failure modes; these cover the
//! two places where bad input is rejected instead of defaulted.

use thiserror::Error;

use crate::models::{PatientId, SessionId, SessionStatus, VaccineId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid vaccine definition `{id}`: {source}")]
    InvalidDefinition {
        id: VaccineId,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("duplicate vaccine id `{0}` in catalog")]
    DuplicateId(VaccineId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("session cannot move from {from} to {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("session {0} is completed and locked")]
    Locked(SessionId),

    #[error("session {0} was cancelled")]
    SessionCancelled(SessionId),

    #[error("session {0} has not started yet")]
    NotStarted(SessionId),

    #[error("session cannot be completed with {waiting} waiting and {served} served")]
    CannotComplete { waiting: usize, served: usize },

    #[error("patient {0} is not registered for this session")]
    UnknownPatient(PatientId),

    #[error("attendance of patient {0} was cancelled")]
    AttendanceCancelled(PatientId),

    #[error("patient {0} has already been served")]
    AlreadyServed(PatientId),

    #[error("dose {dose_number} is outside 1..={total_doses} for vaccine `{vaccine_id}`")]
    DoseOutOfRange {
        vaccine_id: VaccineId,
        dose_number: u8,
        total_doses: u8,
    },

    #[error("dose {dose_number} of `{vaccine_id}` is already recorded for patient {patient_id}")]
    DuplicateDose {
        patient_id: PatientId,
        vaccine_id: VaccineId,
        dose_number: u8,
    },
}
