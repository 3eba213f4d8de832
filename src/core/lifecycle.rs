//! Session lifecycle: UPCOMING → ONGOING → COMPLETED, with CANCELLED as the
//! alternative terminal state.
//!
//! A COMPLETED session is locked. Every write path checks the lock before
//! touching attendance or dose records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::LifecycleError;
use crate::models::{
    Attendance, DoseRecord, OutcomeCounts, PatientId, Session, SessionStatus, VaccineDefinition,
    VisitOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleVerdict {
    pub can_complete: bool,
    pub is_locked: bool,
}

/// A status change the storage layer must apply as
/// `UPDATE ... SET status = to WHERE status = from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

pub fn is_locked(status: SessionStatus) -> bool {
    status == SessionStatus::Completed
}

pub fn can_complete(status: SessionStatus, counts: OutcomeCounts) -> bool {
    !status.is_terminal() && counts.waiting == 0 && counts.served >= 1
}

pub fn evaluate(status: SessionStatus, counts: OutcomeCounts) -> LifecycleVerdict {
    LifecycleVerdict {
        can_complete: can_complete(status, counts),
        is_locked: is_locked(status),
    }
}

pub fn can_transition(from: SessionStatus, to: SessionStatus) -> bool {
    use SessionStatus::*;

    matches!(
        (from, to),
        (Upcoming, Ongoing) | (Ongoing, Completed) | (Upcoming, Cancelled) | (Ongoing, Cancelled)
    )
}

impl Session {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            status: SessionStatus::Upcoming,
            attendance: Vec::new(),
        }
    }

    pub fn counts(&self) -> OutcomeCounts {
        OutcomeCounts::tally(&self.attendance)
    }

    pub fn is_locked(&self) -> bool {
        is_locked(self.status)
    }

    pub fn verdict(&self) -> LifecycleVerdict {
        evaluate(self.status, self.counts())
    }

    pub fn attendance_of(&self, patient_id: PatientId) -> Option<&Attendance> {
        self.attendance.iter().find(|a| a.patient_id == patient_id)
    }

    /// Every dose recorded in this session, in recording order per patient.
    pub fn doses(&self) -> impl Iterator<Item = &DoseRecord> {
        self.attendance.iter().flat_map(|a| a.outcome.doses())
    }

    pub fn start(&mut self) -> Result<Transition, LifecycleError> {
        self.transition(SessionStatus::Ongoing)
    }

    pub fn cancel(&mut self) -> Result<Transition, LifecycleError> {
        self.transition(SessionStatus::Cancelled)
    }

    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn complete(&mut self) -> Result<Transition, LifecycleError> {
        let counts = self.counts();
        if can_transition(self.status, SessionStatus::Completed) && !can_complete(self.status, counts) {
            warn!(waiting = counts.waiting, served = counts.served, "completion refused");
            return Err(LifecycleError::CannotComplete {
                waiting: counts.waiting,
                served: counts.served,
            });
        }
        self.transition(SessionStatus::Completed)
    }

    fn transition(&mut self, to: SessionStatus) -> Result<Transition, LifecycleError> {
        let from = self.status;
        if !can_transition(from, to) {
            return Err(LifecycleError::InvalidTransition { from, to });
        }
        self.status = to;
        info!(session_id = %self.id, %from, %to, "session transitioned");
        Ok(Transition { from, to })
    }

    /// Adds a child to the waiting list. Registering twice is a no-op.
    pub fn register(&mut self, patient_id: PatientId) -> Result<(), LifecycleError> {
        self.ensure_writable()?;
        if self.attendance_of(patient_id).is_none() {
            self.attendance.push(Attendance {
                patient_id,
                outcome: VisitOutcome::Waiting,
            });
        }
        Ok(())
    }

    /// Marks a child as served without a dose, e.g. weighing only.
    pub fn mark_served(
        &mut self,
        patient_id: PatientId,
        notes: Option<String>,
    ) -> Result<(), LifecycleError> {
        self.ensure_recording()?;
        let attendance = self.attendance_mut(patient_id)?;
        match attendance.outcome {
            VisitOutcome::Cancelled { .. } => {
                return Err(LifecycleError::AttendanceCancelled(patient_id));
            }
            VisitOutcome::Served {
                notes: ref mut existing,
                ..
            } => {
                if notes.is_some() {
                    *existing = notes;
                }
            }
            VisitOutcome::Waiting => {
                attendance.outcome = VisitOutcome::Served {
                    doses: Vec::new(),
                    notes,
                };
            }
        }
        Ok(())
    }

    #[instrument(skip(self, vaccine), fields(session_id = %self.id, vaccine_id = %vaccine.id))]
    pub fn record_dose(
        &mut self,
        patient_id: PatientId,
        vaccine: &VaccineDefinition,
        dose_number: u8,
        given_at: DateTime<Utc>,
    ) -> Result<DoseRecord, LifecycleError> {
        self.ensure_recording()?;
        if !vaccine.accepts_dose_number(dose_number) {
            return Err(LifecycleError::DoseOutOfRange {
                vaccine_id: vaccine.id.clone(),
                dose_number,
                total_doses: vaccine.total_doses,
            });
        }

        let session_id = self.id;
        let attendance = self.attendance_mut(patient_id)?;
        if matches!(attendance.outcome, VisitOutcome::Cancelled { .. }) {
            return Err(LifecycleError::AttendanceCancelled(patient_id));
        }
        let duplicate = attendance
            .outcome
            .doses()
            .iter()
            .any(|d| d.vaccine_id == vaccine.id && d.dose_number_or_default() == dose_number);
        if duplicate {
            return Err(LifecycleError::DuplicateDose {
                patient_id,
                vaccine_id: vaccine.id.clone(),
                dose_number,
            });
        }

        let record = DoseRecord {
            patient_id,
            vaccine_id: vaccine.id.clone(),
            dose_number: Some(dose_number),
            session_id,
            given_at,
        };
        match &mut attendance.outcome {
            VisitOutcome::Served { doses, .. } => doses.push(record.clone()),
            outcome => {
                *outcome = VisitOutcome::Served {
                    doses: vec![record.clone()],
                    notes: None,
                }
            }
        }
        info!(%patient_id, dose_number, "dose recorded");
        Ok(record)
    }

    /// Cancels a waiting child's attendance. SERVED is final, with or
    /// without doses; cancelling twice only replaces the notes.
    pub fn cancel_attendance(
        &mut self,
        patient_id: PatientId,
        notes: Option<String>,
    ) -> Result<(), LifecycleError> {
        self.ensure_writable()?;
        let attendance = self.attendance_mut(patient_id)?;
        if let VisitOutcome::Served { .. } = attendance.outcome {
            return Err(LifecycleError::AlreadyServed(patient_id));
        }
        attendance.outcome = VisitOutcome::Cancelled { notes };
        Ok(())
    }

    fn attendance_mut(&mut self, patient_id: PatientId) -> Result<&mut Attendance, LifecycleError> {
        self.attendance
            .iter_mut()
            .find(|a| a.patient_id == patient_id)
            .ok_or(LifecycleError::UnknownPatient(patient_id))
    }

    fn ensure_writable(&self) -> Result<(), LifecycleError> {
        if self.is_locked() {
            warn!(session_id = %self.id, "write rejected on locked session");
            return Err(LifecycleError::Locked(self.id));
        }
        if self.status == SessionStatus::Cancelled {
            return Err(LifecycleError::SessionCancelled(self.id));
        }
        Ok(())
    }

    fn ensure_recording(&self) -> Result<(), LifecycleError> {
        self.ensure_writable()?;
        if self.status == SessionStatus::Upcoming {
            return Err(LifecycleError::NotStarted(self.id));
        }
        Ok(())
    }
}
