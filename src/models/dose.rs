use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patient::PatientId;
use super::session::SessionId;
use super::vaccine::VaccineId;

/// One administered dose. Records are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseRecord {
    pub patient_id: PatientId,
    pub vaccine_id: VaccineId,
    #[serde(default)]
    pub dose_number: Option<u8>,
    pub session_id: SessionId,
    pub given_at: DateTime<Utc>,
}

impl DoseRecord {
    /// Legacy rows without a dose number count as the first dose.
    pub fn dose_number_or_default(&self) -> u8 {
        self.dose_number.unwrap_or(1)
    }
}
