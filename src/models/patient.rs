use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PatientId = Uuid;

/// A child registered at the posyandu.
///
/// Only `birth_date` feeds the engine; the remaining fields ride along so
/// reports can name the child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
}

impl Patient {
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            birth_date,
            sex: None,
            guardian_name: None,
        }
    }
}
