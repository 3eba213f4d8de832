use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dose::DoseRecord;
use super::patient::PatientId;

pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Upcoming => "UPCOMING",
            SessionStatus::Ongoing => "ONGOING",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// What happened to one registered child during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitOutcome {
    Waiting,
    Served {
        #[serde(default)]
        doses: Vec<DoseRecord>,
        #[serde(default)]
        notes: Option<String>,
    },
    Cancelled {
        #[serde(default)]
        notes: Option<String>,
    },
}

impl VisitOutcome {
    pub fn doses(&self) -> &[DoseRecord] {
        match self {
            VisitOutcome::Served { doses, .. } => doses,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub patient_id: PatientId,
    pub outcome: VisitOutcome,
}

/// Per-outcome head counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub waiting: usize,
    pub served: usize,
    pub cancelled: usize,
}

impl OutcomeCounts {
    pub fn tally(attendance: &[Attendance]) -> Self {
        attendance
            .iter()
            .fold(Self::default(), |mut counts, entry| {
                match entry.outcome {
                    VisitOutcome::Waiting => counts.waiting += 1,
                    VisitOutcome::Served { .. } => counts.served += 1,
                    VisitOutcome::Cancelled { .. } => counts.cancelled += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.waiting + self.served + self.cancelled
    }
}

/// One scheduled posyandu visit day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub date: NaiveDate,
    pub status: SessionStatus,
    #[serde(default)]
    pub attendance: Vec<Attendance>,
}
