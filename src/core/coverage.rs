//! Coverage and the four-tier patient status used for dashboards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use crate::config::BEHIND_MARGIN;
use crate::models::DoseRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    Completed,
    OnTrack,
    Warning,
    Behind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientStatusSummary {
    pub given_count: u32,
    pub total_vaccines: u32,
    pub age_months: u32,
    pub expected: u32,
    pub progress_percent: u32,
    pub status: PatientStatus,
}

/// Distinct active vaccines with at least one recorded dose.
pub fn given_count(doses: &[DoseRecord], catalog: &Catalog) -> u32 {
    doses
        .iter()
        .map(|dose| dose.vaccine_id.as_str())
        .filter(|id| catalog.is_active(id))
        .collect::<HashSet<_>>()
        .len() as u32
}

pub fn progress_percent(given_count: u32, total_vaccines: u32) -> u32 {
    if total_vaccines == 0 {
        return 0;
    }
    (100.0 * f64::from(given_count) / f64::from(total_vaccines)).round() as u32
}

/// Number of vaccines a child is expected to have started by `age_months`.
pub fn expected_by_age(age_months: u32) -> u32 {
    match age_months {
        0..=12 => age_months,
        13..=24 => 12 + (age_months - 12) / 2,
        _ => 18,
    }
}

pub fn summarize(given_count: u32, total_vaccines: u32, age_months: u32) -> PatientStatusSummary {
    summarize_with_margin(given_count, total_vaccines, age_months, BEHIND_MARGIN)
}

pub fn summarize_with_margin(
    given_count: u32,
    total_vaccines: u32,
    age_months: u32,
    behind_margin: u32,
) -> PatientStatusSummary {
    let expected = expected_by_age(age_months);
    let status = if given_count >= total_vaccines {
        PatientStatus::Completed
    } else if given_count < expected.saturating_sub(behind_margin) {
        PatientStatus::Behind
    } else if given_count < expected {
        PatientStatus::Warning
    } else {
        PatientStatus::OnTrack
    };

    PatientStatusSummary {
        given_count,
        total_vaccines,
        age_months,
        expected,
        progress_percent: progress_percent(given_count, total_vaccines),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VaccineDefinition;
    use chrono::{TimeZone, Utc};
    use test_case::test_case;
    use uuid::Uuid;

    fn dose(vaccine_id: &str) -> DoseRecord {
        DoseRecord {
            patient_id: Uuid::nil(),
            vaccine_id: vaccine_id.to_string(),
            dose_number: Some(1),
            session_id: Uuid::nil(),
            given_at: Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn retired_and_unknown_vaccines_are_not_counted() {
        let catalog = Catalog::new(vec![
            VaccineDefinition::single("bcg", "BCG", 0),
            VaccineDefinition::single("campak", "Campak", 9),
            VaccineDefinition::single("je", "Japanese Encephalitis", 10).inactive(),
        ])
        .unwrap();
        let doses = vec![dose("bcg"), dose("bcg"), dose("je"), dose("rabies")];

        let given = given_count(&doses, &catalog);
        assert_eq!(given, 1);
        assert_eq!(progress_percent(given, catalog.active_count() as u32), 50);
    }

    #[test_case(0, 0 ; "birth")]
    #[test_case(12, 12 ; "first birthday")]
    #[test_case(13, 12 ; "slower after a year")]
    #[test_case(14, 13 ; "one more every two months")]
    #[test_case(24, 18 ; "second birthday")]
    #[test_case(60, 18 ; "capped")]
    fn expectation_curve(age: u32, expected: u32) {
        assert_eq!(expected_by_age(age), expected);
    }

    #[test_case(10, 10, 6, PatientStatus::Completed ; "all given")]
    #[test_case(3, 10, 6, PatientStatus::Behind ; "three short")]
    #[test_case(4, 10, 6, PatientStatus::Warning ; "two short")]
    #[test_case(5, 10, 6, PatientStatus::Warning ; "one short")]
    #[test_case(6, 10, 6, PatientStatus::OnTrack ; "on the curve")]
    #[test_case(0, 10, 1, PatientStatus::Warning ; "newborn margin does not underflow")]
    fn four_tier_status(given: u32, total: u32, age: u32, expected: PatientStatus) {
        assert_eq!(summarize(given, total, age).status, expected);
    }

    #[test_case(0, 0, 0 ; "empty catalog")]
    #[test_case(1, 3, 33 ; "rounds down")]
    #[test_case(2, 3, 67 ; "rounds up")]
    #[test_case(1, 8, 13 ; "half rounds away from zero")]
    fn progress_rounding(given: u32, total: u32, expected: u32) {
        assert_eq!(progress_percent(given, total), expected);
    }
}
