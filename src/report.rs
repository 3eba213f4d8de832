//! Dashboard aggregates built on top of the calculator and lifecycle.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::core::coverage::{given_count, progress_percent, summarize_with_margin};
use crate::core::{Calculator, Catalog, LifecycleVerdict, PatientStatus, PatientStatusSummary, VaccineStatusEntry};
use crate::models::{DoseRecord, OutcomeCounts, Patient, PatientId, Session, SessionId, SessionStatus, VaccineId};

/// One row of the immunization matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRow {
    pub patient_id: PatientId,
    pub name: String,
    pub age_months: u32,
    pub vaccines: Vec<VaccineStatusEntry>,
    pub summary: PatientStatusSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmunizationMatrix {
    pub evaluated_on: NaiveDate,
    pub rows: Vec<PatientRow>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    pub completed: usize,
    pub on_track: usize,
    pub warning: usize,
    pub behind: usize,
}

impl StatusTally {
    fn add(&mut self, status: PatientStatus) {
        match status {
            PatientStatus::Completed => self.completed += 1,
            PatientStatus::OnTrack => self.on_track += 1,
            PatientStatus::Warning => self.warning += 1,
            PatientStatus::Behind => self.behind += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineCoverage {
    pub vaccine_id: VaccineId,
    pub vaccine_name: String,
    pub patients_with_dose: usize,
    pub coverage_percent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub evaluated_on: NaiveDate,
    pub population: usize,
    pub tally: StatusTally,
    pub vaccines: Vec<VaccineCoverage>,
    pub mean_progress_percent: u32,
}

/// Evaluates every patient against the catalog as of `on`.
#[instrument(skip_all, fields(patient_count = patients.len(), dose_count = doses.len()))]
pub fn immunization_matrix(
    calculator: &Calculator,
    patients: &[Patient],
    doses: &[DoseRecord],
    catalog: &Catalog,
    on: NaiveDate,
) -> ImmunizationMatrix {
    let mut by_patient: HashMap<PatientId, Vec<DoseRecord>> = HashMap::new();
    for dose in doses {
        by_patient.entry(dose.patient_id).or_default().push(dose.clone());
    }

    let total_vaccines = catalog.active_count() as u32;
    let rows = patients
        .iter()
        .map(|patient| {
            let history = by_patient.get(&patient.id).map(Vec::as_slice).unwrap_or(&[]);
            let age_months = calculator.age_in_months(patient.birth_date, on);
            let vaccines = calculator.evaluate_at_age(age_months, history, catalog);
            let summary = summarize_with_margin(
                given_count(history, catalog),
                total_vaccines,
                age_months,
                calculator.config().behind_margin,
            );
            PatientRow {
                patient_id: patient.id,
                name: patient.name.clone(),
                age_months,
                vaccines,
                summary,
            }
        })
        .collect();

    ImmunizationMatrix { evaluated_on: on, rows }
}

impl CoverageReport {
    pub fn from_matrix(matrix: &ImmunizationMatrix, catalog: &Catalog) -> Self {
        let population = matrix.rows.len();
        let mut tally = StatusTally::default();
        let mut with_dose: HashMap<&str, usize> = HashMap::new();
        let mut progress_sum = 0u64;

        for row in &matrix.rows {
            tally.add(row.summary.status);
            progress_sum += u64::from(row.summary.progress_percent);
            for entry in &row.vaccines {
                if entry.latest_dose.is_some() {
                    *with_dose.entry(entry.vaccine_id.as_str()).or_default() += 1;
                }
            }
        }

        let vaccines = catalog
            .active()
            .map(|def| {
                let patients_with_dose = with_dose.get(def.id.as_str()).copied().unwrap_or(0);
                VaccineCoverage {
                    vaccine_id: def.id.clone(),
                    vaccine_name: def.name.clone(),
                    patients_with_dose,
                    coverage_percent: progress_percent(patients_with_dose as u32, population as u32),
                }
            })
            .collect();

        let mean_progress_percent = if population == 0 {
            0
        } else {
            (progress_sum as f64 / population as f64).round() as u32
        };

        Self {
            evaluated_on: matrix.evaluated_on,
            population,
            tally,
            vaccines,
            mean_progress_percent,
        }
    }

    pub fn build(
        calculator: &Calculator,
        patients: &[Patient],
        doses: &[DoseRecord],
        catalog: &Catalog,
        on: NaiveDate,
    ) -> Self {
        let matrix = immunization_matrix(calculator, patients, doses, catalog, on);
        let report = Self::from_matrix(&matrix, catalog);
        info!(
            population = report.population,
            behind = report.tally.behind,
            mean_progress = report.mean_progress_percent,
            "coverage report built"
        );
        report
    }
}

/// Head counts and dose totals for one posyandu day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub date: NaiveDate,
    pub status: SessionStatus,
    pub target: usize,
    pub counts: OutcomeCounts,
    pub served_percent: u32,
    pub doses_given: usize,
    pub doses_by_vaccine: BTreeMap<VaccineId, usize>,
    pub verdict: LifecycleVerdict,
}

impl SessionSummary {
    pub fn from_session(session: &Session) -> Self {
        let counts = session.counts();
        let mut doses_by_vaccine = BTreeMap::new();
        for dose in session.doses() {
            *doses_by_vaccine.entry(dose.vaccine_id.clone()).or_insert(0) += 1;
        }

        Self {
            session_id: session.id,
            date: session.date,
            status: session.status,
            target: counts.total(),
            counts,
            served_percent: progress_percent(counts.served as u32, counts.total() as u32),
            doses_given: doses_by_vaccine.values().sum(),
            doses_by_vaccine,
            verdict: session.verdict(),
        }
    }
}
