//! Per-vaccine status classification.
//!
//! Statuses are projections: they are recomputed from the catalog and the
//! dose history on every call and never stored.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::age::age_in_months_with;
use super::catalog::Catalog;
use crate::config::EngineConfig;
use crate::models::{DoseRecord, VaccineDefinition, VaccineId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaccineStatus {
    Future,
    Due,
    Partial,
    Complete,
    Missed,
}

/// Classification of one vaccine for one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineStatusEntry {
    pub vaccine_id: VaccineId,
    pub vaccine_name: String,
    pub status: VaccineStatus,
    pub label: String,
    pub latest_dose: Option<u8>,
    pub total_doses: u8,
    /// Earliest date for the next dose of a partially given series.
    pub next_dose_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: EngineConfig,
}

impl Calculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn age_in_months(&self, birth_date: NaiveDate, on: NaiveDate) -> u32 {
        age_in_months_with(birth_date, on, self.config.days_per_month)
    }

    /// Classify one vaccine given the child's age and full dose history.
    ///
    /// Order matters: any recorded dose wins over the age checks, and the
    /// missed check runs before the future check.
    pub fn classify(
        &self,
        vaccine: &VaccineDefinition,
        age_months: u32,
        doses: &[DoseRecord],
    ) -> VaccineStatusEntry {
        let taken: Vec<&DoseRecord> = doses
            .iter()
            .filter(|dose| dose.vaccine_id == vaccine.id)
            .collect();
        let latest_dose = taken.iter().map(|dose| dose.dose_number_or_default()).max();

        let (status, label, next_dose_on) = match latest_dose {
            Some(latest) if latest >= vaccine.total_doses => {
                (VaccineStatus::Complete, "Lengkap".to_string(), None)
            }
            Some(latest) => {
                let next = taken
                    .iter()
                    .map(|dose| dose.given_at.date_naive())
                    .max()
                    .zip(vaccine.interval_days)
                    .and_then(|(last, interval)| last.checked_add_days(Days::new(interval.into())));
                (
                    VaccineStatus::Partial,
                    format!("Dosis {}/{}", latest, vaccine.total_doses),
                    next,
                )
            }
            None if age_months > vaccine.age_month_min.saturating_add(self.config.due_grace_months) => {
                (VaccineStatus::Missed, "Terlewat".to_string(), None)
            }
            None if age_months < vaccine.age_month_min => (
                VaccineStatus::Future,
                format!("Mulai Usia {} Bln", vaccine.age_month_min),
                None,
            ),
            None => (VaccineStatus::Due, "Jadwal Sekarang".to_string(), None),
        };

        debug!(vaccine_id = %vaccine.id, age_months, ?status, "classified vaccine");

        VaccineStatusEntry {
            vaccine_id: vaccine.id.clone(),
            vaccine_name: vaccine.name.clone(),
            status,
            label,
            latest_dose,
            total_doses: vaccine.total_doses,
            next_dose_on,
        }
    }

    /// Classify every active catalog entry for a child of `age_months`.
    pub fn evaluate_at_age(
        &self,
        age_months: u32,
        doses: &[DoseRecord],
        catalog: &Catalog,
    ) -> Vec<VaccineStatusEntry> {
        catalog
            .active()
            .map(|vaccine| self.classify(vaccine, age_months, doses))
            .collect()
    }

    #[instrument(skip(self, doses, catalog), fields(dose_count = doses.len()))]
    pub fn evaluate_patient(
        &self,
        birth_date: NaiveDate,
        on: NaiveDate,
        doses: &[DoseRecord],
        catalog: &Catalog,
    ) -> Vec<VaccineStatusEntry> {
        let age_months = self.age_in_months(birth_date, on);
        self.evaluate_at_age(age_months, doses, catalog)
    }

    /// Vaccines that may be offered on the dosing form at this visit.
    pub fn eligible_for_visit<'a>(
        &self,
        age_months: u32,
        catalog: &'a Catalog,
    ) -> Vec<&'a VaccineDefinition> {
        catalog
            .active()
            .filter(|vaccine| vaccine.covers_age(age_months))
            .collect()
    }
}

/// [`Calculator::evaluate_patient`] under the standard policy.
pub fn evaluate_patient(
    birth_date: NaiveDate,
    on: NaiveDate,
    doses: &[DoseRecord],
    catalog: &Catalog,
) -> Vec<VaccineStatusEntry> {
    Calculator::default().evaluate_patient(birth_date, on, doses, catalog)
}

/// [`Calculator::eligible_for_visit`] under the standard policy.
pub fn eligible_for_visit(age_months: u32, catalog: &Catalog) -> Vec<&VaccineDefinition> {
    Calculator::default().eligible_for_visit(age_months, catalog)
}
