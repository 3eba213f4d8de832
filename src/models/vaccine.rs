use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub type VaccineId = String;

/// One entry of the immunization catalog.
///
/// Missing age bounds deserialize as `0` and unbounded respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_series"))]
pub struct VaccineDefinition {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub age_month_min: u32,
    #[serde(default)]
    pub age_month_max: Option<u32>,
    #[validate(range(min = 1, max = 5))]
    pub total_doses: u8,
    #[serde(default)]
    pub interval_days: Option<u32>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_series(def: &VaccineDefinition) -> Result<(), ValidationError> {
    if def.total_doses > 1 && def.interval_days.is_none() {
        return Err(ValidationError::new("interval_days_required"));
    }
    if let Some(max) = def.age_month_max {
        if max < def.age_month_min {
            return Err(ValidationError::new("age_window_inverted"));
        }
    }
    Ok(())
}

impl VaccineDefinition {
    /// Single-dose vaccine recommended from `age_month_min` onwards.
    pub fn single(id: impl Into<VaccineId>, name: impl Into<String>, age_month_min: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age_month_min,
            age_month_max: None,
            total_doses: 1,
            interval_days: None,
            order: 0,
            is_active: true,
        }
    }

    /// Multi-dose series with a fixed interval between doses.
    pub fn series(
        id: impl Into<VaccineId>,
        name: impl Into<String>,
        age_month_min: u32,
        total_doses: u8,
        interval_days: u32,
    ) -> Self {
        Self {
            total_doses,
            interval_days: Some(interval_days),
            ..Self::single(id, name, age_month_min)
        }
    }

    pub fn with_max_age(mut self, age_month_max: u32) -> Self {
        self.age_month_max = Some(age_month_max);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Inclusive dose window check; an absent maximum is unbounded.
    pub fn covers_age(&self, age_months: u32) -> bool {
        age_months >= self.age_month_min
            && self.age_month_max.map_or(true, |max| age_months <= max)
    }

    pub fn accepts_dose_number(&self, dose_number: u8) -> bool {
        (1..=self.total_doses).contains(&dose_number)
    }
}
