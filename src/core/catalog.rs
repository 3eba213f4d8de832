use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};
use validator::Validate;

use crate::error::CatalogError;
use crate::models::VaccineDefinition;

/// A vaccine catalog whose entries all passed validation.
///
/// The calculator only accepts a `Catalog`, so a series without an
/// interval or a dose count outside 1..=5 never reaches classification.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    vaccines: Vec<VaccineDefinition>,
}

impl Catalog {
    pub fn new(mut vaccines: Vec<VaccineDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(vaccines.len());
        for def in &vaccines {
            if let Err(source) = def.validate() {
                warn!(vaccine_id = %def.id, "rejecting invalid vaccine definition");
                return Err(CatalogError::InvalidDefinition {
                    id: def.id.clone(),
                    source,
                });
            }
            if !seen.insert(def.id.as_str()) {
                return Err(CatalogError::DuplicateId(def.id.clone()));
            }
        }

        vaccines.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        debug!(count = vaccines.len(), "catalog loaded");
        Ok(Self { vaccines })
    }

    /// Active entries in display order.
    pub fn active(&self) -> impl Iterator<Item = &VaccineDefinition> {
        self.vaccines.iter().filter(|def| def.is_active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn get(&self, id: &str) -> Option<&VaccineDefinition> {
        self.vaccines.iter().find(|def| def.id == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.get(id).map_or(false, |def| def.is_active)
    }

    pub fn all(&self) -> &[VaccineDefinition] {
        &self.vaccines
    }
}

impl TryFrom<Vec<VaccineDefinition>> for Catalog {
    type Error = CatalogError;

    fn try_from(vaccines: Vec<VaccineDefinition>) -> Result<Self, Self::Error> {
        Self::new(vaccines)
    }
}
