use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::DailySchedule;
use super::tax_id::normalize_cpf;
use super::{check_email, new_id, require_text};
use crate::errors::ServiceError;

/// Registration input for a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProvider {
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub catalogs: Vec<Uuid>,
}

/// Aggregate root: a service professional with offered catalogs and the
/// daily schedules it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    /// Normalized 11-digit CPF.
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub active: bool,
    pub catalogs: BTreeSet<Uuid>,
    /// At most one schedule per date.
    pub schedules: BTreeMap<NaiveDate, DailySchedule>,
}

impl Provider {
    /// Validates contact data and the tax id. Catalog existence is checked
    /// by the caller, which has access to the catalog store.
    pub fn new(input: NewProvider) -> Result<Self, ServiceError> {
        let invalid = ServiceError::InvalidProvider;
        require_text(&input.name, "name").map_err(invalid)?;
        require_text(&input.phone, "phone").map_err(invalid)?;
        check_email(input.email.as_deref()).map_err(invalid)?;
        if input.catalogs.is_empty() {
            return Err(invalid("at least one catalog required".into()));
        }
        let tax_id = normalize_cpf(&input.tax_id)?;
        Ok(Self {
            id: new_id(),
            name: input.name.trim().to_string(),
            tax_id,
            email: input.email,
            phone: input.phone.trim().to_string(),
            active: true,
            catalogs: input.catalogs.into_iter().collect(),
            schedules: BTreeMap::new(),
        })
    }

    pub fn offers(&self, catalog_id: Uuid) -> bool {
        self.catalogs.contains(&catalog_id)
    }

    pub fn ensure_active(&self) -> Result<(), ServiceError> {
        if self.active { Ok(()) } else { Err(ServiceError::ProviderInactive(self.id)) }
    }

    pub fn schedule_for(&self, date: NaiveDate) -> Option<&DailySchedule> {
        self.schedules.get(&date)
    }

    pub fn ensure_date_free(&self, date: NaiveDate) -> Result<(), ServiceError> {
        if self.schedules.contains_key(&date) {
            return Err(ServiceError::DuplicateSchedule(date));
        }
        Ok(())
    }

    /// Attach a schedule; never merges into an existing one.
    pub fn add_schedule(&mut self, schedule: DailySchedule) -> Result<(), ServiceError> {
        self.ensure_active()?;
        self.ensure_date_free(schedule.date)?;
        self.schedules.insert(schedule.date, schedule);
        Ok(())
    }
}
