use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::history::BookingRecord;
use crate::slots::parse_slot_time;

/// A physical spa location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub location: String,
}

/// A bookable treatment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Minutes
    pub duration: u32,
    /// THB
    pub price: u32,
}

/// A therapist and the services they can perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: String,
    pub specialty: Vec<String>,
}

impl Staff {
    pub fn performs(&self, service_id: &str) -> bool {
        self.specialty.iter().any(|id| id == service_id)
    }
}

/// Opening hours and closures, shared by the whole booking session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Hour 0-23
    pub open_hour: u32,
    /// Hour 1-24, exclusive
    pub close_hour: u32,
    /// Minutes between slot starts
    pub slot_interval: u32,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl ShopConfig {
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.close_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "close_hour must be at most 24, got {}",
                self.close_hour
            )));
        }
        if self.open_hour >= self.close_hour {
            return Err(ConfigError::Invalid(format!(
                "open_hour ({}) must be before close_hour ({})",
                self.open_hour, self.close_hour
            )));
        }
        if self.slot_interval == 0 {
            return Err(ConfigError::Invalid("slot_interval must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            open_hour: 10,
            close_hour: 20,
            slot_interval: 30,
            holidays: Vec::new(),
        }
    }
}

/// Per-staff availability, standing in for a scheduling backend
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaffSchedule {
    pub staff_id: String,
    #[serde(default)]
    pub off_days: Vec<NaiveDate>,
    /// Date -> "HH:MM" start times already taken
    #[serde(default)]
    pub busy_slots: BTreeMap<NaiveDate, Vec<String>>,
}

impl StaffSchedule {
    pub fn is_off(&self, date: NaiveDate) -> bool {
        self.off_days.contains(&date)
    }

    pub fn is_busy(&self, date: NaiveDate, time: &str) -> bool {
        self.busy_slots
            .get(&date)
            .is_some_and(|times| times.iter().any(|t| t == time))
    }
}

/// Immutable booking catalog passed into the wizard at construction time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub branches: Vec<Branch>,
    pub services: Vec<Service>,
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub schedules: Vec<StaffSchedule>,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub history: Vec<BookingRecord>,
}

impl Catalog {
    /// Load the default catalog compiled into the binary
    pub fn embedded() -> Result<Self, ConfigError> {
        const EMBEDDED_CATALOG: &str = include_str!("../config/catalog.json");
        Self::from_json(EMBEDDED_CATALOG, "<embedded>")
    }

    /// Load an alternate catalog, e.g. a test fixture or a branch-specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let catalog = Self::from_json(&content, &path.display().to_string())?;
        tracing::info!(
            "[catalog] Loaded {} branches, {} services, {} staff from {}",
            catalog.branches.len(),
            catalog.services.len(),
            catalog.staff.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| ConfigError::LoadFailed {
                path: origin.to_string(),
                source: Box::new(e),
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check cross references and shop hours
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shop.validate()?;

        ensure_unique("branch", self.branches.iter().map(|b| b.id.as_str()))?;
        ensure_unique("service", self.services.iter().map(|s| s.id.as_str()))?;
        ensure_unique("staff", self.staff.iter().map(|s| s.id.as_str()))?;
        ensure_unique("schedule", self.schedules.iter().map(|s| s.staff_id.as_str()))?;

        for member in &self.staff {
            if let Some(unknown) = member.specialty.iter().find(|id| self.service(id).is_none()) {
                return Err(ConfigError::Invalid(format!(
                    "staff {} lists unknown service {}",
                    member.id, unknown
                )));
            }
        }

        for schedule in &self.schedules {
            if self.staff_member(&schedule.staff_id).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "schedule for unknown staff {}",
                    schedule.staff_id
                )));
            }
            for time in schedule.busy_slots.values().flatten() {
                if parse_slot_time(time).is_none() {
                    return Err(ConfigError::Invalid(format!(
                        "schedule for {} has malformed time {:?}",
                        schedule.staff_id, time
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn staff_member(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    pub fn schedule_for(&self, staff_id: &str) -> Option<&StaffSchedule> {
        self.schedules.iter().find(|s| s.staff_id == staff_id)
    }

    /// Staff able to perform a service, in roster order
    pub fn staff_for_service<'a>(&'a self, service_id: &'a str) -> impl Iterator<Item = &'a Staff> {
        self.staff.iter().filter(move |s| s.performs(service_id))
    }
}

fn ensure_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigError::Invalid(format!("duplicate {} id {}", kind, id)));
        }
    }
    Ok(())
}
