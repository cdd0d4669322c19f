use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::availability::UnavailableReason;
use crate::wizard::WizardStep;

/// Booking-level errors using thiserror for structured error handling.
///
/// None of these are fatal: every variant describes a rejected input that the
/// user can correct, and the wizard stays on the step it was on.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Action not available on step {actual} (expected {expected})")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("No {0} selected")]
    MissingSelection(&'static str),

    #[error("Unknown branch: {0}")]
    UnknownBranch(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown staff member: {0}")]
    UnknownStaff(String),

    #[error("Unknown time slot: {0}")]
    UnknownTimeSlot(String),

    #[error("Shop is closed on {0}")]
    Holiday(NaiveDate),

    #[error("Date {0} is outside the booking window")]
    OutsideWindow(NaiveDate),

    #[error("Time slot {0} is not available")]
    SlotUnavailable(String),

    #[error("{staff} is not available ({reason})")]
    StaffUnavailable {
        staff: String,
        reason: UnavailableReason,
    },

    #[error("{staff} does not perform {service}")]
    MissingSpecialty { staff: String, service: String },

    #[error("Contact details are incomplete")]
    InvalidContact(Vec<ContactError>),

    #[error("No step follows {0}")]
    NoNextStep(WizardStep),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("No submission is in progress")]
    NotSubmitting,

    #[error("Booking already completed; reset to start a new one")]
    AlreadyCompleted,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactError {
    #[error("Name is required")]
    EmptyName,

    #[error("Invalid mobile number (e.g. 0812345678)")]
    InvalidPhone,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine user config directory")]
    NoConfigDir,
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Recommendation service is not configured")]
    NotConfigured,

    #[error("Recommendation request failed")]
    RequestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Malformed recommendation response")]
    MalformedResponse(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Recommended service does not exist: {0}")]
    UnknownService(String),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = TransitionError::MissingSelection("service");
        assert_eq!(err.to_string(), "No service selected");

        let err = TransitionError::StaffUnavailable {
            staff: "Somsri".to_string(),
            reason: UnavailableReason::DayOff,
        };
        assert_eq!(err.to_string(), "Somsri is not available (day off)");

        let err = ContactError::EmptyName;
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/catalog.json".to_string(),
            source: Box::new(io_err),
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/catalog.json"
        );
    }
}
