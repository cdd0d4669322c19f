/// Booking draft state
///
/// The draft is built one field per step and is owned by the active session.
use chrono::NaiveDate;
use serde::Serialize;

use super::steps::WizardStep;
use crate::calendar::format_thai_date;
use crate::catalog::{Branch, Service, Staff};
use crate::contact::ContactForm;
use crate::slots::TimeSlot;

/// In-progress selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingDraft {
    pub branch: Option<Branch>,
    pub service: Option<Service>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub staff: Option<Staff>,
    pub contact: ContactForm,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the field produced by `step` is set
    pub fn has_field_for(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::BranchSelection => self.branch.is_some(),
            WizardStep::ServiceSelection => self.service.is_some(),
            WizardStep::DateSelection => self.date.is_some(),
            WizardStep::TimeSelection => self.time_slot.is_some(),
            WizardStep::StaffSelection => self.staff.is_some(),
            WizardStep::Confirmation => self.contact.can_submit(),
            WizardStep::Success | WizardStep::MyBookings => true,
        }
    }

    /// First missing selection on the booking path, if any
    pub fn missing_selection(&self) -> Option<&'static str> {
        [
            WizardStep::BranchSelection,
            WizardStep::ServiceSelection,
            WizardStep::DateSelection,
            WizardStep::TimeSelection,
            WizardStep::StaffSelection,
        ]
        .into_iter()
        .find(|step| !self.has_field_for(*step))
        .and_then(|step| step.field())
    }

    /// Drop selections made after `step`; they may no longer be valid
    pub fn clear_after(&mut self, step: WizardStep) {
        match step {
            WizardStep::ServiceSelection | WizardStep::TimeSelection => {
                self.staff = None;
            }
            WizardStep::DateSelection => {
                self.time_slot = None;
                self.staff = None;
            }
            _ => {}
        }
    }

    /// Every selection made and the contact details pass validation
    pub fn is_submittable(&self) -> bool {
        self.missing_selection().is_none() && self.contact.can_submit()
    }

    /// Footer line: "Branch • Service, 9 ธ.ค. 68, 10:00 น."
    pub fn summary(&self) -> String {
        let mut line = String::new();

        if let Some(branch) = &self.branch {
            line.push_str(&branch.name);
        }
        if let Some(service) = &self.service {
            if !line.is_empty() {
                line.push_str(" • ");
            }
            line.push_str(&service.name);
        }
        if let Some(date) = self.date {
            if !line.is_empty() {
                line.push_str(", ");
            }
            line.push_str(&format_thai_date(date));
        }
        if let Some(slot) = &self.time_slot {
            line.push_str(&format!(", {} น.", slot.time));
        }

        line
    }
}

/// Receipt shown on the Success step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedBooking {
    pub ticket: String,
    pub branch_name: String,
    pub service_name: String,
    pub staff_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub price: u32,
}

impl ConfirmedBooking {
    /// Build the receipt from a complete draft
    pub fn from_draft(ticket: String, draft: &BookingDraft, name: String, phone: String) -> Option<Self> {
        Some(Self {
            ticket,
            branch_name: draft.branch.as_ref()?.name.clone(),
            service_name: draft.service.as_ref()?.name.clone(),
            staff_name: draft.staff.as_ref()?.name.clone(),
            date: draft.date?,
            time: draft.time_slot.as_ref()?.time.clone(),
            customer_name: name,
            customer_phone: phone,
            price: draft.service.as_ref()?.price,
        })
    }
}
