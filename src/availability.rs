/// Staff availability filter
///
/// Returns a verdict for every staff member able to perform the service, in
/// roster order. Unavailable staff stay in the list so the screen can show
/// them greyed out with a reason.
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::catalog::{Catalog, Staff};

/// Why a staff member cannot take a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    DayOff,
    Busy,
}

impl UnavailableReason {
    /// Label shown on the staff card
    pub fn label(&self) -> &'static str {
        match self {
            UnavailableReason::DayOff => "วันหยุด",
            UnavailableReason::Busy => "ไม่ว่าง",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::DayOff => write!(f, "day off"),
            UnavailableReason::Busy => write!(f, "busy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn reason(&self) -> Option<UnavailableReason> {
        match self {
            Availability::Available => None,
            Availability::Unavailable(reason) => Some(*reason),
        }
    }
}

/// A staff card on the selection screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffOption<'a> {
    pub staff: &'a Staff,
    pub availability: Availability,
}

impl StaffOption<'_> {
    pub fn selectable(&self) -> bool {
        self.availability.is_available()
    }
}

/// Verdict for one staff member at a date and start time
pub fn check_availability(catalog: &Catalog, staff_id: &str, date: NaiveDate, time: &str) -> Availability {
    let Some(schedule) = catalog.schedule_for(staff_id) else {
        return Availability::Available;
    };

    if schedule.is_off(date) {
        return Availability::Unavailable(UnavailableReason::DayOff);
    }

    if schedule.is_busy(date, time) {
        return Availability::Unavailable(UnavailableReason::Busy);
    }

    Availability::Available
}

/// Staff qualified for `service_id`, each tagged with a verdict for the slot
pub fn staff_options<'a>(
    catalog: &'a Catalog,
    service_id: &str,
    date: NaiveDate,
    time: &str,
) -> Vec<StaffOption<'a>> {
    catalog
        .staff
        .iter()
        .filter(|staff| staff.performs(service_id))
        .map(|staff| StaffOption {
            staff,
            availability: check_availability(catalog, &staff.id, date, time),
        })
        .collect()
}

/// Whether anyone qualified can take the slot
pub fn any_staff_available(catalog: &Catalog, service_id: &str, date: NaiveDate, time: &str) -> bool {
    catalog
        .staff_for_service(service_id)
        .any(|staff| check_availability(catalog, &staff.id, date, time).is_available())
}
