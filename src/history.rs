/// Read-only booking history lookup by phone number
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contact::{digits_only, PHONE_DIGITS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Completed,
}

impl BookingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "ยืนยันแล้ว",
            BookingStatus::Completed => "ใช้บริการแล้ว",
        }
    }
}

/// A past or upcoming booking as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Ticket code, e.g. "SS-251209-4821"
    pub id: String,
    pub branch_name: String,
    pub service_name: String,
    pub staff_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub customer_phone: String,
    pub status: BookingStatus,
}

/// The search control is enabled once exactly ten digits are entered
pub fn search_ready(phone: &str) -> bool {
    digits_only(phone).len() == PHONE_DIGITS
}

/// Records whose stored phone equals the digits of `phone`, in table order
pub fn search_by_phone<'a>(records: &'a [BookingRecord], phone: &str) -> Vec<&'a BookingRecord> {
    let wanted = digits_only(phone);
    if wanted.is_empty() {
        return Vec::new();
    }

    let found: Vec<&BookingRecord> = records
        .iter()
        .filter(|record| digits_only(&record.customer_phone) == wanted)
        .collect();

    tracing::debug!("[history] {} record(s) matched", found.len());
    found
}
