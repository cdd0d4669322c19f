/// Calendar helpers: local-day normalization, the booking window and Thai
/// display formatting.
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Weekday};
use serde::Serialize;

use crate::catalog::ShopConfig;

const THAI_MONTHS_SHORT: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

/// Offset between the Buddhist era and the common era
const BUDDHIST_ERA_OFFSET: i32 = 543;

/// One selectable day on the date screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateOption {
    pub date: NaiveDate,
    pub holiday: bool,
}

impl DateOption {
    pub fn selectable(&self) -> bool {
        !self.holiday
    }
}

/// Calendar day of an instant in its own timezone.
///
/// Converting through UTC would shift evenings in zones behind UTC onto the
/// next day, so the wall-clock date of `instant` is used as-is.
pub fn local_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

/// ISO "YYYY-MM-DD" of an instant's local calendar day
pub fn iso_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    format_iso_date(local_day(instant))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// The next `window_days` calendar days starting at `today`, holidays flagged
pub fn date_options(today: NaiveDate, window_days: u32, shop: &ShopConfig) -> Vec<DateOption> {
    (0..u64::from(window_days))
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| DateOption {
            date,
            holiday: shop.is_holiday(date),
        })
        .collect()
}

/// Whether `date` falls inside the booking window that starts at `today`
pub fn within_window(date: NaiveDate, today: NaiveDate, window_days: u32) -> bool {
    let offset = (date - today).num_days();
    offset >= 0 && offset < i64::from(window_days)
}

/// "9 ธ.ค. 68": day, abbreviated Thai month, two-digit Buddhist-era year
pub fn format_thai_date(date: NaiveDate) -> String {
    let year = (date.year() + BUDDHIST_ERA_OFFSET).rem_euclid(100);
    format!("{} {:02}", format_thai_date_short(date), year)
}

/// "9 ธ.ค."
pub fn format_thai_date_short(date: NaiveDate) -> String {
    format!("{} {}", date.day(), THAI_MONTHS_SHORT[date.month0() as usize])
}

pub fn thai_weekday(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "วันจันทร์",
        Weekday::Tue => "วันอังคาร",
        Weekday::Wed => "วันพุธ",
        Weekday::Thu => "วันพฤหัสบดี",
        Weekday::Fri => "วันศุกร์",
        Weekday::Sat => "วันเสาร์",
        Weekday::Sun => "วันอาทิตย์",
    }
}
