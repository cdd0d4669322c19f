/// Booking ticket identifiers: `<prefix>-YYMMDD-NNNN`
use chrono::{Datelike, NaiveDate};
use rand::Rng;

pub const DEFAULT_TICKET_PREFIX: &str = "SS";

/// Issue a ticket code for a booking submitted on `date`.
///
/// The suffix is a random four-digit number (1000-9999), so codes are
/// inspectable but not unique; the mock backend never checks collisions.
pub fn issue_ticket<R: Rng + ?Sized>(prefix: &str, date: NaiveDate, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(1000..=9999);
    format!(
        "{}-{:02}{:02}{:02}-{}",
        prefix,
        date.year().rem_euclid(100),
        date.month(),
        date.day(),
        suffix
    )
}

/// Split a ticket into (prefix, date, suffix) if it is well formed
pub fn parse_ticket(ticket: &str) -> Option<(&str, NaiveDate, u16)> {
    let mut parts = ticket.rsplitn(3, '-');
    let suffix = parts.next()?;
    let stamp = parts.next()?;
    let prefix = parts.next()?;

    if prefix.is_empty() || stamp.len() != 6 || suffix.len() != 4 {
        return None;
    }
    if !stamp.bytes().chain(suffix.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = stamp[..2].parse().ok()?;
    let month: u32 = stamp[2..4].parse().ok()?;
    let day: u32 = stamp[4..].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(2000 + year, month, day)?;

    Some((prefix, date, suffix.parse().ok()?))
}
