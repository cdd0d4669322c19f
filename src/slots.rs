/// Time-slot generation from shop hours
///
/// Slots are derived per date-selection screen and never persisted.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::ShopConfig;

/// A bookable start time on the selected date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    /// "HH:MM"
    pub time: String,
    pub available: bool,
}

impl TimeSlot {
    fn at_minute(minute_of_day: u32) -> Self {
        let time = format_slot_time(minute_of_day);
        Self {
            id: time.clone(),
            time,
            available: true,
        }
    }
}

/// How slot availability is decided before the user picks a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SlotStrategy {
    /// Every slot inside shop hours is selectable
    #[default]
    Fixed,

    /// Demo placeholder: each slot is independently available with the given
    /// probability. Not a reservation check.
    Randomized { availability: f64 },

    /// A slot is selectable when at least one qualified staff member is free
    Staffed,
}

impl SlotStrategy {
    /// Mark slots unavailable at random (only for `Randomized`)
    pub fn randomize<R: Rng + ?Sized>(&self, slots: &mut [TimeSlot], rng: &mut R) {
        if let SlotStrategy::Randomized { availability } = *self {
            let p = availability.clamp(0.0, 1.0);
            for slot in slots.iter_mut() {
                slot.available = rng.gen_bool(p);
            }
        }
    }
}

/// Generate one slot per interval from opening (inclusive) to closing
/// (exclusive). All slots start out available.
pub fn generate_time_slots(config: &ShopConfig) -> Vec<TimeSlot> {
    let start = config.open_hour * 60;
    let end = config.close_hour.min(24) * 60;

    if config.slot_interval == 0 || start >= end {
        return Vec::new();
    }

    (start..end)
        .step_by(config.slot_interval as usize)
        .map(TimeSlot::at_minute)
        .collect()
}

/// Format minutes since midnight as zero-padded "HH:MM"
pub fn format_slot_time(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

/// Parse "HH:MM" into minutes since midnight
pub fn parse_slot_time(time: &str) -> Option<u32> {
    let (hours, minutes) = time.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shop(open_hour: u32, close_hour: u32, slot_interval: u32) -> ShopConfig {
        ShopConfig {
            open_hour,
            close_hour,
            slot_interval,
            holidays: Vec::new(),
        }
    }

    #[test]
    fn test_default_shop_hours() {
        let slots = generate_time_slots(&ShopConfig::default());
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0].time, "10:00");
        assert_eq!(slots[1].time, "10:30");
        assert_eq!(slots.last().unwrap().time, "19:30");
        assert!(slots.iter().all(|s| s.available && s.id == s.time));
    }

    #[test]
    fn test_slot_count_is_ceiling() {
        for (open, close, interval) in [(10, 20, 30), (9, 17, 45), (8, 9, 7), (0, 24, 60), (6, 7, 61)] {
            let slots = generate_time_slots(&shop(open, close, interval));
            let span = (close - open) * 60;
            let expected = span.div_ceil(interval) as usize;
            assert_eq!(slots.len(), expected, "open={open} close={close} interval={interval}");
        }
    }

    #[test]
    fn test_slots_strictly_increasing_and_before_close() {
        let config = shop(9, 17, 45);
        let slots = generate_time_slots(&config);
        let minutes: Vec<u32> = slots.iter().map(|s| parse_slot_time(&s.time).unwrap()).collect();

        assert!(minutes.windows(2).all(|w| w[0] < w[1]));
        assert!(minutes.iter().all(|&m| m < config.close_hour * 60));
        assert!(slots.iter().all(|s| s.time.len() == 5));
    }

    #[test]
    fn test_zero_padding() {
        let slots = generate_time_slots(&shop(8, 10, 30));
        let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, vec!["08:00", "08:30", "09:00", "09:30"]);
    }

    #[test]
    fn test_degenerate_hours_yield_nothing() {
        assert!(generate_time_slots(&shop(20, 10, 30)).is_empty());
        assert!(generate_time_slots(&shop(10, 10, 30)).is_empty());
        assert!(generate_time_slots(&shop(10, 20, 0)).is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = ShopConfig::default();
        assert_eq!(generate_time_slots(&config), generate_time_slots(&config));
    }

    #[test]
    fn test_parse_slot_time() {
        assert_eq!(parse_slot_time("10:30"), Some(630));
        assert_eq!(parse_slot_time("00:00"), Some(0));
        assert_eq!(parse_slot_time("9:30"), None);
        assert_eq!(parse_slot_time("24:00"), None);
        assert_eq!(parse_slot_time("10:60"), None);
        assert_eq!(parse_slot_time("1030"), None);
    }

    #[test]
    fn test_fixed_strategy_leaves_slots_alone() {
        let mut slots = generate_time_slots(&ShopConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        SlotStrategy::Fixed.randomize(&mut slots, &mut rng);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_randomized_strategy_extremes() {
        let mut rng = StdRng::seed_from_u64(42);

        let mut slots = generate_time_slots(&ShopConfig::default());
        SlotStrategy::Randomized { availability: 0.0 }.randomize(&mut slots, &mut rng);
        assert!(slots.iter().all(|s| !s.available));

        let mut slots = generate_time_slots(&ShopConfig::default());
        SlotStrategy::Randomized { availability: 1.0 }.randomize(&mut slots, &mut rng);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_strategy_serialization() {
        let json = serde_json::to_string(&SlotStrategy::Randomized { availability: 0.7 }).unwrap();
        assert_eq!(json, r#"{"kind":"randomized","availability":0.7}"#);

        let strategy: SlotStrategy = serde_json::from_str(r#"{"kind":"staffed"}"#).unwrap();
        assert_eq!(strategy, SlotStrategy::Staffed);
    }
}
