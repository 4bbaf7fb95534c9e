//! Time-of-day setpoint schedule.
//!
//! Entries carry zero-padded 24-hour "HH:MM" start times and are resolved
//! against the current wall clock: the most recent entry that has already
//! started is active. Before the earliest start time the previous day's
//! last entry is still considered active, so schedules wrap past midnight.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub name: String,
    /// Zero-padded 24-hour start time, e.g. "08:00". Validated at the
    /// boundary where entries are created; the resolver assumes it.
    pub time: String,
    pub temperature: f64,
}

impl ScheduleEntry {
    pub fn new(name: String, time: String, temperature: f64) -> Result<Self, EngineError> {
        validate_hhmm(&time)?;
        Ok(ScheduleEntry { id: Uuid::new_v4(), name, time, temperature })
    }
}

/// Check that a time string is well-formed zero-padded "HH:MM".
pub fn validate_hhmm(time: &str) -> Result<(), EngineError> {
    let bytes = time.as_bytes();
    let shape_ok = bytes.len() == 5
        && bytes[2] == b':'
        && [0usize, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !shape_ok {
        return Err(EngineError::InvalidInput(format!(
            "schedule time '{}' is not in HH:MM format",
            time
        )));
    }

    let hours: u32 = match time[..2].parse() {
        Ok(h) => h,
        Err(_) => {
            return Err(EngineError::InvalidInput(format!(
                "schedule time '{}' is not in HH:MM format",
                time
            )))
        }
    };
    let minutes: u32 = match time[3..].parse() {
        Ok(m) => m,
        Err(_) => {
            return Err(EngineError::InvalidInput(format!(
                "schedule time '{}' is not in HH:MM format",
                time
            )))
        }
    };

    if hours > 23 || minutes > 59 {
        return Err(EngineError::InvalidInput(format!(
            "schedule time '{}' is out of range",
            time
        )));
    }
    Ok(())
}

/// The current local wall-clock time as "HH:MM", the form entries compare
/// against. Seconds are deliberately not part of the comparison.
pub fn local_hhmm() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Pick the active entry for the given clock time, or `None` for an empty
/// schedule.
///
/// Entries are ordered by plain lexicographic comparison of the time
/// strings (chronological for well-formed "HH:MM"); the sort is stable, so
/// entries sharing a time keep their insertion order and the scan picks the
/// last of them. When the clock is earlier than every start time, the last
/// entry in sorted order is active: the previous day's final window has not
/// ended yet.
pub fn resolve_active<'a>(entries: &'a [ScheduleEntry], now: &str) -> Option<&'a ScheduleEntry> {
    if entries.is_empty() {
        return None;
    }

    let mut sorted: Vec<&ScheduleEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.time.cmp(&b.time));

    let mut active = None;
    for entry in &sorted {
        if entry.time.as_str() <= now {
            active = Some(*entry);
        } else {
            // Sorted order: nothing later can have started either.
            break;
        }
    }

    active.or_else(|| sorted.last().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, time: &str, temperature: f64) -> ScheduleEntry {
        ScheduleEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            time: time.to_string(),
            temperature,
        }
    }

    #[test]
    fn accepts_well_formed_times() {
        for time in ["00:00", "08:30", "23:59", "12:05"] {
            assert!(validate_hhmm(time).is_ok(), "{}", time);
        }
    }

    #[test]
    fn rejects_malformed_times() {
        for time in ["24:00", "12:60", "7:00", "07:0", "aa:bb", "0700", "07:00:00", ""] {
            assert!(validate_hhmm(time).is_err(), "{}", time);
        }
    }

    #[test]
    fn empty_schedule_resolves_to_none() {
        assert!(resolve_active(&[], "12:00").is_none());
    }

    #[test]
    fn most_recent_started_entry_wins() {
        let entries = vec![entry("Day", "08:00", 21.0), entry("Night", "22:00", 18.0)];
        let active = resolve_active(&entries, "09:00").unwrap();
        assert_eq!(active.name, "Day");
        assert_eq!(active.temperature, 21.0);
    }

    #[test]
    fn before_the_first_entry_wraps_to_the_last() {
        let entries = vec![entry("Day", "08:00", 21.0), entry("Night", "22:00", 18.0)];
        // 06:00 is before every start time; yesterday's "Night" window is
        // still running.
        let active = resolve_active(&entries, "06:00").unwrap();
        assert_eq!(active.name, "Night");
        assert_eq!(active.temperature, 18.0);
    }

    #[test]
    fn entry_becomes_active_exactly_at_its_start_time() {
        let entries = vec![entry("Day", "08:00", 21.0), entry("Night", "22:00", 18.0)];
        assert_eq!(resolve_active(&entries, "08:00").unwrap().name, "Day");
        assert_eq!(resolve_active(&entries, "07:59").unwrap().name, "Night");
        assert_eq!(resolve_active(&entries, "22:00").unwrap().name, "Night");
    }

    #[test]
    fn unsorted_input_is_resolved_in_time_order() {
        let entries = vec![
            entry("Evening", "18:00", 20.0),
            entry("Morning", "06:30", 21.0),
            entry("Midday", "12:00", 19.5),
        ];
        assert_eq!(resolve_active(&entries, "13:37").unwrap().name, "Midday");
        assert_eq!(resolve_active(&entries, "05:00").unwrap().name, "Evening");
    }

    #[test]
    fn same_time_entries_keep_insertion_order() {
        let entries = vec![
            entry("First", "08:00", 20.0),
            entry("Second", "08:00", 21.0),
            entry("Third", "08:00", 22.0),
        ];
        // Stable sort leaves ties in insertion order; the scan takes the
        // last one that has started.
        assert_eq!(resolve_active(&entries, "08:00").unwrap().name, "Third");
        // Wrap-around lands on the same final entry.
        assert_eq!(resolve_active(&entries, "07:00").unwrap().name, "Third");
    }

    #[test]
    fn single_entry_is_always_active() {
        let entries = vec![entry("Only", "15:00", 19.0)];
        assert_eq!(resolve_active(&entries, "14:59").unwrap().name, "Only");
        assert_eq!(resolve_active(&entries, "15:00").unwrap().name, "Only");
        assert_eq!(resolve_active(&entries, "23:59").unwrap().name, "Only");
    }

    #[test]
    fn new_entry_validates_its_time() {
        assert!(ScheduleEntry::new("Bad".to_string(), "25:00".to_string(), 20.0).is_err());
        let ok = ScheduleEntry::new("Good".to_string(), "08:15".to_string(), 20.0).unwrap();
        assert_eq!(ok.time, "08:15");
    }

    #[test]
    fn local_clock_renders_as_hhmm() {
        let now = local_hhmm();
        assert!(validate_hhmm(&now).is_ok(), "{}", now);
    }
}
