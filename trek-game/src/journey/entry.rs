//! Adventure log entries emitted by the travel simulator.
//!
//! Entries are created only by travel and long-rest transitions and are never
//! mutated afterwards; the journey hands them out by shared reference.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::LOG_LONG_REST;

/// Stable identifier for a single log entry.
///
/// `seq` is a simulator-wide counter that never restarts, so identifiers stay
/// unique across journey resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId {
    /// One-based day the entry was written on.
    pub day: u32,
    pub seq: u64,
}

impl EntryId {
    #[must_use]
    pub const fn new(day: u32, seq: u64) -> Self {
        Self { day, seq }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}-{}", self.day, self.seq)
    }
}

/// What produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Travel,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub day: u32,
    /// Hours traveled on `day` when the entry was written.
    pub hour_of_day: f64,
    /// Nominal miles for the leg (hours times speed), even when progress was
    /// clamped at the destination.
    pub distance_delta: f64,
    pub description: String,
    pub is_forced_march: bool,
    /// Constitution save DC demanded by a forced march.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub con_save_dc: Option<f64>,
}

impl LogEntry {
    #[must_use]
    pub(crate) fn travel(
        id: EntryId,
        hour_of_day: f64,
        distance_delta: f64,
        description: String,
        con_save_dc: Option<f64>,
    ) -> Self {
        Self {
            id,
            kind: EntryKind::Travel,
            day: id.day,
            hour_of_day,
            distance_delta,
            description,
            is_forced_march: con_save_dc.is_some(),
            con_save_dc,
        }
    }

    #[must_use]
    pub(crate) fn long_rest(id: EntryId, hour_of_day: f64) -> Self {
        Self {
            id,
            kind: EntryKind::Rest,
            day: id.day,
            hour_of_day,
            distance_delta: 0.0,
            description: LOG_LONG_REST.to_string(),
            is_forced_march: false,
            con_save_dc: None,
        }
    }

    #[must_use]
    pub const fn is_rest(&self) -> bool {
        matches!(self.kind, EntryKind::Rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_flag_follows_dc_presence() {
        let plain = LogEntry::travel(EntryId::new(1, 0), 3.0, 9.0, "walk".into(), None);
        assert!(!plain.is_forced_march);
        assert_eq!(plain.kind, EntryKind::Travel);

        let forced = LogEntry::travel(EntryId::new(2, 1), 9.0, 3.0, "march".into(), Some(11.0));
        assert!(forced.is_forced_march);
        assert_eq!(forced.con_save_dc, Some(11.0));
        assert_eq!(forced.day, 2);
    }

    #[test]
    fn rest_entry_has_no_distance_and_fixed_narration() {
        let entry = LogEntry::long_rest(EntryId::new(3, 7), 15.0);
        assert!(entry.is_rest());
        assert_eq!(entry.day, 3);
        assert!((entry.hour_of_day - 15.0).abs() < f64::EPSILON);
        assert!(entry.distance_delta.abs() < f64::EPSILON);
        assert_eq!(
            entry.description,
            "Took a Long Rest. Day ends. Travel time reset."
        );
        assert_eq!(entry.id.to_string(), "d3-7");
    }

    #[test]
    fn dc_is_omitted_from_json_when_absent() {
        let entry = LogEntry::long_rest(EntryId::new(1, 0), 0.0);
        let json = serde_json::to_value(&entry).expect("serialize");
        assert!(json.get("con_save_dc").is_none());
        assert_eq!(json["kind"], "rest");

        let restored: LogEntry = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, entry);
    }
}
