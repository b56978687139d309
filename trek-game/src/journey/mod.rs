//! Journey state and the travel rules that act on it.

mod entry;
mod session;

pub use entry::{EntryId, EntryKind, LogEntry};
pub use session::TravelSimulator;

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error;

use crate::constants::{
    DEFAULT_TOTAL_DISTANCE, FORCED_MARCH_BASE_DC, MAX_EXHAUSTION_LEVEL, MAX_TRAVEL_HOURS,
};
use crate::numbers::{format_amount, percent_of};
use crate::pacing::{PaceProfile, TravelPace};

/// Errors raised when an intent would violate a journey invariant.
///
/// A rejected intent never changes the journey.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TravelError {
    #[error("travel hours must be a positive number (got {hours})")]
    InvalidHours { hours: f64 },
    #[error("destination is locked once travel has begun ({traveled:.1} miles covered)")]
    JourneyStarted { traveled: f64 },
    #[error("the day's safe travel hours are spent ({hours_today} traveled); take a long rest")]
    DayExhausted { hours_today: f64 },
    #[error("the party has already reached its destination")]
    Arrived,
    #[error("no forced-march save is pending")]
    NoPendingSave,
}

/// Coarse journey phase, derived purely from the distance fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyPhase {
    NotStarted,
    Traveling,
    Finished,
}

/// Constitution save DC for a day that has reached `new_hours_total` hours of
/// travel, or `None` while the day is inside the safe window.
///
/// The DC is computed from the cumulative hours past the threshold, so a
/// single long advance yields one entry carrying the full escalation.
/// Fractional hours carry through: half an hour over is DC 10.5.
#[must_use]
pub fn forced_march_dc(new_hours_total: f64) -> Option<f64> {
    (new_hours_total > MAX_TRAVEL_HOURS)
        .then(|| FORCED_MARCH_BASE_DC + (new_hours_total - MAX_TRAVEL_HOURS))
}

fn travel_narration(hours: f64, pace: TravelPace, miles: f64, dc: Option<f64>) -> String {
    let mut text = format!(
        "Traveled {} hour(s) at {pace} pace ({} miles).",
        format_amount(hours),
        format_amount(miles)
    );
    if let Some(dc) = dc {
        text.push_str(&format!(
            " Forced March! CON Save DC {} to avoid exhaustion.",
            format_amount(dc)
        ));
    }
    text
}

/// Aggregate journey state: destination, progress, the day clock and the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    total_distance_miles: f64,
    traveled_distance_miles: f64,
    pace: TravelPace,
    current_day: u32,
    hours_traveled_today: f64,
    #[serde(default)]
    log: Vec<LogEntry>,
    #[serde(default)]
    exhaustion_level: u8,
}

impl Default for Journey {
    fn default() -> Self {
        Self::new(NonZeroU32::new(DEFAULT_TOTAL_DISTANCE).unwrap_or(NonZeroU32::MIN))
    }
}

impl Journey {
    /// Fresh journey toward a destination `total_distance` miles away.
    #[must_use]
    pub fn new(total_distance: NonZeroU32) -> Self {
        Self {
            total_distance_miles: f64::from(total_distance.get()),
            traveled_distance_miles: 0.0,
            pace: TravelPace::Normal,
            current_day: 1,
            hours_traveled_today: 0.0,
            log: Vec::new(),
            exhaustion_level: 0,
        }
    }

    #[must_use]
    pub const fn total_distance_miles(&self) -> f64 {
        self.total_distance_miles
    }

    #[must_use]
    pub const fn traveled_distance_miles(&self) -> f64 {
        self.traveled_distance_miles
    }

    #[must_use]
    pub const fn pace(&self) -> TravelPace {
        self.pace
    }

    #[must_use]
    pub fn pace_profile(&self) -> PaceProfile {
        self.pace.profile()
    }

    #[must_use]
    pub const fn current_day(&self) -> u32 {
        self.current_day
    }

    #[must_use]
    pub const fn hours_traveled_today(&self) -> f64 {
        self.hours_traveled_today
    }

    /// Chronological adventure log.
    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    #[must_use]
    pub const fn exhaustion_level(&self) -> u8 {
        self.exhaustion_level
    }

    #[must_use]
    pub fn remaining_distance(&self) -> f64 {
        self.total_distance_miles - self.traveled_distance_miles
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining_distance() <= 0.0
    }

    /// Hours left before the next advance becomes a forced march.
    #[must_use]
    pub fn safe_hours_remaining(&self) -> f64 {
        (MAX_TRAVEL_HOURS - self.hours_traveled_today).max(0.0)
    }

    #[must_use]
    pub fn has_started(&self) -> bool {
        self.traveled_distance_miles > 0.0
    }

    #[must_use]
    pub fn phase(&self) -> JourneyPhase {
        if self.is_finished() {
            JourneyPhase::Finished
        } else if self.has_started() {
            JourneyPhase::Traveling
        } else {
            JourneyPhase::NotStarted
        }
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        percent_of(self.traveled_distance_miles, self.total_distance_miles)
    }

    /// Whether one more hour of travel today would be a forced march.
    #[must_use]
    pub fn next_hour_is_forced(&self) -> bool {
        self.hours_traveled_today >= MAX_TRAVEL_HOURS
    }

    /// Hours a "full day" of travel covers from here: a standard day, or just
    /// enough to reach the destination. `None` once the safe hours are spent
    /// or the party has arrived.
    ///
    /// Hours already traveled today are not subtracted, so a full day taken
    /// after a partial one runs into a forced march.
    #[must_use]
    pub fn full_day_hours(&self) -> Option<f64> {
        if self.is_finished() || self.next_hour_is_forced() {
            return None;
        }
        let speed = self.pace_profile().speed_mph;
        let to_destination = if speed > 0.0 {
            self.remaining_distance() / speed
        } else {
            MAX_TRAVEL_HOURS
        };
        Some(MAX_TRAVEL_HOURS.min(to_destination))
    }

    /// Build a read-only snapshot of the journey and every derived query.
    #[must_use]
    pub fn snapshot(&self) -> JourneySnapshot {
        JourneySnapshot {
            journey: self.clone(),
            pace_profile: self.pace_profile(),
            phase: self.phase(),
            remaining_distance_miles: self.remaining_distance(),
            is_finished: self.is_finished(),
            safe_hours_remaining: self.safe_hours_remaining(),
            progress_percent: self.progress_percent(),
            next_hour_is_forced: self.next_hour_is_forced(),
            full_day_hours: self.full_day_hours(),
        }
    }

    pub(crate) fn set_total_distance(&mut self, total_distance: NonZeroU32) {
        self.total_distance_miles = f64::from(total_distance.get());
    }

    pub(crate) const fn set_pace(&mut self, pace: TravelPace) {
        self.pace = pace;
    }

    /// Whether an advance of `hours` keeps every derived amount finite.
    pub(crate) fn can_travel(&self, hours: f64) -> bool {
        hours.is_finite()
            && hours > 0.0
            && (hours * self.pace_profile().speed_mph).is_finite()
            && (self.hours_traveled_today + hours).is_finite()
    }

    /// Apply one advance and return the entry describing it.
    pub(crate) fn apply_travel(&mut self, id_seq: u64, hours: f64) -> &LogEntry {
        let distance_covered = hours * self.pace_profile().speed_mph;
        let new_hours_total = self.hours_traveled_today + hours;
        let dc = forced_march_dc(new_hours_total);

        self.traveled_distance_miles = (self.traveled_distance_miles + distance_covered)
            .min(self.total_distance_miles);
        self.hours_traveled_today = new_hours_total;

        let description = travel_narration(hours, self.pace, distance_covered, dc);
        let entry = LogEntry::travel(
            EntryId::new(self.current_day, id_seq),
            new_hours_total,
            distance_covered,
            description,
            dc,
        );
        self.push_entry(entry)
    }

    /// Close out the day with a long rest and return the rest entry.
    pub(crate) fn apply_long_rest(&mut self, id_seq: u64) -> &LogEntry {
        let entry = LogEntry::long_rest(
            EntryId::new(self.current_day, id_seq),
            self.hours_traveled_today,
        );
        self.current_day = self.current_day.saturating_add(1);
        self.hours_traveled_today = 0.0;
        self.push_entry(entry)
    }

    /// Raise exhaustion by one level, saturating at the maximum.
    pub(crate) fn add_exhaustion(&mut self) -> u8 {
        self.exhaustion_level = self
            .exhaustion_level
            .saturating_add(1)
            .min(MAX_EXHAUSTION_LEVEL);
        self.exhaustion_level
    }

    fn push_entry(&mut self, entry: LogEntry) -> &LogEntry {
        self.log.push(entry);
        let last = self.log.len() - 1;
        &self.log[last]
    }
}

/// Journey record plus derived queries, as consumed by presenters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySnapshot {
    #[serde(flatten)]
    pub journey: Journey,
    pub pace_profile: PaceProfile,
    pub phase: JourneyPhase,
    pub remaining_distance_miles: f64,
    pub is_finished: bool,
    pub safe_hours_remaining: f64,
    pub progress_percent: f64,
    pub next_hour_is_forced: bool,
    #[serde(default)]
    pub full_day_hours: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn miles(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn dc_starts_past_eighth_hour_and_escalates_cumulatively() {
        assert_eq!(forced_march_dc(0.0), None);
        assert_eq!(forced_march_dc(8.0), None);
        assert_eq!(forced_march_dc(9.0), Some(11.0));
        assert_eq!(forced_march_dc(12.0), Some(14.0));
        assert_eq!(forced_march_dc(8.5), Some(10.5));
    }

    #[test]
    fn default_journey_matches_fresh_app_state() {
        let journey = Journey::default();
        assert!((journey.total_distance_miles() - 100.0).abs() < f64::EPSILON);
        assert_eq!(journey.current_day(), 1);
        assert_eq!(journey.pace(), TravelPace::Normal);
        assert!(journey.log().is_empty());
        assert_eq!(journey.exhaustion_level(), 0);
        assert_eq!(journey.phase(), JourneyPhase::NotStarted);
    }

    #[test]
    fn phases_follow_distance_fields() {
        let mut journey = Journey::new(miles(10));
        journey.apply_travel(0, 1.0);
        assert_eq!(journey.phase(), JourneyPhase::Traveling);
        journey.apply_travel(1, 5.0);
        assert_eq!(journey.phase(), JourneyPhase::Finished);
        assert!((journey.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn travel_narration_mentions_dc_only_when_forced() {
        let calm = travel_narration(2.0, TravelPace::Normal, 6.0, None);
        assert_eq!(calm, "Traveled 2 hour(s) at Normal pace (6 miles).");
        let forced = travel_narration(1.0, TravelPace::Fast, 4.0, Some(11.0));
        assert_eq!(
            forced,
            "Traveled 1 hour(s) at Fast pace (4 miles). Forced March! CON Save DC 11 to avoid exhaustion."
        );
        let half = travel_narration(0.5, TravelPace::Slow, 1.0, Some(10.5));
        assert!(half.ends_with("CON Save DC 10.5 to avoid exhaustion."));
    }

    #[test]
    fn full_day_is_capped_by_remaining_distance() {
        let mut journey = Journey::new(miles(12));
        assert_eq!(journey.full_day_hours(), Some(4.0));
        journey.set_total_distance(miles(100));
        assert_eq!(journey.full_day_hours(), Some(8.0));
        journey.apply_travel(0, 8.0);
        assert!(journey.next_hour_is_forced());
        assert_eq!(journey.full_day_hours(), None);
    }

    #[test]
    fn travel_is_refused_when_amounts_would_overflow() {
        let mut journey = Journey::default();
        assert!(journey.can_travel(8.0));
        assert!(!journey.can_travel(0.0));
        assert!(!journey.can_travel(f64::MAX));

        journey.set_pace(TravelPace::Slow);
        journey.apply_travel(0, 8e307);
        journey.apply_travel(1, 8e307);
        assert!(journey.can_travel(1.0));
        assert!(!journey.can_travel(8e307));
    }

    #[test]
    fn exhaustion_saturates_at_maximum() {
        let mut journey = Journey::default();
        for _ in 0..10 {
            journey.add_exhaustion();
        }
        assert_eq!(journey.exhaustion_level(), MAX_EXHAUSTION_LEVEL);
    }

    #[test]
    fn snapshot_flattens_journey_fields() {
        let journey = Journey::new(miles(24));
        let json = serde_json::to_value(journey.snapshot()).expect("serialize");
        assert_eq!(json["total_distance_miles"], 24.0);
        assert_eq!(json["phase"], "not_started");
        assert_eq!(json["pace"], "normal");
        assert_eq!(json["safe_hours_remaining"], 8.0);
        assert_eq!(json["full_day_hours"], 8.0);
    }
}
