use std::num::NonZeroU32;

use crate::journey::{Journey, JourneySnapshot, LogEntry, TravelError};
use crate::pacing::TravelPace;
use crate::saves::{SaveOutcome, save_succeeds};

/// Owner of a single journey, applying travel intents in call order.
#[derive(Debug, Clone, Default)]
pub struct TravelSimulator {
    journey: Journey,
    next_seq: u64,
    resolved_save: Option<u64>,
}

impl TravelSimulator {
    /// Simulator for a fresh journey toward `total_distance` miles.
    #[must_use]
    pub fn new(total_distance: NonZeroU32) -> Self {
        Self {
            journey: Journey::new(total_distance),
            next_seq: 0,
            resolved_save: None,
        }
    }

    /// Borrow the journey state.
    #[must_use]
    pub const fn journey(&self) -> &Journey {
        &self.journey
    }

    /// Read-only snapshot for presenters.
    #[must_use]
    pub fn snapshot(&self) -> JourneySnapshot {
        self.journey.snapshot()
    }

    /// Change the destination distance. Rejected once any distance has been
    /// covered.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::JourneyStarted`] if travel has begun.
    pub fn configure(&mut self, total_distance: NonZeroU32) -> Result<(), TravelError> {
        if self.journey.has_started() {
            let err = TravelError::JourneyStarted {
                traveled: self.journey.traveled_distance_miles(),
            };
            log::warn!("configure({total_distance}) ignored: {err}");
            return Err(err);
        }
        self.journey.set_total_distance(total_distance);
        log::debug!("destination set to {total_distance} miles");
        Ok(())
    }

    /// Switch travel pace. Always allowed, even mid-march.
    pub fn set_pace(&mut self, pace: TravelPace) {
        self.journey.set_pace(pace);
        log::debug!("pace set to {pace}");
    }

    /// Travel for `hours` at the current pace and return the new log entry.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::InvalidHours`] when `hours` is not a positive,
    /// finite number, or is so large that the miles or the day's hours would
    /// overflow.
    pub fn advance(&mut self, hours: f64) -> Result<&LogEntry, TravelError> {
        if !self.journey.can_travel(hours) {
            let err = TravelError::InvalidHours { hours };
            log::warn!("advance rejected: {err}");
            return Err(err);
        }
        let seq = self.take_seq();
        let entry = self.journey.apply_travel(seq, hours);
        log::debug!(
            "day {} hour {}: +{} miles (forced march: {})",
            entry.day,
            entry.hour_of_day,
            entry.distance_delta,
            entry.is_forced_march
        );
        Ok(entry)
    }

    /// Travel a standard day, or just far enough to arrive.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::Arrived`] once the destination is reached and
    /// [`TravelError::DayExhausted`] once today's safe hours are spent.
    pub fn advance_full_day(&mut self) -> Result<&LogEntry, TravelError> {
        let Some(hours) = self.journey.full_day_hours() else {
            let err = if self.journey.is_finished() {
                TravelError::Arrived
            } else {
                TravelError::DayExhausted {
                    hours_today: self.journey.hours_traveled_today(),
                }
            };
            log::warn!("full day rejected: {err}");
            return Err(err);
        };
        self.advance(hours)
    }

    /// Take a long rest: log it against the current day, then start the next.
    pub fn rest(&mut self) -> &LogEntry {
        let seq = self.take_seq();
        let entry = self.journey.apply_long_rest(seq);
        log::debug!("long rest on day {} after {} hours", entry.day, entry.hour_of_day);
        entry
    }

    /// Start over toward a new destination at normal pace.
    pub fn reset(&mut self, total_distance: NonZeroU32) {
        self.journey = Journey::new(total_distance);
        self.resolved_save = None;
        log::debug!("journey reset toward {total_distance} miles");
    }

    /// Forced-march entry whose save has not been resolved yet, if the most
    /// recent entry is one.
    #[must_use]
    pub fn pending_save(&self) -> Option<&LogEntry> {
        self.journey
            .log()
            .last()
            .filter(|entry| entry.is_forced_march)
            .filter(|entry| self.resolved_save != Some(entry.id.seq))
    }

    /// Resolve the CON save demanded by the latest forced-march entry. A
    /// failed save costs one level of exhaustion. Adds no log entry.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::NoPendingSave`] when the latest entry is not a
    /// forced march or its save was already resolved.
    pub fn resolve_con_save(&mut self, total: i32) -> Result<SaveOutcome, TravelError> {
        let Some((entry, dc)) = self
            .pending_save()
            .and_then(|entry| entry.con_save_dc.map(|dc| (entry.id, dc)))
        else {
            log::warn!("save total {total} ignored: no forced march pending");
            return Err(TravelError::NoPendingSave);
        };

        let passed = save_succeeds(total, dc);
        let exhaustion_level = if passed {
            self.journey.exhaustion_level()
        } else {
            self.journey.add_exhaustion()
        };
        self.resolved_save = Some(entry.seq);
        log::debug!("CON save {total} vs DC {dc}: passed={passed}, exhaustion={exhaustion_level}");

        Ok(SaveOutcome {
            entry,
            dc,
            total,
            passed,
            exhaustion_level,
        })
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        seq
    }
}
