//! Travel rule constants for Traveler's Trek.
//!
//! These values define the travel-pace and forced-march math. They are
//! exposed so presenters can display them, but they are not configurable at
//! runtime.

/// Hours a party may travel in one day before the march becomes forced.
pub const MAX_TRAVEL_HOURS: f64 = 8.0;

/// Constitution save DC for the first hour of a forced march, before the
/// per-hour increment is added.
pub const FORCED_MARCH_BASE_DC: f64 = 10.0;

/// DC added for every hour traveled past [`MAX_TRAVEL_HOURS`].
///
/// The escalation falls out of `base + hours_over`, so this value is
/// informational.
pub const FORCED_MARCH_DC_INC: f64 = 1.0;

/// Destination distance used for a fresh journey.
pub const DEFAULT_TOTAL_DISTANCE: u32 = 100;

/// Exhaustion level at which a character dies; no level beyond this exists.
pub const MAX_EXHAUSTION_LEVEL: u8 = 6;

/// Sides on the die rolled for a constitution save.
pub const SAVE_DIE_SIDES: i32 = 20;

/// Slack allowed when comparing a save total against a fractional DC, so
/// float noise in the hour sums cannot fail a save that meets the DC.
pub const SAVE_DC_TOLERANCE: f64 = 1e-9;

// Narration -----------------------------------------------------------------
pub(crate) const LOG_LONG_REST: &str = "Took a Long Rest. Day ends. Travel time reset.";
pub(crate) const SAVE_STREAM_TAG: &[u8] = b"con-save";
