//! Traveler's Trek Engine
//!
//! Platform-agnostic travel rules for tabletop sessions: a party heads for a
//! destination at a chosen pace, days end with a long rest, and travel past
//! eight hours a day becomes a forced march with an escalating CON save DC.
//! This crate holds the state machine only; presenters read snapshots and
//! feed intents back in.

pub mod constants;
pub mod journey;
pub mod numbers;
pub mod pacing;
pub mod saves;

// Re-export commonly used types
pub use constants::{
    DEFAULT_TOTAL_DISTANCE, FORCED_MARCH_BASE_DC, FORCED_MARCH_DC_INC, MAX_EXHAUSTION_LEVEL,
    MAX_TRAVEL_HOURS,
};
pub use journey::{
    EntryId, EntryKind, Journey, JourneyPhase, JourneySnapshot, LogEntry, TravelError,
    TravelSimulator, forced_march_dc,
};
pub use pacing::{PaceCfg, PaceProfile, PacingConfig, TravelPace, UnknownPace};
pub use saves::{SaveOutcome, SaveRoller, save_succeeds};
