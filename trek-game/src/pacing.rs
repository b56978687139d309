//! Travel pace table
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const DEFAULT_PACING_DATA: &str = include_str!("../data/pacing.json");

static PACE_TABLE: OnceLock<PacingConfig> = OnceLock::new();

/// The three travel paces a party can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelPace {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl TravelPace {
    pub const ALL: [Self; 3] = [Self::Fast, Self::Normal, Self::Slow];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Normal => "normal",
            Self::Slow => "slow",
        }
    }

    /// Display label used in narration.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Normal => "Normal",
            Self::Slow => "Slow",
        }
    }

    /// Rule profile for this pace from the shared pace table.
    #[must_use]
    pub fn profile(self) -> PaceProfile {
        PacingConfig::shared().profile(self)
    }
}

impl fmt::Display for TravelPace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a pace name is not one of `fast`, `normal` or `slow`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pace `{0}` (expected fast, normal or slow)")]
pub struct UnknownPace(pub String);

impl FromStr for TravelPace {
    type Err = UnknownPace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "normal" => Ok(Self::Normal),
            "slow" => Ok(Self::Slow),
            other => Err(UnknownPace(other.to_string())),
        }
    }
}

/// Movement rate and rule effect of a single pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceProfile {
    pub pace: TravelPace,
    /// Miles covered per hour of travel.
    pub speed_mph: f64,
    /// Miles covered over a full eight-hour day. Display only.
    pub daily_miles: f64,
    /// Rule text shown next to the pace.
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default)]
    pub pace: Vec<PaceCfg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceCfg {
    pub id: TravelPace,
    pub speed_mph: f64,
    #[serde(default)]
    pub miles_per_day: f64,
    #[serde(default)]
    pub effect: String,
}

impl PaceCfg {
    fn builtin(id: TravelPace) -> Self {
        let (speed_mph, miles_per_day, effect) = match id {
            TravelPace::Fast => (4.0, 30.0, "-5 penalty to passive Wisdom (Perception)"),
            TravelPace::Normal => (3.0, 24.0, "None"),
            TravelPace::Slow => (2.0, 18.0, "Able to use stealth"),
        };
        Self {
            id,
            speed_mph,
            miles_per_day,
            effect: effect.to_string(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            pace: TravelPace::ALL.into_iter().map(PaceCfg::builtin).collect(),
        }
    }
}

impl PacingConfig {
    /// Parse a pace table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a valid pace table.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Load the pace table bundled with the crate, falling back to the
    /// compiled defaults if the asset cannot be parsed.
    #[must_use]
    pub fn load_from_static() -> Self {
        match Self::from_json(DEFAULT_PACING_DATA) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("bundled pace table is malformed, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Process-wide pace table, parsed once.
    #[must_use]
    pub fn shared() -> &'static Self {
        PACE_TABLE.get_or_init(Self::load_from_static)
    }

    /// Profile for `pace`, falling back to the compiled default entry when
    /// the table does not list it.
    #[must_use]
    pub fn profile(&self, pace: TravelPace) -> PaceProfile {
        let cfg = self
            .pace
            .iter()
            .find(|p| p.id == pace)
            .cloned()
            .unwrap_or_else(|| PaceCfg::builtin(pace));
        PaceProfile {
            pace,
            speed_mph: cfg.speed_mph,
            daily_miles: cfg.miles_per_day,
            effect: cfg.effect,
        }
    }

    /// All profiles in table order (fast, normal, slow).
    #[must_use]
    pub fn profiles(&self) -> Vec<PaceProfile> {
        TravelPace::ALL.into_iter().map(|p| self.profile(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_matches_builtin_defaults() {
        let parsed = PacingConfig::from_json(DEFAULT_PACING_DATA).expect("bundled data parses");
        assert_eq!(parsed, PacingConfig::default());
    }

    #[test]
    fn profiles_carry_rule_speeds() {
        let cfg = PacingConfig::default();
        assert!((cfg.profile(TravelPace::Fast).speed_mph - 4.0).abs() < f64::EPSILON);
        assert!((cfg.profile(TravelPace::Normal).speed_mph - 3.0).abs() < f64::EPSILON);
        assert!((cfg.profile(TravelPace::Slow).speed_mph - 2.0).abs() < f64::EPSILON);
        assert!((cfg.profile(TravelPace::Slow).daily_miles - 18.0).abs() < f64::EPSILON);
        assert_eq!(cfg.profile(TravelPace::Slow).effect, "Able to use stealth");
    }

    #[test]
    fn missing_entries_fall_back_to_builtin() {
        let cfg = PacingConfig::from_json(r#"{"pace": []}"#).unwrap();
        let fast = cfg.profile(TravelPace::Fast);
        assert!((fast.speed_mph - 4.0).abs() < f64::EPSILON);
        assert_eq!(fast.pace, TravelPace::Fast);
    }

    #[test]
    fn pace_names_parse_case_insensitively() {
        assert_eq!("Fast".parse::<TravelPace>(), Ok(TravelPace::Fast));
        assert_eq!(" slow ".parse::<TravelPace>(), Ok(TravelPace::Slow));
        assert_eq!(
            "gallop".parse::<TravelPace>(),
            Err(UnknownPace("gallop".to_string()))
        );
        assert_eq!(TravelPace::Normal.to_string(), "Normal");
        assert_eq!(TravelPace::default(), TravelPace::Normal);
    }
}
