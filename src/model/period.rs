//! Match periods and the boundaries that separate them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A phase of a timed match. Each period has its own scoring rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    /// No match is running.
    #[default]
    PreMatch,

    /// The opening period; robots run pre-programmed routines.
    Autonomous,

    /// Driver-controlled play.
    Teleop,

    /// The closing stretch of teleop where climbs score.
    Endgame,

    /// The match clock ran out or the match was ended by hand.
    Ended,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Self::PreMatch => "PRE-MATCH",
            Self::Autonomous => "AUTONOMOUS",
            Self::Teleop => "TELEOP",
            Self::Endgame => "ENDGAME",
            Self::Ended => "MATCH ENDED",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Period boundaries, in whole seconds of elapsed match time.
///
/// Autonomous covers `[0, auto_duration)`, teleop `[auto_duration, endgame_start)`,
/// endgame `[endgame_start, match_duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchTiming {
    #[serde(rename = "duration")]
    pub match_duration: u32,
    pub auto_duration: u32,
    pub endgame_start: u32,
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self {
            match_duration: 150,
            auto_duration: 15,
            endgame_start: 120,
        }
    }
}

impl MatchTiming {
    /// Classify elapsed time into a period. Pure: same input, same period.
    pub fn classify(&self, elapsed: u32) -> Period {
        if elapsed < self.auto_duration {
            Period::Autonomous
        } else if elapsed < self.endgame_start {
            Period::Teleop
        } else if elapsed < self.match_duration {
            Period::Endgame
        } else {
            Period::Ended
        }
    }

    /// Check that the boundaries are ordered.
    pub fn validate(&self) -> Result<(), String> {
        if self.auto_duration > self.endgame_start {
            return Err(format!(
                "auto-duration ({}) must not exceed endgame-start ({})",
                self.auto_duration, self.endgame_start
            ));
        }
        if self.endgame_start > self.match_duration {
            return Err(format!(
                "endgame-start ({}) must not exceed duration ({})",
                self.endgame_start, self.match_duration
            ));
        }
        Ok(())
    }
}
