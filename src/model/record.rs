//! Match identity and the persisted per-match record.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FieldMarker;

/// Which alliance the scouted robot plays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Alliance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            other => Err(format!("unknown alliance color: {other}")),
        }
    }
}

/// Who is being scouted, in which match, and by whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub team_number: u32,
    pub match_number: u32,
    #[serde(rename = "allianceColor")]
    pub alliance: Alliance,
    pub starting_position: String,
    pub scout_name: String,
}

/// One saved match: the flattened outcome of a scouting session.
///
/// This is the row shape of the record store and of the all-matches JSON
/// export. Toggle counts that can only be 0 or 1 are stored as booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub team_number: u32,
    pub match_number: u32,
    pub alliance_color: Alliance,
    pub starting_position: String,
    pub scout_name: String,

    pub auto_score: i32,
    pub teleop_score: i32,
    pub endgame_score: i32,
    pub total_score: i32,

    pub crossed_init_line: bool,
    pub auto_bottom_port: u32,
    pub auto_outer_port: u32,
    pub auto_inner_port: u32,
    pub pickup_ball: u32,
    pub miss_ball: u32,
    pub teleop_bottom_port: u32,
    pub teleop_outer_port: u32,
    pub teleop_inner_port: u32,
    pub rotation_control: u32,
    pub position_control: u32,
    pub park: bool,
    pub hang: bool,
    pub level: bool,
    pub effective_defense: u32,
    pub defensive_foul: u32,
    pub pinned: u32,
    pub penalty: u32,
    pub disabled: u32,

    /// Seconds spent in defense mode.
    pub total_defense_time: u32,
    pub max_shooting_distance: f64,
    pub avg_shooting_distance: f64,
    pub notes: String,

    /// Elapsed match seconds when the record was taken.
    pub match_duration: u32,
    pub field_markers: Vec<FieldMarker>,
    pub created_at: Timestamp,
}

impl MatchRecord {
    pub fn auto_shots(&self) -> u32 {
        self.auto_bottom_port + self.auto_outer_port + self.auto_inner_port
    }

    pub fn teleop_shots(&self) -> u32 {
        self.teleop_bottom_port + self.teleop_outer_port + self.teleop_inner_port
    }

    pub fn shots(&self) -> u32 {
        self.auto_shots() + self.teleop_shots()
    }
}

/// Exact-match filter over saved records. Empty fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub team: Option<u32>,
    pub match_number: Option<u32>,
    pub alliance: Option<Alliance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alliance_case_insensitively() {
        assert_eq!("Red".parse::<Alliance>().unwrap(), Alliance::Red);
        assert_eq!("blue".parse::<Alliance>().unwrap(), Alliance::Blue);
        assert!("green".parse::<Alliance>().is_err());
    }

    #[test]
    fn match_info_uses_export_field_names() {
        let info = MatchInfo {
            team_number: 254,
            match_number: 7,
            alliance: Alliance::Blue,
            starting_position: "left".into(),
            scout_name: "sam".into(),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["teamNumber"], 254);
        assert_eq!(value["allianceColor"], "blue");
        assert_eq!(value["startingPosition"], "left");
    }
}
