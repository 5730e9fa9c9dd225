//! Scout configuration.
//!
//! Loaded from `~/.scout/config.toml`. Every key is optional; a missing
//! file means the standard game rules.
//!
//! ```toml
//! default-scout = "sam"
//!
//! [match]
//! duration = 150
//! auto-duration = 15
//! endgame-start = 120
//! max-ball-capacity = 5
//! starting-balls = 3
//!
//! [points]
//! hang = 25
//!
//! [field]
//! length = 15.98
//! width = 8.21
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{ActionKind, FieldGeometry, MAX_POINTS, MatchTiming, PointTable};
use crate::session::MatchRules;

/// Scout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Scout name used when `--scout` and `SCOUT_NAME` are both absent.
    pub default_scout: Option<String>,

    #[serde(rename = "match")]
    pub game: GameConfig,

    /// Point overrides keyed by action name, e.g. `hang = 30`.
    pub points: BTreeMap<ActionKind, u32>,

    pub field: FieldGeometry,
}

/// Match timing and ball limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GameConfig {
    pub duration: u32,
    pub auto_duration: u32,
    pub endgame_start: u32,
    pub max_ball_capacity: u32,
    /// Balls preloaded before autonomous.
    pub starting_balls: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let timing = MatchTiming::default();
        Self {
            duration: timing.match_duration,
            auto_duration: timing.auto_duration,
            endgame_start: timing.endgame_start,
            max_ball_capacity: 5,
            starting_balls: 3,
        }
    }
}

impl Config {
    /// Load config from `~/.scout/config.toml`, or defaults if it is absent.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        config
            .validate()
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        Ok(config)
    }

    /// The config file path: `~/.scout/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".scout").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), String> {
        let game = &self.game;
        if game.duration == 0 {
            return Err("match duration must be positive".to_string());
        }
        self.timing().validate()?;
        if game.starting_balls > game.max_ball_capacity {
            return Err(format!(
                "starting-balls ({}) must not exceed max-ball-capacity ({})",
                game.starting_balls, game.max_ball_capacity
            ));
        }
        if let Some((kind, points)) = self.points.iter().find(|(_, p)| **p > MAX_POINTS) {
            return Err(format!(
                "points.{kind} ({points}) must not exceed {MAX_POINTS}"
            ));
        }
        self.field.validate()
    }

    pub fn timing(&self) -> MatchTiming {
        MatchTiming {
            match_duration: self.game.duration,
            auto_duration: self.game.auto_duration,
            endgame_start: self.game.endgame_start,
        }
    }

    /// The rules a new session runs under.
    pub fn to_rules(&self) -> MatchRules {
        MatchRules {
            timing: self.timing(),
            max_ball_capacity: self.game.max_ball_capacity,
            points: PointTable::with_overrides(&self.points),
            field: self.field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn empty_config_is_standard_rules() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.to_rules(), MatchRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_all_sections() {
        let config: Config = toml::from_str(
            r#"
            default-scout = "sam"

            [match]
            duration = 160
            endgame-start = 130
            max-ball-capacity = 6
            starting-balls = 2

            [points]
            hang = 30
            teleopInnerPort = 4

            [field]
            length = 16.0
            "#,
        )
        .unwrap();

        assert_eq!(config.default_scout.as_deref(), Some("sam"));
        assert_eq!(config.game.auto_duration, 15);
        assert_eq!(config.game.starting_balls, 2);

        let rules = config.to_rules();
        assert_eq!(rules.timing.match_duration, 160);
        assert_eq!(rules.timing.endgame_start, 130);
        assert_eq!(rules.max_ball_capacity, 6);
        assert_eq!(rules.points.points(ActionKind::Hang), 30);
        assert_eq!(rules.points.points(ActionKind::TeleopInnerPort), 4);
        assert_eq!(rules.points.points(ActionKind::Park), 5);
        assert!((rules.field.length - 16.0).abs() < f64::EPSILON);
        assert!((rules.field.width - 8.21).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_unknown_action_in_points() {
        let err = toml::from_str::<Config>("[points]\nwarp = 3").unwrap_err();
        assert!(err.to_string().contains("warp"));
    }

    #[test]
    fn validates_preload_against_capacity() {
        let config = Config {
            game: GameConfig {
                starting_balls: 6,
                ..GameConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().contains("starting-balls"));
    }

    #[test]
    fn rejects_oversized_point_values() {
        let config: Config = toml::from_str(
            "[points]\nhang = 3000000000\npark = 3000000000",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("points.park"));
        assert!(err.contains("1000"));

        let config: Config = toml::from_str("[points]\nhang = 1000").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn largest_point_values_score_without_overflow() {
        let config: Config = toml::from_str(&format!(
            "[points]\nhang = {MAX_POINTS}\npark = {MAX_POINTS}\nlevel = {MAX_POINTS}"
        ))
        .unwrap();
        config.validate().unwrap();

        let setup = crate::session::MatchSetup {
            team_number: Some(254),
            match_number: Some(1),
            alliance: Some(crate::model::Alliance::Red),
            starting_position: Some("left".into()),
            scout_name: None,
            preload_balls: 0,
        };
        let mut session = crate::session::MatchSession::start(setup, config.to_rules()).unwrap();
        while session.elapsed() < 130 {
            session.tick();
        }
        for kind in [ActionKind::Hang, ActionKind::Park, ActionKind::Level] {
            session.record(kind).unwrap();
        }
        assert_eq!(session.scores().endgame, 3000);
        assert_eq!(session.scores().total, 3000);
    }

    #[test]
    fn validates_period_order() {
        let config = Config {
            game: GameConfig {
                endgame_start: 200,
                ..GameConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_reports_path_on_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[match]\nstarting-balls = 9").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("config.toml"));
        assert!(err.contains("starting-balls"));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default-scout = \"riley\"").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_scout.as_deref(), Some("riley"));
    }
}
