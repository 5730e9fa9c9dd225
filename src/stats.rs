//! Dashboard statistics over saved matches.
//!
//! Percentages and averages are rounded half up to whole numbers, the way
//! the dashboard displays them. Shooting distances keep their precision.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::MatchRecord;

/// Match length assumed when a record has no duration.
const FALLBACK_DURATION: u32 = 150;

/// Aggregates over a filtered set of saved matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_matches: usize,
    pub unique_teams: usize,

    pub avg_auto: i64,
    pub avg_teleop: i64,
    pub avg_endgame: i64,
    pub avg_total: i64,

    /// Auto shots over preloaded balls, percent.
    pub auto_accuracy: i64,
    /// Teleop shots over balls picked up, percent.
    pub teleop_accuracy: i64,
    /// All shots over every ball the robot had, percent.
    pub overall_accuracy: i64,
    /// Hangs over matches that ended with a hang or park, percent.
    pub climb_rate: i64,

    /// Longest shot across matches, metres.
    pub max_shooting_distance: f64,
    /// Mean of each match's longest shot, metres.
    pub avg_shooting_distance: f64,

    pub avg_defense_time: i64,
    /// Matches with either control panel action, percent.
    pub control_wheel_rate: i64,
    pub avg_balls: i64,
}

impl DashboardStats {
    /// Aggregate `records`, each assumed to start with `starting_balls`.
    ///
    /// Empty input yields all zeros.
    pub fn compute(records: &[MatchRecord], starting_balls: u32) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let n = count(records.len());
        let sum = |f: fn(&MatchRecord) -> f64| records.iter().map(f).sum::<f64>();

        let auto_shots = sum(|r| f64::from(r.auto_shots()));
        let teleop_shots = sum(|r| f64::from(r.teleop_shots()));
        let auto_attempts = n * f64::from(starting_balls);
        let pickups = sum(|r| f64::from(r.pickup_ball));

        let climbs = records.iter().filter(|r| r.hang || r.park).count();
        let hangs = records.iter().filter(|r| r.hang).count();

        let longest: Vec<f64> = records
            .iter()
            .map(|r| r.max_shooting_distance)
            .filter(|d| *d > 0.0)
            .collect();
        let (max_shooting_distance, avg_shooting_distance) = if longest.is_empty() {
            (0.0, 0.0)
        } else {
            (
                longest.iter().copied().fold(0.0, f64::max),
                longest.iter().sum::<f64>() / count(longest.len()),
            )
        };

        let control = records
            .iter()
            .filter(|r| r.rotation_control > 0 || r.position_control > 0)
            .count();

        Self {
            total_matches: records.len(),
            unique_teams: records.iter().map(|r| r.team_number).collect::<BTreeSet<_>>().len(),
            avg_auto: round(sum(|r| f64::from(r.auto_score)) / n),
            avg_teleop: round(sum(|r| f64::from(r.teleop_score)) / n),
            avg_endgame: round(sum(|r| f64::from(r.endgame_score)) / n),
            avg_total: round(sum(|r| f64::from(r.total_score)) / n),
            auto_accuracy: percent(auto_shots, auto_attempts),
            teleop_accuracy: percent(teleop_shots, pickups),
            overall_accuracy: percent(auto_shots + teleop_shots, auto_attempts + pickups),
            climb_rate: percent(count(hangs), count(climbs)),
            max_shooting_distance,
            avg_shooting_distance,
            avg_defense_time: round(sum(|r| f64::from(r.total_defense_time)) / n),
            control_wheel_rate: percent(count(control), n),
            avg_balls: round((auto_shots + teleop_shots) / n),
        }
    }
}

/// Shots over balls available (preload plus pickups), percent.
pub fn accuracy(record: &MatchRecord, starting_balls: u32) -> i64 {
    percent(
        f64::from(record.shots()),
        f64::from(starting_balls) + f64::from(record.pickup_ball),
    )
}

/// Weighted single-number rating of one match.
///
/// Auto points weigh 1.5, endgame 1.2, defense time 0.5 per second and
/// effective defense 3 each; penalties cost 5 and defensive fouls 3.
pub fn contribution_score(record: &MatchRecord) -> i64 {
    let score = f64::from(record.auto_score) * 1.5
        + f64::from(record.teleop_score)
        + f64::from(record.endgame_score) * 1.2
        + f64::from(record.total_defense_time) * 0.5
        + f64::from(record.effective_defense) * 3.0
        - f64::from(record.penalty) * 5.0
        - f64::from(record.defensive_foul) * 3.0;
    round(score)
}

/// Total points over match seconds.
pub fn points_per_second(record: &MatchRecord) -> f64 {
    let duration = match record.match_duration {
        0 => FALLBACK_DURATION,
        d => d,
    };
    f64::from(record.total_score) / f64::from(duration)
}

fn percent(part: f64, whole: f64) -> i64 {
    if whole > 0.0 { round(part / whole * 100.0) } else { 0 }
}

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3.
#[allow(clippy::cast_possible_truncation)]
fn round(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

#[allow(clippy::cast_precision_loss)]
fn count(n: usize) -> f64 {
    n as f64
}
