//! Point values and period-routed scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ActionKind, ActionRecord, Period};

/// Largest point value a single action may be worth.
///
/// Keeps a full match of scores well inside `i32`.
pub const MAX_POINTS: u32 = 1000;

/// Static point value per action kind. Kinds not in the table score 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointTable(BTreeMap<ActionKind, u32>);

impl Default for PointTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            (ActionKind::InitLine, 5),
            (ActionKind::AutoBottomPort, 2),
            (ActionKind::AutoOuterPort, 4),
            (ActionKind::AutoInnerPort, 6),
            (ActionKind::TeleopBottomPort, 1),
            (ActionKind::TeleopOuterPort, 2),
            (ActionKind::TeleopInnerPort, 3),
            (ActionKind::RotationControl, 10),
            (ActionKind::PositionControl, 20),
            (ActionKind::Park, 5),
            (ActionKind::Hang, 25),
            (ActionKind::Level, 15),
        ]))
    }
}

impl PointTable {
    pub fn points(&self, kind: ActionKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Returns the default table with `overrides` layered on top.
    pub fn with_overrides(overrides: &BTreeMap<ActionKind, u32>) -> Self {
        let mut table = Self::default();
        table.0.extend(overrides);
        table
    }
}

/// Per-period score breakdown. `total` always equals the sum of the parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub auto: i32,
    pub teleop: i32,
    pub endgame: i32,
    pub total: i32,
}

impl Scores {
    /// Apply a signed point delta for `kind`, routed by `period`.
    ///
    /// Autonomous actions land in `auto`. During endgame only park, hang and
    /// level score as `endgame`; ball scoring in endgame still counts as
    /// `teleop`. Everything else lands in `teleop`.
    pub fn apply(&mut self, kind: ActionKind, period: Period, delta: i32) {
        match period {
            Period::Autonomous => self.auto += delta,
            Period::Endgame if kind.is_endgame_scoring() => self.endgame += delta,
            _ => self.teleop += delta,
        }
        self.total = self.auto + self.teleop + self.endgame;
    }

    /// Rebuild scores from an ordered ledger, starting from zero.
    pub fn replay<'a>(records: impl IntoIterator<Item = &'a ActionRecord>, table: &PointTable) -> Self {
        let mut scores = Self::default();
        for record in records {
            scores.apply(record.kind, record.period, signed(table.points(record.kind)));
        }
        scores
    }
}

/// Convert a point value to a score delta.
///
/// Configured values are capped at `MAX_POINTS`, so saturation never
/// happens for a validated table.
pub fn signed(points: u32) -> i32 {
    i32::try_from(points).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_game_manual() {
        let table = PointTable::default();
        assert_eq!(table.points(ActionKind::InitLine), 5);
        assert_eq!(table.points(ActionKind::AutoInnerPort), 6);
        assert_eq!(table.points(ActionKind::TeleopBottomPort), 1);
        assert_eq!(table.points(ActionKind::PositionControl), 20);
        assert_eq!(table.points(ActionKind::Hang), 25);
        assert_eq!(table.points(ActionKind::PickupBall), 0);
        assert_eq!(table.points(ActionKind::Penalty), 0);
        assert_eq!(table.points(ActionKind::DefenseStart), 0);
    }

    #[test]
    fn overrides_replace_single_entries() {
        let table = PointTable::with_overrides(&BTreeMap::from([(ActionKind::Hang, 30)]));
        assert_eq!(table.points(ActionKind::Hang), 30);
        assert_eq!(table.points(ActionKind::Park), 5);
    }

    #[test]
    fn routes_by_period() {
        let mut scores = Scores::default();
        scores.apply(ActionKind::AutoBottomPort, Period::Autonomous, 2);
        scores.apply(ActionKind::TeleopInnerPort, Period::Teleop, 3);
        scores.apply(ActionKind::Hang, Period::Endgame, 25);
        assert_eq!(
            scores,
            Scores {
                auto: 2,
                teleop: 3,
                endgame: 25,
                total: 30
            }
        );
    }

    #[test]
    fn endgame_ball_scoring_counts_as_teleop() {
        let mut scores = Scores::default();
        scores.apply(ActionKind::TeleopOuterPort, Period::Endgame, 2);
        assert_eq!(scores.teleop, 2);
        assert_eq!(scores.endgame, 0);
        assert_eq!(scores.total, 2);
    }

    #[test]
    fn climb_before_endgame_counts_as_teleop() {
        let mut scores = Scores::default();
        scores.apply(ActionKind::Park, Period::Teleop, 5);
        assert_eq!(scores.teleop, 5);
        assert_eq!(scores.endgame, 0);
    }

    #[test]
    fn negative_delta_restores_previous_scores() {
        let mut scores = Scores::default();
        scores.apply(ActionKind::InitLine, Period::Autonomous, 5);
        scores.apply(ActionKind::InitLine, Period::Autonomous, -5);
        assert_eq!(scores, Scores::default());
    }

    #[test]
    fn deserializes_from_camel_case_keys() {
        let table: BTreeMap<ActionKind, u32> = toml::from_str("hang = 40\ninitLine = 3").unwrap();
        assert_eq!(table[&ActionKind::Hang], 40);
        assert_eq!(table[&ActionKind::InitLine], 3);
    }
}
