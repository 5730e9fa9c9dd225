//! Action types: what a scout can record about a robot during a match.
//!
//! One action = one kind. Each recorded action is a distinct moment in
//! match time, kept in the ledger as it happened.
//! Rejected actions are not recorded; the ledger captures what the robot
//! did, not what the scout tried to click.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Period;

/// What the robot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// Drove off the initiation line during autonomous.
    InitLine,
    AutoBottomPort,
    AutoOuterPort,
    AutoInnerPort,

    /// Took a ball from the loading station or the floor.
    PickupBall,

    /// Shot a ball that did not score.
    MissBall,
    TeleopBottomPort,
    TeleopOuterPort,
    TeleopInnerPort,
    RotationControl,
    PositionControl,
    Park,
    Hang,

    /// The generator switch ended level.
    Level,
    EffectiveDefense,
    DefensiveFoul,
    Pinned,
    Penalty,
    Disabled,

    /// Written by defense mode when it is entered.
    DefenseStart,

    /// Written by defense mode when it is exited.
    DefenseEnd,
}

/// How recording an action affects the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    /// Repeatable; every occurrence is logged and scored.
    Counter,

    /// At most one active instance. Recording again deactivates it.
    Toggle,

    /// Moves the ball counter without scoring on its own.
    Resource,

    /// Written by defense mode only; never recorded directly.
    Marker,
}

/// How an action moves the held-ball count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEffect {
    None,
    Pickup,
    Consume,
}

/// Button group an action belongs to on the scouting console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Auto,
    Teleop,
    Endgame,
    Defense,
    Other,
}

impl ActionKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::InitLine,
        Self::AutoBottomPort,
        Self::AutoOuterPort,
        Self::AutoInnerPort,
        Self::PickupBall,
        Self::MissBall,
        Self::TeleopBottomPort,
        Self::TeleopOuterPort,
        Self::TeleopInnerPort,
        Self::RotationControl,
        Self::PositionControl,
        Self::Park,
        Self::Hang,
        Self::Level,
        Self::EffectiveDefense,
        Self::DefensiveFoul,
        Self::Pinned,
        Self::Penalty,
        Self::Disabled,
        Self::DefenseStart,
        Self::DefenseEnd,
    ];

    /// Kinds that carry a count, in export column order.
    pub const COUNTED: [Self; 19] = [
        Self::InitLine,
        Self::AutoBottomPort,
        Self::AutoOuterPort,
        Self::AutoInnerPort,
        Self::PickupBall,
        Self::MissBall,
        Self::TeleopBottomPort,
        Self::TeleopOuterPort,
        Self::TeleopInnerPort,
        Self::RotationControl,
        Self::PositionControl,
        Self::Park,
        Self::Hang,
        Self::Level,
        Self::EffectiveDefense,
        Self::DefensiveFoul,
        Self::Pinned,
        Self::Penalty,
        Self::Disabled,
    ];

    pub fn class(self) -> ActionClass {
        match self {
            Self::InitLine
            | Self::RotationControl
            | Self::PositionControl
            | Self::Park
            | Self::Hang
            | Self::Level => ActionClass::Toggle,
            Self::PickupBall | Self::MissBall => ActionClass::Resource,
            Self::DefenseStart | Self::DefenseEnd => ActionClass::Marker,
            _ => ActionClass::Counter,
        }
    }

    pub fn ball_effect(self) -> BallEffect {
        match self {
            Self::PickupBall => BallEffect::Pickup,
            Self::MissBall => BallEffect::Consume,
            k if k.is_shot() => BallEffect::Consume,
            _ => BallEffect::None,
        }
    }

    /// A scored shot into one of the power ports.
    pub fn is_shot(self) -> bool {
        matches!(
            self,
            Self::AutoBottomPort
                | Self::AutoOuterPort
                | Self::AutoInnerPort
                | Self::TeleopBottomPort
                | Self::TeleopOuterPort
                | Self::TeleopInnerPort
        )
    }

    /// Climb-phase actions: the only kinds that score into the endgame bucket.
    pub fn is_endgame_scoring(self) -> bool {
        matches!(self, Self::Park | Self::Hang | Self::Level)
    }

    pub fn section(self) -> Section {
        match self {
            Self::InitLine | Self::AutoBottomPort | Self::AutoOuterPort | Self::AutoInnerPort => {
                Section::Auto
            }
            Self::PickupBall
            | Self::MissBall
            | Self::TeleopBottomPort
            | Self::TeleopOuterPort
            | Self::TeleopInnerPort
            | Self::RotationControl
            | Self::PositionControl => Section::Teleop,
            Self::Park | Self::Hang | Self::Level => Section::Endgame,
            Self::EffectiveDefense
            | Self::DefensiveFoul
            | Self::Pinned
            | Self::DefenseStart
            | Self::DefenseEnd => Section::Defense,
            Self::Penalty | Self::Disabled => Section::Other,
        }
    }

    /// The camelCase identifier used on the wire and at the console.
    pub fn name(self) -> &'static str {
        match self {
            Self::InitLine => "initLine",
            Self::AutoBottomPort => "autoBottomPort",
            Self::AutoOuterPort => "autoOuterPort",
            Self::AutoInnerPort => "autoInnerPort",
            Self::PickupBall => "pickupBall",
            Self::MissBall => "missBall",
            Self::TeleopBottomPort => "teleopBottomPort",
            Self::TeleopOuterPort => "teleopOuterPort",
            Self::TeleopInnerPort => "teleopInnerPort",
            Self::RotationControl => "rotationControl",
            Self::PositionControl => "positionControl",
            Self::Park => "park",
            Self::Hang => "hang",
            Self::Level => "level",
            Self::EffectiveDefense => "effectiveDefense",
            Self::DefensiveFoul => "defensiveFoul",
            Self::Pinned => "pinned",
            Self::Penalty => "penalty",
            Self::Disabled => "disabled",
            Self::DefenseStart => "defenseStart",
            Self::DefenseEnd => "defenseEnd",
        }
    }

    /// Human-readable label, also used as the CSV column header.
    pub fn label(self) -> &'static str {
        match self {
            Self::InitLine => "Crossed Initiation Line",
            Self::AutoBottomPort => "Auto - Bottom Port",
            Self::AutoOuterPort => "Auto - Outer Port",
            Self::AutoInnerPort => "Auto - Inner Port",
            Self::PickupBall => "Station Picked Up Ball",
            Self::MissBall => "Missed Ball",
            Self::TeleopBottomPort => "Teleop - Bottom Port",
            Self::TeleopOuterPort => "Teleop - Outer Port",
            Self::TeleopInnerPort => "Teleop - Inner Port",
            Self::RotationControl => "Rotation Control",
            Self::PositionControl => "Position Control",
            Self::Park => "Parked",
            Self::Hang => "Hanging",
            Self::Level => "Level Switch",
            Self::EffectiveDefense => "Effective Defense",
            Self::DefensiveFoul => "Defensive Foul",
            Self::Pinned => "Pinned Opponent",
            Self::Penalty => "Penalty/Foul",
            Self::Disabled => "Robot Disabled",
            Self::DefenseStart => "Defense Start",
            Self::DefenseEnd => "Defense End",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    /// Parses the camelCase name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// A single, immutable record of something the robot did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    #[serde(rename = "action")]
    pub kind: ActionKind,

    /// Elapsed match seconds when the action was recorded.
    pub time: u32,

    /// Period the action was recorded in. Decides which score bucket it hits.
    pub period: Period,

    /// Set on toggle activations.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub toggled: bool,

    /// Seconds spent defending; only on `defenseEnd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    /// Wall-clock time of the click.
    #[serde(rename = "timestamp")]
    pub recorded_at: Timestamp,
}
