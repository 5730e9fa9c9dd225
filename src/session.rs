//! The match session: one scouted robot, one match, one writer.
//!
//! `MatchSession` owns every piece of live match state (clock, period,
//! held balls, action ledger, scores, defense mode, field markers) and is
//! the only thing that mutates them. Each operation either completes or
//! is rejected with no side effects, so the caller never has to roll back.
//!
//! ```text
//! tick ──▶ Clock ──▶ classify ──▶ PeriodChange (edge-triggered)
//! record ──▶ BallCounter ──▶ ActionLedger ──▶ Scores
//! ```

mod balls;
mod clock;
mod defense;
mod field;
mod ledger;

use jiff::Timestamp;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::{
    ActionClass, ActionKind, ActionRecord, Alliance, BallEffect, FieldGeometry, FieldMarker,
    MarkerKind, MatchInfo, MatchRecord, MatchTiming, Period, PointTable, Scores, Section, signed,
};

pub use balls::BallCounter;
pub use clock::Clock;
pub use defense::DefenseState;
pub use field::FieldLog;
pub use ledger::{ActionLedger, Counts};

/// Scout name used when none is given.
pub const ANONYMOUS: &str = "Anonymous";

/// Rejected state transitions. None of these mutate the session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("robot is at maximum ball capacity ({capacity} balls)")]
    CapacityExceeded { capacity: u32 },

    #[error("no balls available for {kind}; pick up a ball first")]
    InsufficientResource { kind: ActionKind },

    #[error("{0}")]
    Validation(String),

    #[error("{0} is recorded by defense mode, not directly")]
    ReservedAction(ActionKind),

    #[error("the match has ended")]
    MatchEnded,

    #[error("marker at ({x}, {y}) is off the field")]
    OutOfField { x: f64, y: f64 },
}

/// Rules a session runs under. Owned by the caller, typically from config.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRules {
    pub timing: MatchTiming,
    pub max_ball_capacity: u32,
    pub points: PointTable,
    pub field: FieldGeometry,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            timing: MatchTiming::default(),
            max_ball_capacity: 5,
            points: PointTable::default(),
            field: FieldGeometry::default(),
        }
    }
}

/// Raw match-start input. Required fields are optional here so that a
/// missing one is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default)]
pub struct MatchSetup {
    pub team_number: Option<u32>,
    pub match_number: Option<u32>,
    pub alliance: Option<Alliance>,
    pub starting_position: Option<String>,
    pub scout_name: Option<String>,
    pub preload_balls: u32,
}

impl MatchSetup {
    fn validate(self) -> Result<(MatchInfo, u32), MatchError> {
        let team_number = self
            .team_number
            .ok_or_else(|| MatchError::Validation("please enter a team number".into()))?;
        let match_number = self
            .match_number
            .ok_or_else(|| MatchError::Validation("please enter a match number".into()))?;
        let alliance = self
            .alliance
            .ok_or_else(|| MatchError::Validation("please select an alliance color".into()))?;
        let starting_position = self
            .starting_position
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MatchError::Validation("please select a starting position".into()))?;
        let scout_name = self
            .scout_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string());

        let info = MatchInfo {
            team_number,
            match_number,
            alliance,
            starting_position,
            scout_name,
        };
        Ok((info, self.preload_balls))
    }
}

/// A period boundary crossed by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodChange {
    pub from: Period,
    pub to: Period,
}

/// What a successful `record` did to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// A new record was appended.
    Added(ActionRecord),

    /// An active toggle was switched off and its record removed.
    Removed(ActionRecord),
}

/// Display snapshot of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub elapsed: u32,
    pub period: Period,
    pub paused: bool,
    pub defending: bool,
    pub defense_current: u32,
    pub defense_total: u32,
    pub balls: u32,
    pub capacity: u32,
    pub scores: Scores,
}

/// Live state of one scouted match.
#[derive(Debug, Clone)]
pub struct MatchSession {
    id: Uuid,
    info: MatchInfo,
    rules: MatchRules,
    /// Ball counter as it stood at the start, restored on restart.
    preload: BallCounter,
    started_at: Timestamp,
    clock: Clock,
    period: Period,
    balls: BallCounter,
    ledger: ActionLedger,
    scores: Scores,
    defense: DefenseState,
    field: FieldLog,
    notes: String,
}

impl MatchSession {
    /// Validate the setup and start the match clock at zero.
    ///
    /// A session never exists with incomplete match info.
    pub fn start(setup: MatchSetup, rules: MatchRules) -> Result<Self, MatchError> {
        let (info, preload) = setup.validate()?;
        let balls = BallCounter::new(preload, rules.max_ball_capacity)?;
        let period = rules.timing.classify(0);

        info!(
            team = info.team_number,
            match_number = info.match_number,
            alliance = %info.alliance,
            preload,
            "match started"
        );

        Ok(Self {
            id: Uuid::new_v4(),
            field: FieldLog::new(rules.field),
            info,
            rules,
            preload: balls,
            started_at: Timestamp::now(),
            clock: Clock::default(),
            period,
            balls,
            ledger: ActionLedger::default(),
            scores: Scores::default(),
            defense: DefenseState::default(),
            notes: String::new(),
        })
    }

    /// Throw away everything recorded and start the same match over.
    pub fn restart(&mut self) {
        self.clock.reset();
        self.id = Uuid::new_v4();
        self.started_at = Timestamp::now();
        self.period = self.rules.timing.classify(0);
        self.balls = self.preload;
        self.ledger = ActionLedger::default();
        self.scores = Scores::default();
        self.defense = DefenseState::default();
        self.field.clear();
        self.notes.clear();
        info!(team = self.info.team_number, "match restarted");
    }

    // ── Clock ──

    /// Advance the clock one second and re-classify the period.
    ///
    /// Returns a change only when the period actually moves. Reaching the
    /// match duration ends the match and halts the clock.
    pub fn tick(&mut self) -> Option<PeriodChange> {
        if !self.clock.tick() {
            return None;
        }
        let next = self.rules.timing.classify(self.clock.elapsed());
        if next == self.period {
            return None;
        }
        let change = PeriodChange {
            from: self.period,
            to: next,
        };
        if next == Period::Ended {
            self.finish();
        } else {
            self.period = next;
        }
        debug!(from = %change.from, to = %change.to, elapsed = self.clock.elapsed(), "period changed");
        Some(change)
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    /// Flip pause. Returns true if now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.clock.toggle_pause()
    }

    /// End the match now. Idempotent.
    ///
    /// Returns the change to `Ended`, or `None` if the match had already ended.
    pub fn end(&mut self) -> Option<PeriodChange> {
        if self.period == Period::Ended {
            return None;
        }
        let from = self.period;
        self.finish();
        Some(PeriodChange {
            from,
            to: Period::Ended,
        })
    }

    fn finish(&mut self) {
        // Close an open stint first so its time lands in the total.
        self.exit_defense();
        self.period = Period::Ended;
        self.clock.halt();
        info!(
            team = self.info.team_number,
            elapsed = self.clock.elapsed(),
            total = self.scores.total,
            "match ended"
        );
    }

    // ── Actions ──

    /// Record an action at the current match time.
    ///
    /// Ball rules are checked before anything is logged; a rejected action
    /// leaves the session untouched. Recording an active toggle switches it
    /// off, removing its record and exactly the points it added.
    pub fn record(&mut self, kind: ActionKind) -> Result<Recorded, MatchError> {
        if self.period == Period::Ended {
            return Err(MatchError::MatchEnded);
        }
        let class = kind.class();
        if class == ActionClass::Marker {
            return Err(MatchError::ReservedAction(kind));
        }

        let ball_check = match kind.ball_effect() {
            BallEffect::Pickup => self.balls.try_pickup().map(|_| ()),
            BallEffect::Consume => self.balls.try_consume(kind).map(|_| ()),
            BallEffect::None => Ok(()),
        };
        if let Err(e) = ball_check {
            warn!(action = %kind, elapsed = self.clock.elapsed(), "{e}");
            return Err(e);
        }

        if class == ActionClass::Toggle
            && self.ledger.count(kind) > 0
            && let Some(removed) = self.ledger.remove_last(kind)
        {
            // Routed by the activation's period so the exact points come back off.
            let points = signed(self.rules.points.points(removed.kind));
            self.scores.apply(removed.kind, removed.period, -points);
            debug!(action = %kind, points = -points, "toggle deactivated");
            return Ok(Recorded::Removed(removed));
        }

        let record = ActionRecord {
            kind,
            time: self.clock.elapsed(),
            period: self.period,
            toggled: class == ActionClass::Toggle,
            duration: None,
            recorded_at: Timestamp::now(),
        };
        let points = signed(self.rules.points.points(kind));
        self.scores.apply(kind, record.period, points);
        self.ledger.append(record.clone());
        debug!(action = %kind, time = record.time, period = %record.period, points, "action recorded");
        Ok(Recorded::Added(record))
    }

    /// Actions the console offers right now.
    ///
    /// Defense mode shows only defensive actions; otherwise the current
    /// period's sections plus the always-available ones.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        let sections: &[Section] = if self.defense.is_active() {
            &[Section::Defense]
        } else {
            match self.period {
                Period::Autonomous => &[Section::Auto, Section::Other],
                Period::Teleop => &[Section::Teleop, Section::Other],
                Period::Endgame => &[Section::Teleop, Section::Endgame, Section::Other],
                Period::PreMatch | Period::Ended => &[],
            }
        };
        ActionKind::ALL
            .into_iter()
            .filter(|k| k.class() != ActionClass::Marker && sections.contains(&k.section()))
            .collect()
    }

    // ── Defense ──

    /// Enter defense mode. Returns the `defenseStart` record, or `None` if
    /// already defending.
    pub fn enter_defense(&mut self) -> Option<&ActionRecord> {
        let now = self.clock.elapsed();
        if self.period == Period::Ended || !self.defense.enter(now) {
            return None;
        }
        let record = self.marker_record(ActionKind::DefenseStart, None);
        self.ledger.append(record);
        debug!(elapsed = now, "defense started");
        self.ledger.records().last()
    }

    /// Leave defense mode. Returns the `defenseEnd` record carrying the stint
    /// duration, or `None` if not defending.
    pub fn exit_defense(&mut self) -> Option<&ActionRecord> {
        let now = self.clock.elapsed();
        let duration = self.defense.exit(now)?;
        let record = self.marker_record(ActionKind::DefenseEnd, Some(duration));
        self.ledger.append(record);
        debug!(elapsed = now, duration, total = self.defense.total(), "defense ended");
        self.ledger.records().last()
    }

    fn marker_record(&self, kind: ActionKind, duration: Option<u32>) -> ActionRecord {
        ActionRecord {
            kind,
            time: self.clock.elapsed(),
            period: self.period,
            toggled: false,
            duration,
            recorded_at: Timestamp::now(),
        }
    }

    // ── Field ──

    pub fn add_marker(&mut self, kind: MarkerKind, x: f64, y: f64) -> Result<&FieldMarker, MatchError> {
        self.field.add(kind, x, y, self.clock.elapsed())
    }

    pub fn undo_marker(&mut self) -> Option<FieldMarker> {
        self.field.undo_last()
    }

    pub fn clear_markers(&mut self) {
        self.field.clear();
    }

    // ── Notes ──

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    // ── Accessors ──

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn info(&self) -> &MatchInfo {
        &self.info
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn elapsed(&self) -> u32 {
        self.clock.elapsed()
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn ledger(&self) -> &ActionLedger {
        &self.ledger
    }

    pub fn field(&self) -> &FieldLog {
        &self.field
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn defense_total(&self) -> u32 {
        self.defense.total()
    }

    pub fn status(&self) -> Status {
        let now = self.clock.elapsed();
        Status {
            elapsed: now,
            period: self.period,
            paused: self.clock.is_paused(),
            defending: self.defense.is_active(),
            defense_current: self.defense.current(now),
            defense_total: self.defense.total(),
            balls: self.balls.count(),
            capacity: self.balls.capacity(),
            scores: self.scores,
        }
    }

    /// Scores rebuilt from the ledger alone. Always equal to `scores()`.
    pub fn replay_scores(&self) -> Scores {
        Scores::replay(self.ledger.records(), &self.rules.points)
    }

    /// Flatten the session into a storable record.
    pub fn to_record(&self) -> MatchRecord {
        debug_assert_eq!(self.scores, self.replay_scores(), "live scores drifted from the ledger");
        let counts = self.ledger.counts();
        MatchRecord {
            id: self.id,
            team_number: self.info.team_number,
            match_number: self.info.match_number,
            alliance_color: self.info.alliance,
            starting_position: self.info.starting_position.clone(),
            scout_name: self.info.scout_name.clone(),
            auto_score: self.scores.auto,
            teleop_score: self.scores.teleop,
            endgame_score: self.scores.endgame,
            total_score: self.scores.total,
            crossed_init_line: counts.get(ActionKind::InitLine) > 0,
            auto_bottom_port: counts.get(ActionKind::AutoBottomPort),
            auto_outer_port: counts.get(ActionKind::AutoOuterPort),
            auto_inner_port: counts.get(ActionKind::AutoInnerPort),
            pickup_ball: counts.get(ActionKind::PickupBall),
            miss_ball: counts.get(ActionKind::MissBall),
            teleop_bottom_port: counts.get(ActionKind::TeleopBottomPort),
            teleop_outer_port: counts.get(ActionKind::TeleopOuterPort),
            teleop_inner_port: counts.get(ActionKind::TeleopInnerPort),
            rotation_control: counts.get(ActionKind::RotationControl),
            position_control: counts.get(ActionKind::PositionControl),
            park: counts.get(ActionKind::Park) > 0,
            hang: counts.get(ActionKind::Hang) > 0,
            level: counts.get(ActionKind::Level) > 0,
            effective_defense: counts.get(ActionKind::EffectiveDefense),
            defensive_foul: counts.get(ActionKind::DefensiveFoul),
            pinned: counts.get(ActionKind::Pinned),
            penalty: counts.get(ActionKind::Penalty),
            disabled: counts.get(ActionKind::Disabled),
            total_defense_time: self.defense.total(),
            max_shooting_distance: self.field.max_shooting_distance(),
            avg_shooting_distance: self.field.avg_shooting_distance(),
            notes: self.notes.clone(),
            match_duration: self.clock.elapsed(),
            field_markers: self.field.markers().to_vec(),
            created_at: Timestamp::now(),
        }
    }
}
