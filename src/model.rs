//! Core data model for scouting.
//!
//! These types describe what happens in a match: periods, actions,
//! points and scores, field markers, and the record a finished match
//! leaves behind.

mod action;
mod marker;
mod period;
mod points;
mod record;

pub use action::{ActionClass, ActionKind, ActionRecord, BallEffect, Section};
pub use marker::{FieldGeometry, FieldMarker, MarkerKind, in_unit_range};
pub use period::{MatchTiming, Period};
pub use points::{MAX_POINTS, PointTable, Scores, signed};
pub use record::{Alliance, MatchFilter, MatchInfo, MatchRecord};
