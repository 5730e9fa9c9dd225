//! Field log: markers placed on the field map during a match.

use crate::model::{FieldGeometry, FieldMarker, MarkerKind, in_unit_range};

use super::MatchError;

/// Markers in placement order, with shooting distances measured on entry.
#[derive(Debug, Clone, Default)]
pub struct FieldLog {
    geometry: FieldGeometry,
    markers: Vec<FieldMarker>,
}

impl FieldLog {
    pub fn new(geometry: FieldGeometry) -> Self {
        Self {
            geometry,
            markers: Vec::new(),
        }
    }

    /// Place a marker at normalised `(x, y)` at match time `time`.
    pub fn add(&mut self, kind: MarkerKind, x: f64, y: f64, time: u32) -> Result<&FieldMarker, MatchError> {
        if !in_unit_range(x) || !in_unit_range(y) {
            return Err(MatchError::OutOfField { x, y });
        }
        let distance = (kind == MarkerKind::Shoot).then(|| self.geometry.distance_to_target(x, y));
        self.markers.push(FieldMarker {
            kind,
            x,
            y,
            time,
            distance,
        });
        Ok(&self.markers[self.markers.len() - 1])
    }

    /// Remove the newest marker.
    pub fn undo_last(&mut self) -> Option<FieldMarker> {
        self.markers.pop()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[FieldMarker] {
        &self.markers
    }

    fn shot_distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.markers.iter().filter_map(|m| m.distance)
    }

    /// Longest shot, 0 when no shots were marked.
    pub fn max_shooting_distance(&self) -> f64 {
        self.shot_distances().fold(0.0, f64::max)
    }

    /// Mean shot distance, 0 when no shots were marked.
    pub fn avg_shooting_distance(&self) -> f64 {
        let (sum, n) = self
            .shot_distances()
            .fold((0.0, 0_u32), |(sum, n), d| (sum + d, n + 1));
        if n == 0 { 0.0 } else { sum / f64::from(n) }
    }
}
