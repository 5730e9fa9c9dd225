//! Field markers: where on the field something happened.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// What a field marker marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Pickup,
    Shoot,
    Score,
}

impl MarkerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Shoot => "shoot",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MarkerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pickup" => Ok(Self::Pickup),
            "shoot" => Ok(Self::Shoot),
            "score" => Ok(Self::Score),
            other => Err(format!("unknown marker type: {other} (pickup, shoot, score)")),
        }
    }
}

/// A point on the field, in coordinates normalised to the field image.
///
/// `(0, 0)` is the top-left corner, `(1, 1)` the bottom-right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub x: f64,
    pub y: f64,

    /// Elapsed match seconds when the marker was placed.
    pub time: u32,

    /// Metres to the target. Only set on shoot markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Physical field size and the point shots are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FieldGeometry {
    /// Field length in metres, along the x axis.
    pub length: f64,

    /// Field width in metres, along the y axis.
    pub width: f64,

    /// Normalised target position.
    pub target_x: f64,
    pub target_y: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            length: 15.98,
            width: 8.21,
            target_x: 1.0,
            target_y: 0.5,
        }
    }
}

impl FieldGeometry {
    /// Straight-line distance in metres from a normalised point to the target.
    pub fn distance_to_target(&self, x: f64, y: f64) -> f64 {
        let dx = (self.target_x - x) * self.length;
        let dy = (self.target_y - y) * self.width;
        dx.hypot(dy)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.length > 0.0 && self.width > 0.0) {
            return Err("field length and width must be positive".to_string());
        }
        if !in_unit_range(self.target_x) || !in_unit_range(self.target_y) {
            return Err("field target must lie within [0, 1]".to_string());
        }
        Ok(())
    }
}

/// True for finite values in `[0, 1]`.
pub fn in_unit_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}
