use serde::{Serialize, Serializer};
use std::fmt;

/// Rounds to one decimal place, mapping negative zero to zero
fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 || !rounded.is_finite() {
        0.0
    } else {
        rounded
    }
}

/// A ratio expressed in percent points.
///
/// `NoBase` is the outcome of a ratio whose denominator was zero or missing.
/// It behaves as 0 in arithmetic and renders as `0%`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Percentage {
    #[default]
    NoBase,
    /// Percent points, already rounded to one decimal
    Ratio(f64),
}

impl Percentage {
    /// Build from raw percent points (e.g. `12.34` for 12.34%)
    pub fn from_points(points: f64) -> Self {
        Percentage::Ratio(round1(points))
    }

    /// Percent points, `0.0` for `NoBase`
    pub fn points(&self) -> f64 {
        match self {
            Percentage::NoBase => 0.0,
            Percentage::Ratio(points) => *points,
        }
    }

    /// Spreadsheet fraction (`0.125` for 12.5%)
    pub fn fraction(&self) -> f64 {
        self.points() / 100.0
    }

    pub fn has_base(&self) -> bool {
        matches!(self, Percentage::Ratio(_))
    }

    /// Whether the rate reaches `threshold` percent points
    pub fn meets(&self, threshold: f64) -> bool {
        self.points() >= threshold
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Percentage::NoBase => write!(f, "0%"),
            Percentage::Ratio(points) => write!(f, "{:.1}%", points),
        }
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Percentage-point difference between two rates (not a ratio of ratios)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointDelta(f64);

impl PointDelta {
    /// `to - from`, rounded to one decimal
    pub fn between(from: Percentage, to: Percentage) -> Self {
        PointDelta(round1(to.points() - from.points()))
    }

    pub fn points(&self) -> f64 {
        self.0
    }

    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

impl fmt::Display for PointDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}%", self.0)
        } else {
            write!(f, "{:.1}%", self.0)
        }
    }
}

impl Serialize for PointDelta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
