//! Magnitude-to-visual encoding.
//!
//! Two pure functions shared by the marker mapper and the legend: a linear
//! radius scale and a six-bucket color step function.

/// Radius multiplier applied to the raw magnitude.
const RADIUS_SCALE: f64 = 6.0;

/// Discrete marker colors, one per magnitude bucket.
///
/// Ordered from weakest to strongest. The string forms are CSS color names
/// emitted verbatim into marker styles and legend swatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagColor {
    LightBlue,
    LightPurple,
    Blue,
    Purple,
    DarkBlue,
    DarkPurple,
}

impl MagColor {
    /// CSS color name for this bucket.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LightBlue => "lightblue",
            Self::LightPurple => "lightpurple",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::DarkBlue => "darkblue",
            Self::DarkPurple => "darkpurple",
        }
    }
}

/// Color buckets as an ordered (lower bound, color) table, strongest first.
///
/// Buckets are closed at the lower bound and open at the upper: `color` scans
/// this table top-down and returns the first bucket whose bound the magnitude
/// reaches. The final catch-all bound is negative infinity, so the function is
/// total over the reals.
const COLOR_STEPS: [(f64, MagColor); 6] = [
    (5.0, MagColor::DarkPurple),
    (4.0, MagColor::DarkBlue),
    (3.0, MagColor::Purple),
    (2.0, MagColor::Blue),
    (1.0, MagColor::LightPurple),
    (f64::NEG_INFINITY, MagColor::LightBlue),
];

/// Lower bounds of the legend rows, ascending. The last row is open-ended.
pub const LEGEND_LEVELS: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

/// Map a magnitude to its marker radius.
///
/// Linear, unclamped: negative magnitudes yield a negative radius, which is
/// passed through to the rendering layer as-is.
#[must_use]
pub fn radius(mag: f64) -> f64 {
    mag * RADIUS_SCALE
}

/// Map a magnitude to its color bucket.
///
/// NaN (a missing magnitude) falls through the whole table and lands in the
/// weakest bucket.
#[must_use]
pub fn color(mag: f64) -> MagColor {
    COLOR_STEPS
        .iter()
        .find(|(bound, _)| mag >= *bound)
        .map_or(MagColor::LightBlue, |(_, c)| *c)
}
