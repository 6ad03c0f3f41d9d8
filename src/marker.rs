//! Feature-to-marker mapping.
//!
//! Turns each feed feature into one circle marker: position from the
//! geometry, radius and fill color from the magnitude encoder, and a
//! two-line HTML popup. Stroke styling is fixed.

use crate::encode::{self, MagColor};
use crate::models::Feature;

/// Stroke color shared by every marker.
pub const STROKE_COLOR: &str = "pink";

/// Stroke weight shared by every marker.
pub const STROKE_WEIGHT: f64 = 0.5;

/// Stroke opacity shared by every marker.
pub const STROKE_OPACITY: f64 = 0.5;

/// Fill opacity shared by every marker.
pub const FILL_OPACITY: f64 = 0.8;

/// One styled circle marker, ready for the map composer.
#[derive(Debug, Clone)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub fill_color: MagColor,
    pub popup_html: String,
}

impl Marker {
    /// Derive a marker from a feed feature.
    ///
    /// A missing magnitude is not filtered out: the radius degenerates to NaN,
    /// the color falls into the weakest bucket, and the popup shows `?`.
    #[must_use]
    pub fn from_feature(feature: &Feature) -> Self {
        let mag = feature.properties.mag.unwrap_or(f64::NAN);
        let mag_str = feature
            .properties
            .mag
            .map_or_else(|| "?".to_string(), fmt_num);
        let place = feature
            .properties
            .place
            .as_deref()
            .unwrap_or("Unknown location");

        Self {
            lat: feature.latitude(),
            lon: feature.longitude(),
            radius: encode::radius(mag),
            fill_color: encode::color(mag),
            popup_html: format!(
                "<h3>Magnitude  {mag_str}</h3><hr><p>Earthquake Location:  {place}</p>"
            ),
        }
    }
}

/// Map a full feed into the overlay marker set, one marker per feature.
#[must_use]
pub fn overlay(features: &[Feature]) -> Vec<Marker> {
    features.iter().map(Marker::from_feature).collect()
}

/// Format a number the way the map emits it: up to two decimals, trailing
/// zeros trimmed, so `4.2 * 6.0` prints as `25.2` and `4.0` as `4`.
#[must_use]
pub fn fmt_num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}
