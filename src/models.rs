//! Data models for the USGS earthquake summary feed.
//!
//! These structures match the GeoJSON format served at
//! `earthquake.usgs.gov/earthquakes/feed/v1.0/summary/`.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::errors::QuakemapError;

/// Top-level GeoJSON response from USGS feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Feed metadata
    pub metadata: Metadata,

    /// Earthquake events
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakemapError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        Ok(())
    }
}

/// Metadata about the feed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// When this feed was generated (ms since epoch)
    pub generated: i64,

    /// Feed URL
    pub url: String,

    /// Human-readable title
    pub title: String,

    /// Number of events in response
    pub count: usize,
}

impl Metadata {
    /// Get the feed generation time as a `DateTime<Utc>`.
    #[must_use]
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.generated).single()
    }
}

/// A single earthquake event.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Always "Feature"
    #[serde(rename = "type")]
    pub type_: String,

    /// Unique event ID
    pub id: String,

    /// Geographic location
    pub geometry: Geometry,

    /// Event properties
    pub properties: Properties,
}

impl Feature {
    /// Get the event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.properties.time).single()
    }

    /// Get longitude (degrees).
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.geometry.coordinates.first().copied().unwrap_or(0.0)
    }

    /// Get latitude (degrees).
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.geometry.coordinates.get(1).copied().unwrap_or(0.0)
    }
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Always "Point"
    #[serde(rename = "type")]
    pub type_: String,

    /// Coordinates: [longitude, latitude, depth_km]
    pub coordinates: Vec<f64>,
}

/// Event properties from the USGS feed.
///
/// `mag` and `place` are null for some events; they stay optional here and
/// degrade at render time instead of being filtered out.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {
            "generated": 1756500000000,
            "url": "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson",
            "title": "USGS All Earthquakes, Past Week",
            "status": 200,
            "api": "1.14.1",
            "count": 2
        },
        "features": [
            {
                "type": "Feature",
                "id": "ak0249abcdef",
                "geometry": {"type": "Point", "coordinates": [-151.4, 61.2, 48.3]},
                "properties": {
                    "mag": 4.2,
                    "magType": "ml",
                    "place": "42 km W of Anchorage, Alaska",
                    "time": 1756490000000,
                    "updated": 1756491000000,
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ak0249abcdef",
                    "status": "automatic",
                    "tsunami": 0
                }
            },
            {
                "type": "Feature",
                "id": "nc75012345",
                "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, 2.1]},
                "properties": {
                    "mag": null,
                    "magType": null,
                    "place": null,
                    "time": 1756480000000,
                    "updated": 1756481000000,
                    "url": null,
                    "status": "reviewed",
                    "tsunami": 0
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_feed() {
        let feed: FeatureCollection =
            serde_json::from_str(SAMPLE_FEED).expect("failed to parse sample feed");

        feed.validate().expect("invalid feed");
        assert_eq!(feed.metadata.count, 2);
        assert_eq!(feed.features.len(), 2);

        let first = &feed.features[0];
        assert_eq!(first.properties.mag, Some(4.2));
        assert!((first.latitude() - 61.2).abs() < f64::EPSILON);
        assert!((first.longitude() - -151.4).abs() < f64::EPSILON);
        assert_eq!(first.geometry.coordinates.len(), 3);
        assert!(first.time().is_some());

        // Null mag/place parse without erroring out
        let second = &feed.features[1];
        assert!(second.properties.mag.is_none());
        assert!(second.properties.place.is_none());
    }

    #[test]
    fn test_validate_rejects_wrong_type_tag() {
        let mut feed: FeatureCollection =
            serde_json::from_str(SAMPLE_FEED).expect("failed to parse sample feed");
        feed.type_ = "Feature".to_string();
        assert!(feed.validate().is_err());
    }
}
