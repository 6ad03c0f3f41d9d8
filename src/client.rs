//! USGS earthquake feed client.
//!
//! Provides blocking HTTP access to the summary GeoJSON feeds.
//! Uses reqwest with rustls for TLS.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::errors::QuakemapError;
use crate::models::FeatureCollection;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for earthquake feeds.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Minimum-magnitude tier of a summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedLevel {
    All,
    Mag10,
    Mag25,
    Mag45,
    Significant,
}

impl FeedLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Mag10 => "1.0",
            Self::Mag25 => "2.5",
            Self::Mag45 => "4.5",
            Self::Significant => "significant",
        }
    }
}

/// Time window of a summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSpan {
    Hour,
    Day,
    Week,
    Month,
}

impl FeedSpan {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// A summary feed selector, e.g. `all_week` or `2.5_day`.
///
/// USGS publishes one feed per (level, span) pair; the URL path segment is
/// `<level>_<span>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSelector {
    pub level: FeedLevel,
    pub span: FeedSpan,
}

impl FeedSelector {
    /// The `all_week` feed, the default for map rendering.
    pub const ALL_WEEK: Self = Self {
        level: FeedLevel::All,
        span: FeedSpan::Week,
    };

    /// Get the URL path segment for this feed.
    #[must_use]
    pub fn path_segment(self) -> String {
        format!("{}_{}", self.level.as_str(), self.span.as_str())
    }
}

impl std::fmt::Display for FeedSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl std::str::FromStr for FeedSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        let Some((level, span)) = lowered.rsplit_once('_') else {
            return Err(format!("invalid feed '{s}' (expected <level>_<span>)"));
        };

        let level = match level {
            "all" => FeedLevel::All,
            "1.0" => FeedLevel::Mag10,
            "2.5" => FeedLevel::Mag25,
            "4.5" => FeedLevel::Mag45,
            "significant" => FeedLevel::Significant,
            _ => {
                return Err(format!(
                    "unknown feed level: {level} (expected: all, 1.0, 2.5, 4.5, significant)"
                ));
            }
        };

        let span = match span {
            "hour" => FeedSpan::Hour,
            "day" => FeedSpan::Day,
            "week" => FeedSpan::Week,
            "month" => FeedSpan::Month,
            _ => {
                return Err(format!(
                    "unknown feed span: {span} (expected: hour, day, week, month)"
                ));
            }
        };

        Ok(Self { level, span })
    }
}

/// Client for the USGS earthquake feed API.
pub struct FeedClient {
    client: Client,
    base_url: String,
}

impl FeedClient {
    /// Create a new feed client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakemapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: USGS_BASE_URL.to_string(),
        })
    }

    /// Fetch a summary GeoJSON feed.
    ///
    /// One GET, no retries, no pagination. The full feature list is parsed
    /// before this returns, so callers only ever render a complete feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the response cannot be parsed.
    #[instrument(skip(self), fields(feed = %feed))]
    pub fn fetch_feed(&self, feed: FeedSelector) -> Result<FeatureCollection, QuakemapError> {
        let url = format!(
            "{}/earthquakes/feed/v1.0/summary/{}.geojson",
            self.base_url,
            feed.path_segment()
        );

        debug!("fetching feed from {}", url);

        let response = self.client.get(&url).send()?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakemapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let feed: FeatureCollection = response.json()?;
        feed.validate()?;

        debug!("fetched {} events", feed.features.len());
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_selector_round_trip() {
        let feeds = [
            FeedSelector::ALL_WEEK,
            FeedSelector {
                level: FeedLevel::Mag25,
                span: FeedSpan::Day,
            },
            FeedSelector {
                level: FeedLevel::Significant,
                span: FeedSpan::Month,
            },
        ];

        for feed in feeds {
            let s = feed.path_segment();
            let parsed: FeedSelector = s.parse().expect("failed to parse");
            assert_eq!(parsed, feed);
        }
    }

    #[test]
    fn test_feed_selector_paths() {
        assert_eq!(FeedSelector::ALL_WEEK.path_segment(), "all_week");
        let feed: FeedSelector = "2.5_day".parse().expect("failed to parse");
        assert_eq!(feed.level, FeedLevel::Mag25);
        assert_eq!(feed.span, FeedSpan::Day);
    }

    #[test]
    fn test_feed_selector_parse_is_case_insensitive() {
        let feed: FeedSelector = "ALL_WEEK".parse().expect("failed to parse");
        assert_eq!(feed, FeedSelector::ALL_WEEK);
        let feed: FeedSelector = "Significant_Month".parse().expect("failed to parse");
        assert_eq!(feed.level, FeedLevel::Significant);
        assert_eq!(feed.span, FeedSpan::Month);
    }

    #[test]
    fn test_feed_selector_rejects_garbage() {
        assert!("allweek".parse::<FeedSelector>().is_err());
        assert!("3.0_week".parse::<FeedSelector>().is_err());
        assert!("all_year".parse::<FeedSelector>().is_err());
    }
}
