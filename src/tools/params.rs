//! Tool parameter types.
//!
//! Each tool call arrives as a JSON object of named arguments. Missing
//! optional arguments fall back to the defaults below; missing required
//! strings deserialize as empty so the tool can report them by name.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{LastFmError, Result};
use crate::models::Period;
use crate::shaper::DetailLevel;

const DAY: i64 = 86_400;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;

fn default_search_limit() -> u32 {
    30
}

fn default_limit() -> u32 {
    50
}

fn default_top_items() -> u32 {
    10
}

fn default_seed_count() -> u32 {
    5
}

fn default_sections() -> Vec<StatsSection> {
    vec![
        StatsSection::Profile,
        StatsSection::NowPlaying,
        StatsSection::TopArtists,
        StatsSection::TopTracks,
    ]
}

/// What `search_music` looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Track,
    Artist,
    Album,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchMusicParams {
    #[serde(default)]
    pub query: String,
    #[serde(rename = "type")]
    pub kind: SearchKind,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

/// Sections of the combined user summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum StatsSection {
    #[serde(rename = "profile")]
    Profile,
    #[serde(rename = "nowplaying")]
    NowPlaying,
    #[serde(rename = "recent")]
    Recent,
    #[serde(rename = "top_artists")]
    TopArtists,
    #[serde(rename = "top_tracks")]
    TopTracks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserStatsParams {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub period: Period,
    #[serde(default = "default_sections")]
    pub include_sections: Vec<StatsSection>,
    #[serde(default = "default_top_items")]
    pub top_items_count: u32,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

impl UserStatsParams {
    pub fn includes(&self, section: StatsSection) -> bool {
        self.include_sections.contains(&section)
    }
}

/// Preset windows for `get_recent_tracks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    Custom,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentTracksParams {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub time_range: TimeRange,
    /// Custom window: look back this many hours.
    #[serde(default)]
    pub custom_hours: Option<f64>,
    /// Custom window start (RFC 3339 or YYYY-MM-DD).
    #[serde(default)]
    pub from_date: Option<String>,
    /// Custom window end (RFC 3339 or YYYY-MM-DD).
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

impl RecentTracksParams {
    /// Resolve the requested window to `(from, to)` unix timestamps.
    pub fn window(&self, now: i64) -> Result<(Option<i64>, Option<i64>)> {
        match self.time_range {
            TimeRange::All => Ok((None, None)),
            TimeRange::Today => Ok((Some(now - DAY), None)),
            TimeRange::Week => Ok((Some(now - WEEK), None)),
            TimeRange::Month => Ok((Some(now - MONTH), None)),
            TimeRange::Custom => self.custom_window(now),
        }
    }

    fn custom_window(&self, now: i64) -> Result<(Option<i64>, Option<i64>)> {
        if let Some(hours) = self.custom_hours {
            if hours <= 0.0 || !hours.is_finite() {
                return Err(LastFmError::Validation(
                    "custom_hours must be a positive number".to_string(),
                ));
            }
            return Ok((Some(now - (hours * 3600.0) as i64), None));
        }

        if self.from_date.is_none() && self.to_date.is_none() {
            return Err(LastFmError::Validation(
                "Custom time range requires either custom_hours or from_date/to_date".to_string(),
            ));
        }

        let from = self.from_date.as_deref().map(parse_date).transpose()?;
        let to = self.to_date.as_deref().map(parse_date).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(LastFmError::Validation(
                    "from_date must not be after to_date".to_string(),
                ));
            }
        }
        Ok((from, to))
    }
}

/// Parse an RFC 3339 timestamp or a bare date (midnight UTC).
pub fn parse_date(text: &str) -> Result<i64> {
    let text = text.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Ok(datetime.timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight).timestamp());
        }
    }
    Err(LastFmError::Validation(format!(
        "Invalid date '{}' (expected ISO 8601, e.g. 2024-01-15T10:00:00Z)",
        text
    )))
}

#[derive(Debug, Clone, Deserialize)]
pub struct NowPlayingParams {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackInfoParams {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub track: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfoParams {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfoParams {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

/// Shared by the top artists / tracks / albums tools.
#[derive(Debug, Clone, Deserialize)]
pub struct TopChartParams {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub period: Period,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LovedTracksParams {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareUsersParams {
    #[serde(default)]
    pub user1: String,
    /// Defaults to the configured user.
    #[serde(default)]
    pub user2: Option<String>,
    #[serde(default = "default_top_items")]
    pub limit: u32,
    #[serde(default)]
    pub detail_level: DetailLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsParams {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub period: Period,
    /// How many of the user's top artists to branch out from.
    #[serde(default = "default_seed_count")]
    pub seed_count: u32,
    #[serde(default = "default_top_items")]
    pub limit: u32,
    #[serde(default)]
    pub detail_level: DetailLevel,
}
