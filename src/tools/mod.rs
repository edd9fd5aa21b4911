//! Tool layer.
//!
//! [`LastFmTools`] turns named tool calls with JSON arguments into client
//! requests, shapes the results and renders them as pretty-printed JSON
//! text.

mod catalogue;
mod params;
mod recommend;

use std::future::Future;

use chrono::Utc;
use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::{LastFmApi, RecentTracksQuery};
use crate::config::Config;
use crate::error::{LastFmError, Result};
use crate::shaper::{shape, DetailLevel};

pub use catalogue::{catalogue, ToolDefinition, TOOL_NAMES};
pub use params::{
    parse_date, AlbumInfoParams, ArtistInfoParams, CompareUsersParams, LovedTracksParams,
    NowPlayingParams, RecentTracksParams, RecommendationsParams, SearchKind, SearchMusicParams,
    StatsSection, TimeRange, TopChartParams, TrackInfoParams, UserStatsParams,
};
pub use recommend::{rank_candidates, Candidate};

/// Text returned by `get_now_playing` when nothing is playing.
pub const NOTHING_PLAYING: &str = "No track currently playing";

/// Largest `limit` any tool accepts.
pub const MAX_LIMIT: u32 = 1000;

/// Recent tracks in the stats summary never exceed this.
const STATS_RECENT_CAP: u32 = 20;

/// Dispatches tool calls against a [`LastFmApi`].
///
/// # Example
///
/// ```rust,no_run
/// use lastfm_tools::{Config, LastFmTools};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::new("your_api_key")?.with_default_username(Some("rj".into()));
///     let tools = LastFmTools::new(&config)?;
///
///     let text = tools
///         .call("get_top_artists", json!({ "period": "7day", "limit": 5 }))
///         .await?;
///     println!("{}", text);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LastFmTools {
    api: LastFmApi,
    default_username: Option<String>,
}

impl LastFmTools {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            api: LastFmApi::new(config)?,
            default_username: config.default_username().map(str::to_string),
        })
    }

    /// The underlying client.
    pub fn api(&self) -> &LastFmApi {
        &self.api
    }

    /// Tool definitions, with the configured username in descriptions.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        catalogue(self.default_username.as_deref())
    }

    pub fn has_tool(name: &str) -> bool {
        TOOL_NAMES.contains(&name)
    }

    /// Run the tool `name` with JSON object `args`.
    ///
    /// # Errors
    ///
    /// `Validation` for unknown tools and bad arguments; `Operation` wrapping
    /// the client error when the upstream call fails.
    pub async fn call(&self, name: &str, args: Value) -> Result<String> {
        debug!("tool call {} {}", name, args);

        match name {
            "search_music" => self.search_music(parse_args(args)?).await,
            "get_user_stats" => self.get_user_stats(parse_args(args)?).await,
            "get_recent_tracks" => self.get_recent_tracks(parse_args(args)?).await,
            "get_now_playing" => self.get_now_playing(parse_args(args)?).await,
            "get_track_info" => self.get_track_info(parse_args(args)?).await,
            "get_artist_info" => self.get_artist_info(parse_args(args)?).await,
            "get_album_info" => self.get_album_info(parse_args(args)?).await,
            "get_top_artists" => self.get_top_artists(parse_args(args)?).await,
            "get_top_tracks" => self.get_top_tracks(parse_args(args)?).await,
            "get_top_albums" => self.get_top_albums(parse_args(args)?).await,
            "get_loved_tracks" => self.get_loved_tracks(parse_args(args)?).await,
            "compare_users" => self.compare_users(parse_args(args)?).await,
            "get_recommendations" => self.get_recommendations(parse_args(args)?).await,
            other => Err(LastFmError::Validation(format!("Unknown tool: {}", other))),
        }
    }

    /// Explicit username, else the configured default.
    fn resolve_user(&self, username: Option<&str>) -> Result<String> {
        username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .or(self.default_username.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                LastFmError::Validation(
                    "Username is required (no default username configured)".to_string(),
                )
            })
    }

    // ==================
    // SEARCH
    // ==================

    pub async fn search_music(&self, params: SearchMusicParams) -> Result<String> {
        let query = required("Query", &params.query)?;
        let limit = check_limit("limit", params.limit)?;

        let results = self
            .search(params.kind, query, limit)
            .await
            .map_err(|e| e.context("Search failed"))?;

        render(&results, params.detail_level)
    }

    async fn search(&self, kind: SearchKind, query: &str, limit: u32) -> Result<Value> {
        match kind {
            SearchKind::Track => to_json(&self.api.search_tracks(query, limit).await?),
            SearchKind::Artist => to_json(&self.api.search_artists(query, limit).await?),
            SearchKind::Album => to_json(&self.api.search_albums(query, limit).await?),
        }
    }

    // ==================
    // USER ACTIVITY
    // ==================

    /// Fetch the requested summary sections concurrently. Any failed section
    /// fails the whole summary.
    pub async fn get_user_stats(&self, params: UserStatsParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;
        let count = check_limit("top_items_count", params.top_items_count)?;
        let period = params.period;
        let query = RecentTracksQuery::default().with_limit(count.min(STATS_RECENT_CAP));

        let mut fetches: Vec<BoxFuture<'_, Result<(&'static str, Value)>>> = Vec::new();

        if params.includes(StatsSection::Profile) {
            fetches.push(section("profile", self.api.get_user_info(&user)));
        }
        if params.includes(StatsSection::NowPlaying) {
            fetches.push(section("nowPlaying", self.api.get_now_playing(&user)));
        }
        if params.includes(StatsSection::TopArtists) {
            fetches.push(section("topArtists", self.api.get_top_artists(&user, period, count)));
        }
        if params.includes(StatsSection::TopTracks) {
            fetches.push(section("topTracks", self.api.get_top_tracks(&user, period, count)));
        }
        if params.includes(StatsSection::Recent) {
            fetches.push(section("recentTracks", self.api.get_recent_tracks(&user, &query)));
        }

        let sections = try_join_all(fetches)
            .await
            .map_err(|e| e.context("Failed to get user stats"))?;

        let mut stats = Map::new();
        stats.insert("period".to_string(), Value::from(period.as_str()));
        for (key, value) in sections {
            stats.insert(key.to_string(), value);
        }

        render(&Value::Object(stats), params.detail_level)
    }

    pub async fn get_recent_tracks(&self, params: RecentTracksParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;
        let limit = check_limit("limit", params.limit)?;
        let (from, to) = params.window(Utc::now().timestamp())?;

        let query = RecentTracksQuery::default().with_limit(limit).between(from, to);
        let tracks = self
            .api
            .get_recent_tracks(&user, &query)
            .await
            .map_err(|e| e.context("Failed to get recent tracks"))?;

        render(&to_json(&tracks)?, params.detail_level)
    }

    /// The live track in full, or [`NOTHING_PLAYING`].
    pub async fn get_now_playing(&self, params: NowPlayingParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;

        match self
            .api
            .get_now_playing(&user)
            .await
            .map_err(|e| e.context("Failed to get now playing"))?
        {
            Some(track) => Ok(serde_json::to_string_pretty(&track)?),
            None => Ok(NOTHING_PLAYING.to_string()),
        }
    }

    pub async fn get_loved_tracks(&self, params: LovedTracksParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;
        let limit = check_limit("limit", params.limit)?;

        let tracks = self
            .api
            .get_loved_tracks(&user, limit, 1)
            .await
            .map_err(|e| e.context("Failed to get loved tracks"))?;

        render(&to_json(&tracks)?, params.detail_level)
    }

    // ==================
    // METADATA
    // ==================

    /// The user's own play count is included when a username resolves; a
    /// missing username is not an error here.
    pub async fn get_track_info(&self, params: TrackInfoParams) -> Result<String> {
        let artist = required("Artist", &params.artist)?;
        let track = required("Track", &params.track)?;
        let user = self.resolve_user(params.username.as_deref()).ok();

        let info = self
            .api
            .get_track_info(artist, track, user.as_deref())
            .await
            .map_err(|e| e.context("Failed to get track info"))?;

        render(&to_json(&info)?, params.detail_level)
    }

    pub async fn get_artist_info(&self, params: ArtistInfoParams) -> Result<String> {
        let artist = required("Artist", &params.artist)?;
        let user = self.resolve_user(params.username.as_deref()).ok();

        let info = self
            .api
            .get_artist_info(artist, user.as_deref())
            .await
            .map_err(|e| e.context("Failed to get artist info"))?;

        render(&to_json(&info)?, params.detail_level)
    }

    pub async fn get_album_info(&self, params: AlbumInfoParams) -> Result<String> {
        let artist = required("Artist", &params.artist)?;
        let album = required("Album", &params.album)?;
        let user = self.resolve_user(params.username.as_deref()).ok();

        let info = self
            .api
            .get_album_info(artist, album, user.as_deref())
            .await
            .map_err(|e| e.context("Failed to get album info"))?;

        render(&to_json(&info)?, params.detail_level)
    }

    // ==================
    // CHARTS
    // ==================

    pub async fn get_top_artists(&self, params: TopChartParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;
        let limit = check_limit("limit", params.limit)?;

        let artists = self
            .api
            .get_top_artists(&user, params.period, limit)
            .await
            .map_err(|e| e.context("Failed to get top artists"))?;

        render(&to_json(&artists)?, params.detail_level)
    }

    pub async fn get_top_tracks(&self, params: TopChartParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;
        let limit = check_limit("limit", params.limit)?;

        let tracks = self
            .api
            .get_top_tracks(&user, params.period, limit)
            .await
            .map_err(|e| e.context("Failed to get top tracks"))?;

        render(&to_json(&tracks)?, params.detail_level)
    }

    pub async fn get_top_albums(&self, params: TopChartParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;
        let limit = check_limit("limit", params.limit)?;

        let albums = self
            .api
            .get_top_albums(&user, params.period, limit)
            .await
            .map_err(|e| e.context("Failed to get top albums"))?;

        render(&to_json(&albums)?, params.detail_level)
    }

    // ==================
    // SOCIAL
    // ==================

    pub async fn compare_users(&self, params: CompareUsersParams) -> Result<String> {
        let user1 = required("user1", &params.user1)?;
        let user2 = self.resolve_user(params.user2.as_deref())?;
        let limit = check_limit("limit", params.limit)?;

        let comparison = self
            .api
            .compare_users(user1, &user2, Some(limit))
            .await
            .map_err(|e| e.context("Failed to compare users"))?;

        render(&to_json(&comparison)?, params.detail_level)
    }

    pub async fn get_recommendations(&self, params: RecommendationsParams) -> Result<String> {
        let user = self.resolve_user(params.username.as_deref())?;
        let seed_count = check_limit("seed_count", params.seed_count)?;
        let limit = check_limit("limit", params.limit)?;

        let picks = self
            .recommend(&user, params.period, seed_count, limit)
            .await
            .map_err(|e| e.context("Failed to get recommendations"))?;

        render(&Value::Array(picks), params.detail_level)
    }
}

/// Decode tool arguments; a missing argument object counts as empty.
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(args)
        .map_err(|e| LastFmError::Validation(format!("Invalid arguments: {}", e)))
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LastFmError::Validation(format!("{} is required", field)));
    }
    Ok(value)
}

fn check_limit(field: &str, value: u32) -> Result<u32> {
    if !(1..=MAX_LIMIT).contains(&value) {
        return Err(LastFmError::Validation(format!(
            "{} must be between 1 and {} (got {})",
            field, MAX_LIMIT, value
        )));
    }
    Ok(value)
}

/// A named stats section fetched as JSON.
fn section<'a, T, F>(key: &'static str, fetch: F) -> BoxFuture<'a, Result<(&'static str, Value)>>
where
    T: Serialize + Send,
    F: Future<Output = Result<T>> + Send + 'a,
{
    async move { Ok((key, to_json(&fetch.await?)?)) }.boxed()
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn render(value: &Value, level: DetailLevel) -> Result<String> {
    Ok(serde_json::to_string_pretty(&shape(value, level))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tools(default_username: Option<&str>) -> LastFmTools {
        let config = Config::new("test-key")
            .unwrap()
            .with_default_username(default_username.map(str::to_string))
            .with_base_url("http://127.0.0.1:9/");
        LastFmTools::new(&config).unwrap()
    }

    #[test]
    fn test_resolve_user() {
        let with_default = tools(Some("rj"));
        assert_eq!(with_default.resolve_user(None).unwrap(), "rj");
        assert_eq!(with_default.resolve_user(Some("alice")).unwrap(), "alice");
        assert_eq!(with_default.resolve_user(Some("  ")).unwrap(), "rj");

        let err = tools(None).resolve_user(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Username is required (no default username configured)"
        );
    }

    #[test]
    fn test_check_limit_bounds() {
        assert_eq!(check_limit("limit", 1).unwrap(), 1);
        assert_eq!(check_limit("limit", 1000).unwrap(), 1000);
        assert!(check_limit("limit", 0).is_err());
        assert!(check_limit("limit", 1001).is_err());
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("Query", "  cher ").unwrap(), "cher");
        assert_eq!(
            required("Query", "   ").unwrap_err().to_string(),
            "Query is required"
        );
    }

    #[test]
    fn test_parse_args_accepts_null() {
        let params: NowPlayingParams = parse_args(Value::Null).unwrap();
        assert!(params.username.is_none());

        let err = parse_args::<SearchMusicParams>(json!({ "query": "x", "type": "song" }))
            .unwrap_err();
        assert!(matches!(err, LastFmError::Validation(_)));
    }

    #[test]
    fn test_has_tool() {
        assert!(LastFmTools::has_tool("get_recommendations"));
        assert!(!LastFmTools::has_tool("get_weather"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = tools(Some("rj")).call("get_weather", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: get_weather");
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_request() {
        let tools = tools(None);

        let err = tools
            .call("search_music", json!({ "query": "", "type": "track" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Query is required");

        let err = tools.call("get_top_artists", json!({})).await.unwrap_err();
        assert!(matches!(err, LastFmError::Validation(_)));

        let err = tools
            .call("get_recent_tracks", json!({ "username": "rj", "limit": 0 }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("between 1 and 1000"));

        let err = tools
            .call("get_recent_tracks", json!({ "username": "rj", "time_range": "custom" }))
            .await
            .unwrap_err();
        assert!(matches!(err, LastFmError::Validation(_)));
    }
}
