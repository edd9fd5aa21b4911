//! Last.fm web service client.
//!
//! Every operation is a single `GET` against one endpoint, selected by the
//! `method` query parameter. Responses arrive wrapped in a method-specific
//! envelope (`{"recenttracks": {"track": [...], "@attr": {...}}}`); the
//! client unwraps it and drops the pagination block. Records come back as
//! [`Record`]s, so callers can read the typed view and still pass on the
//! upstream JSON unchanged.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{LastFmError, Result};
use crate::models::{Album, Artist, Period, Record, TasteComparison, Track, User};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("lastfm-tools/", env!("CARGO_PKG_VERSION"));

/// Page and time window for `user.getrecenttracks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTracksQuery {
    pub limit: u32,
    pub page: u32,
    /// Only scrobbles at or after this unix timestamp.
    pub from: Option<i64>,
    /// Only scrobbles at or before this unix timestamp.
    pub to: Option<i64>,
}

impl Default for RecentTracksQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            page: 1,
            from: None,
            to: None,
        }
    }
}

impl RecentTracksQuery {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn between(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    fn params(&self, username: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("user", username.to_string()),
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(from) = self.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_string()));
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Envelopes (private; only the inner lists leave this module)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default, deserialize_with = "crate::models::common::one_or_many")]
    track: Vec<Record<Track>>,
}

#[derive(Debug, Deserialize)]
struct ArtistPage {
    #[serde(default, deserialize_with = "crate::models::common::one_or_many")]
    artist: Vec<Record<Artist>>,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    #[serde(default, deserialize_with = "crate::models::common::one_or_many")]
    album: Vec<Record<Album>>,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: Record<User>,
}

#[derive(Debug, Deserialize)]
struct RecentTracksResponse {
    recenttracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    toptracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct LovedTracksResponse {
    lovedtracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TopArtistsResponse {
    topartists: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct TopAlbumsResponse {
    topalbums: AlbumPage,
}

#[derive(Debug, Deserialize)]
struct SearchResponse<M> {
    results: M,
}

#[derive(Debug, Deserialize)]
struct TrackMatches {
    trackmatches: TrackPage,
}

#[derive(Debug, Deserialize)]
struct ArtistMatches {
    artistmatches: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct AlbumMatches {
    albummatches: AlbumPage,
}

#[derive(Debug, Deserialize)]
struct ArtistInfoResponse {
    artist: Record<Artist>,
}

#[derive(Debug, Deserialize)]
struct SimilarArtistsResponse {
    similarartists: ArtistPage,
}

#[derive(Debug, Deserialize)]
struct TrackInfoResponse {
    track: Record<Track>,
}

#[derive(Debug, Deserialize)]
struct AlbumInfoResponse {
    album: Record<Album>,
}

#[derive(Debug, Deserialize)]
struct ComparisonResponse {
    comparison: ComparisonBody,
}

#[derive(Debug, Deserialize)]
struct ComparisonBody {
    result: ComparisonResult,
}

#[derive(Debug, Deserialize)]
struct ComparisonResult {
    #[serde(default, deserialize_with = "crate::models::common::lenient_string")]
    score: Option<String>,
    #[serde(default, deserialize_with = "crate::models::common::record_or_blank")]
    artists: Option<ArtistPage>,
}

/// Last.fm API client.
///
/// Stateless apart from the pooled HTTP connection; clones share the pool
/// and may be used from concurrent tasks.
///
/// # Example
///
/// ```rust,no_run
/// use lastfm_tools::{Config, LastFmApi, Period};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = LastFmApi::new(&Config::new("your_api_key")?)?;
///     for artist in api.get_top_artists("rj", Period::SevenDay, 10).await? {
///         println!("{} ({} plays)", artist.name, artist.playcount.as_deref().unwrap_or("0"));
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LastFmApi {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LastFmApi {
    /// Create a client from the process configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_key: config.api_key().to_string(),
            base_url: config.base_url().to_string(),
        })
    }

    /// Invoke an API method and decode its envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        debug!("GET {} method={} params: {:?}", self.base_url, method, params);

        let mut query: Vec<(&str, &str)> = vec![
            ("method", method),
            ("api_key", self.api_key.as_str()),
            ("format", "json"),
        ];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self.client.get(&self.base_url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown status");
            let body = response.text().await.unwrap_or_default();
            let message = match upstream_message(&body) {
                Some(detail) => format!("{} ({})", reason, detail),
                None => reason.to_string(),
            };
            error!("Last.fm API error for {}: {} {}", method, status.as_u16(), message);
            return Err(LastFmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;

        // Last.fm sometimes reports failures in-band with a 200
        if data.get("error").and_then(Value::as_i64).is_some() {
            let message = upstream_message(&body).unwrap_or_else(|| "Unknown error".to_string());
            error!("Last.fm API error for {}: {}", method, message);
            return Err(LastFmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_value(data)?)
    }

    /// Get a user's profile.
    pub async fn get_user_info(&self, username: &str) -> Result<Record<User>> {
        let response: UserInfoResponse = self
            .call("user.getinfo", &[("user", username.to_string())])
            .await?;
        Ok(response.user)
    }

    /// Get a user's scrobble history, newest first.
    ///
    /// While something is playing the first entry is the in-progress track,
    /// so a page may hold one more item than `limit`.
    pub async fn get_recent_tracks(
        &self,
        username: &str,
        query: &RecentTracksQuery,
    ) -> Result<Vec<Record<Track>>> {
        let response: RecentTracksResponse = self
            .call("user.getrecenttracks", &query.params(username))
            .await?;
        Ok(response.recenttracks.track)
    }

    /// Get the track a user is listening to right now.
    ///
    /// Returns `None` when the most recent track is plain history.
    pub async fn get_now_playing(&self, username: &str) -> Result<Option<Record<Track>>> {
        let query = RecentTracksQuery::default().with_limit(1);
        let tracks = self.get_recent_tracks(username, &query).await?;
        Ok(tracks.into_iter().next().filter(|track| track.is_now_playing()))
    }

    /// Get a user's most played artists for a period.
    pub async fn get_top_artists(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Record<Artist>>> {
        let response: TopArtistsResponse = self
            .call("user.gettopartists", &chart_params(username, period, limit))
            .await?;
        Ok(response.topartists.artist)
    }

    /// Get a user's most played tracks for a period.
    pub async fn get_top_tracks(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Record<Track>>> {
        let response: TopTracksResponse = self
            .call("user.gettoptracks", &chart_params(username, period, limit))
            .await?;
        Ok(response.toptracks.track)
    }

    /// Get a user's most played albums for a period.
    pub async fn get_top_albums(
        &self,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Record<Album>>> {
        let response: TopAlbumsResponse = self
            .call("user.gettopalbums", &chart_params(username, period, limit))
            .await?;
        Ok(response.topalbums.album)
    }

    /// Get tracks a user has marked as loved.
    pub async fn get_loved_tracks(
        &self,
        username: &str,
        limit: u32,
        page: u32,
    ) -> Result<Vec<Record<Track>>> {
        let response: LovedTracksResponse = self
            .call(
                "user.getlovedtracks",
                &[
                    ("user", username.to_string()),
                    ("limit", limit.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;
        Ok(response.lovedtracks.track)
    }

    /// Search for tracks by title.
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Record<Track>>> {
        let response: SearchResponse<TrackMatches> = self
            .call(
                "track.search",
                &[("track", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.results.trackmatches.track)
    }

    /// Search for artists by name.
    pub async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Record<Artist>>> {
        let response: SearchResponse<ArtistMatches> = self
            .call(
                "artist.search",
                &[("artist", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.results.artistmatches.artist)
    }

    /// Search for albums by title.
    pub async fn search_albums(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Record<Album>>> {
        let response: SearchResponse<AlbumMatches> = self
            .call(
                "album.search",
                &[("album", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.results.albummatches.album)
    }

    /// Get artist metadata, with the user's play count when `username` is given.
    pub async fn get_artist_info(
        &self,
        artist: &str,
        username: Option<&str>,
    ) -> Result<Record<Artist>> {
        let mut params = vec![("artist", artist.to_string())];
        push_username(&mut params, username);

        let response: ArtistInfoResponse = self.call("artist.getinfo", &params).await?;
        Ok(response.artist)
    }

    /// Get artists similar to `artist`, best match first.
    pub async fn get_similar_artists(&self, artist: &str, limit: u32) -> Result<Vec<Artist>> {
        let response: SimilarArtistsResponse = self
            .call(
                "artist.getsimilar",
                &[("artist", artist.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response
            .similarartists
            .artist
            .into_iter()
            .map(Record::into_view)
            .collect())
    }

    /// Get track metadata, with the user's play count and loved flag when
    /// `username` is given.
    pub async fn get_track_info(
        &self,
        artist: &str,
        track: &str,
        username: Option<&str>,
    ) -> Result<Record<Track>> {
        let mut params = vec![("artist", artist.to_string()), ("track", track.to_string())];
        push_username(&mut params, username);

        let response: TrackInfoResponse = self.call("track.getinfo", &params).await?;
        Ok(response.track)
    }

    /// Get album metadata including its track listing.
    pub async fn get_album_info(
        &self,
        artist: &str,
        album: &str,
        username: Option<&str>,
    ) -> Result<Record<Album>> {
        let mut params = vec![("artist", artist.to_string()), ("album", album.to_string())];
        push_username(&mut params, username);

        let response: AlbumInfoResponse = self.call("album.getinfo", &params).await?;
        Ok(response.album)
    }

    /// Compare two users' libraries.
    pub async fn compare_users(
        &self,
        user1: &str,
        user2: &str,
        limit: Option<u32>,
    ) -> Result<TasteComparison> {
        let mut params = vec![
            ("type1", "user".to_string()),
            ("type2", "user".to_string()),
            ("value1", user1.to_string()),
            ("value2", user2.to_string()),
        ];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }

        let response: ComparisonResponse = self.call("tasteometer.compare", &params).await?;
        let result = response.comparison.result;
        Ok(TasteComparison {
            score: result.score,
            artists: result.artists.map(|a| a.artist).unwrap_or_default(),
        })
    }
}

fn chart_params(username: &str, period: Period, limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("user", username.to_string()),
        ("period", period.as_str().to_string()),
        ("limit", limit.to_string()),
    ]
}

fn push_username(params: &mut Vec<(&'static str, String)>, username: Option<&str>) {
    if let Some(user) = username.filter(|u| !u.is_empty()) {
        params.push(("username", user.to_string()));
    }
}

/// Pull the `message` out of an upstream error body, if it is one.
fn upstream_message(body: &str) -> Option<String> {
    let data: Value = serde_json::from_str(body).ok()?;
    let message = data.get("message").and_then(Value::as_str)?;
    match data.get("error").and_then(Value::as_i64) {
        Some(code) => Some(format!("{} (code {})", message, code)),
        None => Some(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_tracks_params() {
        let params = RecentTracksQuery::default()
            .with_limit(10)
            .with_page(2)
            .between(Some(100), None)
            .params("rj");
        assert_eq!(
            params,
            vec![
                ("user", "rj".to_string()),
                ("limit", "10".to_string()),
                ("page", "2".to_string()),
                ("from", "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_chart_params_serialize_period_and_limit() {
        let params = chart_params("rj", Period::SevenDay, 10);
        assert!(params.contains(&("period", "7day".to_string())));
        assert!(params.contains(&("limit", "10".to_string())));
    }

    #[test]
    fn test_push_username_skips_blank() {
        let mut params = Vec::new();
        push_username(&mut params, Some(""));
        push_username(&mut params, None);
        assert!(params.is_empty());
        push_username(&mut params, Some("rj"));
        assert_eq!(params, vec![("username", "rj".to_string())]);
    }

    #[test]
    fn test_upstream_message() {
        assert_eq!(
            upstream_message(r#"{"error":6,"message":"User not found"}"#).as_deref(),
            Some("User not found (code 6)")
        );
        assert_eq!(upstream_message("<html>"), None);
    }

    #[test]
    fn test_envelope_unwrap_discards_pagination() {
        let raw = serde_json::json!({
            "topartists": {
                "artist": [{ "name": "Cher", "playcount": "10", "@attr": { "rank": "1" } }],
                "@attr": { "user": "rj", "page": "1", "perPage": "50", "totalPages": "1", "total": "1" }
            }
        });
        let response: TopArtistsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.topartists.artist.len(), 1);
        assert_eq!(response.topartists.artist[0].name, "Cher");
    }

    #[test]
    fn test_comparison_envelope() {
        let raw = serde_json::json!({
            "comparison": { "result": {
                "score": "0.42",
                "artists": { "artist": { "name": "Cher" }, "@attr": { "matches": "1" } }
            }}
        });
        let response: ComparisonResponse = serde_json::from_value(raw).unwrap();
        let result = response.comparison.result;
        assert_eq!(result.score.as_deref(), Some("0.42"));
        assert_eq!(result.artists.map(|a| a.artist.len()), Some(1));
    }

    #[test]
    fn test_comparison_without_score() {
        let raw = serde_json::json!({ "comparison": { "result": { "artists": "" } } });
        let response: ComparisonResponse = serde_json::from_value(raw).unwrap();
        let result = response.comparison.result;
        assert_eq!(result.score, None);
        assert!(result.artists.is_none());
    }
}
