//! Track-related models.
//!
//! The same record type covers recent scrobbles, chart entries, loved
//! tracks, search matches and `track.getinfo` results; each flavour fills a
//! different subset of the optional fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::album::AlbumRef;
use super::artist::ArtistRef;
use super::common::{lenient_string, marker_is_set, one_or_many, Image, ScrobbleDate};

/// The `@attr` block on a track.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackAttr {
    /// Set on the first recent track while it is still playing.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub nowplaying: Option<String>,

    /// Chart position in top-track listings.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub rank: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A track record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Track title.
    pub name: String,

    /// Performing artist, either a bare name or a nested record.
    pub artist: ArtistRef,

    /// Album the scrobble was attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumRef>,

    /// MusicBrainz identifier (often empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub playcount: Option<String>,

    /// When the track was scrobbled; absent while now playing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<ScrobbleDate>,

    #[serde(rename = "@attr", default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<TrackAttr>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub image: Vec<Image>,

    /// Upstream fields without a typed home.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    /// Whether this is the in-progress scrobble rather than history.
    pub fn is_now_playing(&self) -> bool {
        self.attr
            .as_ref()
            .and_then(|a| a.nowplaying.as_deref())
            .is_some_and(marker_is_set)
    }

    pub fn artist_name(&self) -> &str {
        self.artist.name()
    }

    pub fn album_title(&self) -> Option<&str> {
        self.album.as_ref().and_then(|a| a.title())
    }

    /// Play count as a number, when the upstream sent one.
    pub fn playcount(&self) -> Option<u64> {
        self.playcount.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recent_track() -> Value {
        json!({
            "artist": { "mbid": "", "#text": "Boards of Canada" },
            "streamable": "0",
            "image": [{ "size": "small", "#text": "http://img/s.png" }],
            "mbid": "",
            "album": { "mbid": "", "#text": "Geogaddi" },
            "name": "Music Is Math",
            "@attr": { "nowplaying": "true" },
            "url": "https://www.last.fm/music/Boards+of+Canada/_/Music+Is+Math"
        })
    }

    #[test]
    fn test_recent_track_now_playing() {
        let track: Track = serde_json::from_value(recent_track()).unwrap();
        assert!(track.is_now_playing());
        assert_eq!(track.artist_name(), "Boards of Canada");
        assert_eq!(track.album_title(), Some("Geogaddi"));
        assert_eq!(track.extra.get("streamable"), Some(&json!("0")));
    }

    #[test]
    fn test_search_match_with_plain_artist() {
        let track: Track = serde_json::from_value(json!({
            "name": "Roygbiv",
            "artist": "Boards of Canada",
            "listeners": "412345"
        }))
        .unwrap();
        assert!(!track.is_now_playing());
        assert_eq!(track.artist_name(), "Boards of Canada");
        assert!(track.album.is_none());
    }

    #[test]
    fn test_scrobbled_track_has_date() {
        let track: Track = serde_json::from_value(json!({
            "name": "Olson",
            "artist": { "#text": "Boards of Canada" },
            "date": { "uts": "1700000000", "#text": "14 Nov 2023, 22:13" },
            "playcount": 12
        }))
        .unwrap();
        assert_eq!(track.date.as_ref().and_then(|d| d.unix()), Some(1_700_000_000));
        assert_eq!(track.playcount(), Some(12));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = recent_track();
        let track: Track = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&track).unwrap();
        assert_eq!(back.as_object().map(|o| o.len()), raw.as_object().map(|o| o.len()));
        assert_eq!(back["streamable"], raw["streamable"]);
    }
}
