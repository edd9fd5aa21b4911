//! Album-related models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::artist::{ArtistRef, TagList};
use super::common::{lenient_string, one_or_many, record_or_blank, Image};

/// An album reference nested inside a track.
///
/// Scrobbles use `{"#text": ...}`, `track.getinfo` uses `{"title": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AlbumRef {
    Title(String),
    Link(AlbumLink),
}

impl AlbumRef {
    /// Display title, or `None` when the upstream left it blank.
    pub fn title(&self) -> Option<&str> {
        let title = match self {
            AlbumRef::Title(title) => Some(title.as_str()),
            AlbumRef::Link(link) => link
                .name
                .as_deref()
                .or(link.text.as_deref())
                .or(link.title.as_deref()),
        };
        title.filter(|t| !t.is_empty())
    }
}

/// Record form of [`AlbumRef`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumLink {
    #[serde(rename = "#text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Position annotation on an album track.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RankAttr {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub rank: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of an album's track listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumTrack {
    pub name: String,

    /// Length in seconds.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "@attr", default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<RankAttr>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AlbumTrack {
    pub fn rank(&self) -> Option<u32> {
        self.attr
            .as_ref()
            .and_then(|a| a.rank.as_deref())
            .and_then(|r| r.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumTracks {
    #[serde(default, deserialize_with = "one_or_many")]
    pub track: Vec<AlbumTrack>,
}

/// A full album record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Album {
    /// Album title.
    pub name: String,

    /// Album artist; a plain string on `album.getinfo`, a record on charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<ArtistRef>,

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

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub listeners: Option<String>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub image: Vec<Image>,

    #[serde(
        default,
        deserialize_with = "record_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub tracks: Option<AlbumTracks>,

    #[serde(
        default,
        deserialize_with = "record_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<TagList>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Album {
    pub fn artist_name(&self) -> Option<&str> {
        self.artist.as_ref().map(|a| a.name())
    }

    /// Track names in listing order (by rank when every track carries one).
    pub fn track_listing(&self) -> Vec<&str> {
        let Some(tracks) = self.tracks.as_ref() else {
            return Vec::new();
        };

        let mut listing: Vec<&AlbumTrack> = tracks.track.iter().collect();
        if listing.iter().all(|t| t.rank().is_some()) {
            listing.sort_by_key(|t| t.rank());
        }
        listing.into_iter().map(|t| t.name.as_str()).collect()
    }
}
