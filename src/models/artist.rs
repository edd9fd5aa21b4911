//! Artist-related models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{lenient_string, one_or_many, record_or_blank, Image};

/// An artist reference nested inside a track or album.
///
/// Scrobbles carry `{"#text": ..., "mbid": ...}`, charts carry
/// `{"name": ..., "url": ...}` and search results carry a bare string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ArtistRef {
    Name(String),
    Link(ArtistLink),
}

impl Default for ArtistRef {
    fn default() -> Self {
        ArtistRef::Name(String::new())
    }
}

impl ArtistRef {
    /// Display name, whichever form the upstream used.
    pub fn name(&self) -> &str {
        match self {
            ArtistRef::Name(name) => name,
            ArtistRef::Link(link) => link
                .name
                .as_deref()
                .or(link.text.as_deref())
                .unwrap_or(""),
        }
    }

    pub fn mbid(&self) -> Option<&str> {
        match self {
            ArtistRef::Name(_) => None,
            ArtistRef::Link(link) => link.mbid.as_deref().filter(|m| !m.is_empty()),
        }
    }
}

impl From<&str> for ArtistRef {
    fn from(name: &str) -> Self {
        ArtistRef::Name(name.to_string())
    }
}

/// Record form of [`ArtistRef`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistLink {
    #[serde(rename = "#text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Biography block from `artist.getinfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Bio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A folksonomy tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagList {
    #[serde(default, deserialize_with = "one_or_many")]
    pub tag: Vec<Tag>,
}

/// Similar artists embedded in `artist.getinfo`; one level deep only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimilarArtists {
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<Artist>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistStats {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub listeners: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub playcount: Option<String>,

    /// Plays by the user passed as `username`, if any.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub userplaycount: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A full artist record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    /// Artist name.
    pub name: String,

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

    /// Similarity to the queried artist (0.0 - 1.0), only on similar-artist lists.
    #[serde(
        rename = "match",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub match_score: Option<String>,

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
    pub bio: Option<Bio>,

    #[serde(
        default,
        deserialize_with = "record_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<TagList>,

    #[serde(
        default,
        deserialize_with = "record_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub similar: Option<SimilarArtists>,

    #[serde(
        default,
        deserialize_with = "record_or_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub stats: Option<ArtistStats>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Artist {
    /// Create an artist with just a name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Similarity score as a float, defaulting to zero.
    pub fn match_score(&self) -> f64 {
        self.match_score
            .as_deref()
            .and_then(|m| m.trim().parse().ok())
            .unwrap_or(0.0)
    }

    /// Listener count from the top level or the stats block.
    pub fn listeners(&self) -> Option<u64> {
        self.listeners
            .as_deref()
            .or_else(|| self.stats.as_ref().and_then(|s| s.listeners.as_deref()))
            .and_then(|l| l.trim().parse().ok())
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .iter()
            .flat_map(|t| t.tag.iter())
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn similar_names(&self) -> Vec<&str> {
        self.similar
            .iter()
            .flat_map(|s| s.artist.iter())
            .map(|a| a.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artist_info_payload() {
        let artist: Artist = serde_json::from_value(json!({
            "name": "Cher",
            "mbid": "bfcc6d75-a6a5-4bc6-8282-47aec8531818",
            "url": "https://www.last.fm/music/Cher",
            "image": [{ "#text": "", "size": "small" }],
            "streamable": "0",
            "ontour": "0",
            "stats": { "listeners": "1400000", "playcount": "20000000" },
            "similar": { "artist": [{ "name": "Madonna", "url": "x" }] },
            "tags": { "tag": [{ "name": "pop", "url": "y" }, { "name": "dance", "url": "z" }] },
            "bio": { "summary": "Cher is...", "content": "Cher is... (long)", "published": "01 Jan 2009" }
        }))
        .unwrap();

        assert_eq!(artist.listeners(), Some(1_400_000));
        assert_eq!(artist.tag_names(), vec!["pop", "dance"]);
        assert_eq!(artist.similar_names(), vec!["Madonna"]);
        assert_eq!(artist.bio.unwrap().extra.get("published"), Some(&json!("01 Jan 2009")));
        assert_eq!(artist.extra.get("ontour"), Some(&json!("0")));
    }

    #[test]
    fn test_blank_tags_are_absent() {
        let artist: Artist =
            serde_json::from_value(json!({ "name": "Nobody", "tags": "" })).unwrap();
        assert!(artist.tags.is_none());
        assert!(artist.tag_names().is_empty());
    }

    #[test]
    fn test_match_score() {
        let artist: Artist =
            serde_json::from_value(json!({ "name": "Autechre", "match": "0.82" })).unwrap();
        assert!((artist.match_score() - 0.82).abs() < f64::EPSILON);
        assert_eq!(Artist::new("Plain").match_score(), 0.0);
    }

    #[test]
    fn test_artist_ref_forms() {
        let plain: ArtistRef = serde_json::from_value(json!("Cher")).unwrap();
        assert_eq!(plain.name(), "Cher");
        assert_eq!(plain.mbid(), None);

        let scrobble: ArtistRef =
            serde_json::from_value(json!({ "#text": "Cher", "mbid": "" })).unwrap();
        assert_eq!(scrobble.name(), "Cher");
        assert_eq!(scrobble.mbid(), None);

        let chart: ArtistRef =
            serde_json::from_value(json!({ "name": "Cher", "mbid": "abc" })).unwrap();
        assert_eq!(chart.name(), "Cher");
        assert_eq!(chart.mbid(), Some("abc"));
    }
}
