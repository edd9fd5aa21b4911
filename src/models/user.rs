//! User profile and taste-comparison models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::artist::Artist;
use super::common::{lenient_string, one_or_many, Image};
use super::record::Record;

/// Registration timestamp on a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Registered {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub unixtime: Option<String>,

    #[serde(
        rename = "#text",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
}

/// A Last.fm user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Username.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<String>,

    /// Total scrobbles.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub playcount: Option<String>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub image: Vec<Image>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered: Option<Registered>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn playcount(&self) -> Option<u64> {
        self.playcount.as_deref().and_then(|p| p.trim().parse().ok())
    }

    pub fn registered_unix(&self) -> Option<i64> {
        self.registered
            .as_ref()
            .and_then(|r| r.unixtime.as_deref())
            .and_then(|t| t.trim().parse().ok())
    }
}

/// Result of comparing two users' listening.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TasteComparison {
    /// Similarity between 0 and 1, as the numeric string the API returns.
    /// `None` when the response carried no score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,

    /// Artists both users listen to.
    #[serde(default)]
    pub artists: Vec<Record<Artist>>,
}

impl TasteComparison {
    /// Parsed score; `None` when absent or not a number.
    pub fn score(&self) -> Option<f64> {
        self.score.as_deref().and_then(|s| s.trim().parse().ok())
    }
}
