//! Common types and serde helpers shared across all models.
//!
//! Last.fm is loose with its JSON: counts arrive as strings or numbers,
//! single-element lists collapse into a bare object, and empty sub-records
//! are sometimes sent as `""`. The helpers here absorb that looseness.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Cover or portrait image in one of the upstream size buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Image {
    /// URL to the image (empty when the upstream has none).
    #[serde(rename = "#text", default)]
    pub url: String,

    /// Size bucket: "small", "medium", "large", "extralarge", "mega".
    #[serde(default)]
    pub size: String,
}

/// Timestamp attached to a scrobble.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScrobbleDate {
    /// Unix timestamp in seconds.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub uts: Option<String>,

    /// Human-readable form, e.g. "01 Jan 2024, 12:00".
    #[serde(
        rename = "#text",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
}

impl ScrobbleDate {
    /// Parsed unix timestamp, if any.
    pub fn unix(&self) -> Option<i64> {
        self.uts.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// Time window for chart-style queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "overall")]
    Overall,
    #[serde(rename = "7day")]
    SevenDay,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3month")]
    ThreeMonth,
    #[serde(rename = "6month")]
    SixMonth,
    #[serde(rename = "12month")]
    TwelveMonth,
}

impl Period {
    /// Wire value sent as the `period` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Overall => "overall",
            Period::SevenDay => "7day",
            Period::OneMonth => "1month",
            Period::ThreeMonth => "3month",
            Period::SixMonth => "6month",
            Period::TwelveMonth => "12month",
        }
    }

    pub fn all() -> &'static [Period] {
        &[
            Period::Overall,
            Period::SevenDay,
            Period::OneMonth,
            Period::ThreeMonth,
            Period::SixMonth,
            Period::TwelveMonth,
        ]
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an upstream flag such as `nowplaying` is switched on.
///
/// The API sends `"true"`; anything non-empty other than an explicit
/// `"false"` or `"0"` counts as set.
pub fn marker_is_set(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text != "false" && text != "0"
}

/// Accept a string, number, or boolean and keep it as text.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accept either a list or a lone element.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<U> {
        Many(Vec<U>),
        One(U),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// Accept a nested record, treating `null` and `""` as absent.
pub(crate) fn record_or_blank<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
