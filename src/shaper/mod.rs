//! Response shaping by detail level.
//!
//! Last.fm payloads are verbose: image lists, MusicBrainz ids, biographies
//! and URLs dominate most records. [`shape`] produces a filtered copy of any
//! JSON tree at one of three [`DetailLevel`]s:
//!
//! - `full` returns the input unchanged.
//! - `standard` strips a fixed set of verbose keys at every depth and
//!   collapses timestamp records to their display text.
//! - `minimal` recognises track, artist, user and album records (see
//!   [`Recognized`]) and keeps a handful of fields for each; anything else is
//!   walked key by key.
//!
//! Sequences keep their length and order at every level. The input is never
//! modified.

mod minimal;
mod standard;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LastFmError;
use crate::models::marker_is_set;

pub use minimal::{AlbumView, ArtistView, Recognized, TrackView, UserView};
pub use standard::VERBOSE_KEYS;

/// How much of a response to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Names and counts only.
    Minimal,
    /// Everything except verbose metadata.
    #[default]
    Standard,
    /// The upstream payload as received.
    Full,
}

impl DetailLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Minimal => "minimal",
            DetailLevel::Standard => "standard",
            DetailLevel::Full => "full",
        }
    }

    pub fn all() -> &'static [DetailLevel] {
        &[DetailLevel::Minimal, DetailLevel::Standard, DetailLevel::Full]
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailLevel {
    type Err = LastFmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(DetailLevel::Minimal),
            "standard" => Ok(DetailLevel::Standard),
            "full" => Ok(DetailLevel::Full),
            other => Err(LastFmError::Validation(format!(
                "Unknown detail level '{}' (expected minimal, standard or full)",
                other
            ))),
        }
    }
}

/// Filter `value` down to `level`.
pub fn shape(value: &Value, level: DetailLevel) -> Value {
    match (level, value) {
        (DetailLevel::Full, _) => value.clone(),
        (_, Value::Array(items)) => Value::Array(items.iter().map(|v| shape(v, level)).collect()),
        (DetailLevel::Minimal, Value::Object(record)) => minimal::shape_record(record),
        (DetailLevel::Standard, Value::Object(record)) => standard::shape_record(record),
        (_, scalar) => scalar.clone(),
    }
}

/// Value under `key` unless it is missing, `null` or an empty string.
pub(crate) fn present<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

/// Turn numeric text into an integer; leave everything else alone.
pub(crate) fn coerce_count(value: &Value) -> Value {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

/// Display text of a name-bearing field: the string itself, or a record's
/// `name`, `#text` or `title`.
pub(crate) fn display_text(value: &Value) -> Option<Value> {
    match value {
        Value::Object(record) => present(record, "name")
            .or_else(|| present(record, "#text"))
            .or_else(|| present(record, "title"))
            .cloned(),
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other.clone()),
    }
}

/// Display text of a timestamp record, falling back to the unix time.
pub(crate) fn date_text(value: &Value) -> Option<Value> {
    match value {
        Value::Object(record) => present(record, "#text")
            .or_else(|| present(record, "uts"))
            .cloned(),
        Value::Null => None,
        other => Some(other.clone()),
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => marker_is_set(s),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}
