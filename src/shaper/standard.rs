//! Standard-detail shaping: drop verbose keys everywhere, collapse timestamps.

use serde_json::{Map, Value};

use super::{present, shape, DetailLevel};

/// Keys removed from every record at standard detail.
pub const VERBOSE_KEYS: &[&str] = &[
    "mbid",
    "url",
    "image",
    "images",
    "streamable",
    "ontour",
    "wiki",
    "bio",
    "similar",
    "tags",
    "toptags",
    "stats",
    "links",
    "duration",
    "listeners",
    "id",
    "userplaycount",
    "userloved",
    "match",
    "guid",
    "bootstrap",
];

pub(super) fn shape_record(record: &Map<String, Value>) -> Value {
    let mut out = Map::new();

    for (key, value) in record {
        if VERBOSE_KEYS.contains(&key.as_str()) {
            continue;
        }

        match (key.as_str(), value) {
            ("date", Value::Object(date)) => {
                if let Some(text) = present(date, "#text").or_else(|| present(date, "uts")) {
                    out.insert(key.clone(), text.clone());
                }
            }
            ("registered", Value::Object(registered)) => {
                if let Some(text) = present(registered, "#text") {
                    out.insert(key.clone(), text.clone());
                }
            }
            ("@attr", Value::Object(attr)) => {
                // keep the now-playing marker, drop chart rank
                let kept: Map<String, Value> = attr
                    .iter()
                    .filter(|(k, _)| k.as_str() != "rank")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                out.insert(key.clone(), Value::Object(kept));
            }
            _ => {
                out.insert(key.clone(), shape(value, DetailLevel::Standard));
            }
        }
    }

    Value::Object(out)
}
