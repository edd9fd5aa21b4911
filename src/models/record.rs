//! Typed view over an upstream record that serializes back verbatim.

use std::ops::Deref;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A decoded record together with the JSON it was decoded from.
///
/// Field access goes through the typed view (`Deref<Target = T>`), while
/// serializing writes the upstream object back untouched.
///
/// ```rust
/// use lastfm_tools::models::{Artist, Record};
/// use serde_json::json;
///
/// let upstream = json!({ "name": "Cher", "playcount": 12, "image": [] });
/// let artist: Record<Artist> = serde_json::from_value(upstream.clone()).unwrap();
/// assert_eq!(artist.playcount.as_deref(), Some("12"));
/// assert_eq!(serde_json::to_value(&artist).unwrap(), upstream);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    view: T,
    raw: Value,
}

impl<T> Record<T> {
    pub fn view(&self) -> &T {
        &self.view
    }

    /// The record as the API sent it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_view(self) -> T {
        self.view
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.view
    }
}

impl<T: DeserializeOwned> TryFrom<Value> for Record<T> {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let view = T::deserialize(&raw)?;
        Ok(Self { view, raw })
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Record<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::try_from(raw).map_err(D::Error::custom)
    }
}

impl<T> Serialize for Record<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}
