//! Minimal-detail shaping.
//!
//! A record is decoded into the first [`Recognized`] shape whose marker
//! fields it carries, checked in this order:
//!
//! 1. track: `artist` and `name`, no `user`
//! 2. artist: `name` and (`listeners` or `playcount`), no `artist`
//! 3. user: `user`, or both `name` and `realname`
//! 4. album: `album`, or `name` with a plain-string `artist`
//!
//! A track whose artist was already flattened to a string also satisfies the
//! album rule; the track rule wins because it is checked first.

use serde_json::{Map, Value};

use super::{coerce_count, date_text, display_text, is_truthy, present, shape, DetailLevel};

/// Track fields kept at minimal detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackView {
    pub name: Option<Value>,
    pub artist: Option<Value>,
    pub album: Option<Value>,
    pub playcount: Option<Value>,
    pub date: Option<Value>,
    pub nowplaying: bool,
}

impl TrackView {
    fn decode(record: &Map<String, Value>) -> Option<Self> {
        if !(record.contains_key("artist") && record.contains_key("name"))
            || record.contains_key("user")
        {
            return None;
        }

        let marker = record
            .get("@attr")
            .and_then(|attr| attr.get("nowplaying"))
            .or_else(|| record.get("nowplaying"));

        Some(Self {
            name: present(record, "name").cloned(),
            artist: present(record, "artist").and_then(display_text),
            album: present(record, "album").and_then(display_text),
            playcount: present(record, "playcount").map(coerce_count),
            date: present(record, "date").and_then(date_text),
            nowplaying: marker.is_some_and(is_truthy),
        })
    }

    fn into_value(self) -> Value {
        let mut out = Map::new();
        put(&mut out, "name", self.name);
        put(&mut out, "artist", self.artist);
        put(&mut out, "album", self.album);
        put(&mut out, "playcount", self.playcount);
        put(&mut out, "date", self.date);
        if self.nowplaying {
            out.insert("nowplaying".to_string(), Value::Bool(true));
        }
        Value::Object(out)
    }
}

/// Artist fields kept at minimal detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistView {
    pub name: Option<Value>,
    pub playcount: Option<Value>,
    pub listeners: Option<Value>,
}

impl ArtistView {
    fn decode(record: &Map<String, Value>) -> Option<Self> {
        let has_counts = record.contains_key("listeners") || record.contains_key("playcount");
        if !record.contains_key("name") || !has_counts || record.contains_key("artist") {
            return None;
        }

        Some(Self {
            name: present(record, "name").cloned(),
            playcount: present(record, "playcount").map(coerce_count),
            listeners: present(record, "listeners").map(coerce_count),
        })
    }

    fn into_value(self) -> Value {
        let mut out = Map::new();
        put(&mut out, "name", self.name);
        put(&mut out, "playcount", self.playcount);
        put(&mut out, "listeners", self.listeners);
        Value::Object(out)
    }
}

/// User fields kept at minimal detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserView {
    pub username: Option<Value>,
    pub playcount: Option<Value>,
    pub realname: Option<Value>,
    pub country: Option<Value>,
    pub registered: Option<Value>,
}

impl UserView {
    fn decode(record: &Map<String, Value>) -> Option<Self> {
        let named_person = record.contains_key("name") && record.contains_key("realname");
        if !record.contains_key("user") && !named_person {
            return None;
        }

        let registered = present(record, "registered").and_then(|r| match r {
            Value::Object(inner) => present(inner, "#text").cloned(),
            other => Some(other.clone()),
        });

        Some(Self {
            username: present(record, "user")
                .or_else(|| present(record, "name"))
                .cloned(),
            playcount: present(record, "playcount").map(coerce_count),
            realname: present(record, "realname").cloned(),
            country: present(record, "country").cloned(),
            registered,
        })
    }

    fn into_value(self) -> Value {
        let mut out = Map::new();
        put(&mut out, "username", self.username);
        put(&mut out, "playcount", self.playcount);
        put(&mut out, "realname", self.realname);
        put(&mut out, "country", self.country);
        put(&mut out, "registered", self.registered);
        Value::Object(out)
    }
}

/// Album fields kept at minimal detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumView {
    pub name: Option<Value>,
    pub artist: Option<Value>,
    pub playcount: Option<Value>,
}

impl AlbumView {
    fn decode(record: &Map<String, Value>) -> Option<Self> {
        let string_artist = present(record, "name").is_some()
            && present(record, "artist").is_some_and(Value::is_string);
        if !record.contains_key("album") && !string_artist {
            return None;
        }

        Some(Self {
            name: present(record, "name").cloned(),
            artist: present(record, "artist").cloned(),
            playcount: present(record, "playcount").map(coerce_count),
        })
    }

    fn into_value(self) -> Value {
        let mut out = Map::new();
        put(&mut out, "name", self.name);
        put(&mut out, "artist", self.artist);
        put(&mut out, "playcount", self.playcount);
        Value::Object(out)
    }
}

/// A record classified by the fields it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognized {
    Track(TrackView),
    Artist(ArtistView),
    User(UserView),
    Album(AlbumView),
}

impl Recognized {
    /// Decode `record` into the first matching shape, if any.
    pub fn classify(record: &Map<String, Value>) -> Option<Self> {
        TrackView::decode(record)
            .map(Recognized::Track)
            .or_else(|| ArtistView::decode(record).map(Recognized::Artist))
            .or_else(|| UserView::decode(record).map(Recognized::User))
            .or_else(|| AlbumView::decode(record).map(Recognized::Album))
    }

    pub fn into_value(self) -> Value {
        match self {
            Recognized::Track(view) => view.into_value(),
            Recognized::Artist(view) => view.into_value(),
            Recognized::User(view) => view.into_value(),
            Recognized::Album(view) => view.into_value(),
        }
    }
}

pub(super) fn shape_record(record: &Map<String, Value>) -> Value {
    match Recognized::classify(record) {
        Some(recognized) => recognized.into_value(),
        None => Value::Object(
            record
                .iter()
                .map(|(key, value)| (key.clone(), shape(value, DetailLevel::Minimal)))
                .collect(),
        ),
    }
}

fn put(out: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        out.insert(key.to_string(), value);
    }
}
