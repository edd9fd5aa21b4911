//! Data models for Last.fm API responses.
//!
//! The typed structs are lenient views over the upstream JSON: counts are
//! read as text whether they arrive as strings or numbers. Records handed to
//! callers are wrapped in [`Record`], which keeps the upstream object so it
//! can be written back exactly as received.

pub mod album;
pub mod artist;
pub mod common;
pub mod record;
pub mod track;
pub mod user;

// Re-exports for convenience
pub use album::{Album, AlbumLink, AlbumRef, AlbumTrack, AlbumTracks};
pub use artist::{Artist, ArtistLink, ArtistRef, ArtistStats, Bio, SimilarArtists, Tag, TagList};
pub use common::{marker_is_set, Image, Period, ScrobbleDate};
pub use record::Record;
pub use track::{Track, TrackAttr};
pub use user::{Registered, TasteComparison, User};
