//! API client for the Last.fm web service.
//!
//! [`LastFmApi`] maps typed method calls onto query-string requests and
//! unwraps the JSON envelopes the service returns.

pub mod client;

pub use client::{LastFmApi, RecentTracksQuery};
