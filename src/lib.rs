//! # lastfm-tools
//!
//! A Last.fm API client, a response shaper that trims payloads to a chosen
//! detail level, and a tool layer that serves both over MCP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lastfm_tools::{shape, Config, DetailLevel, LastFmApi, Period};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("your_api_key")?;
//!     let api = LastFmApi::new(&config)?;
//!
//!     // Typed access
//!     let artists = api.get_top_artists("rj", Period::SevenDay, 10).await?;
//!     for artist in &artists {
//!         println!("{}", artist.name);
//!     }
//!
//!     // Trimmed JSON
//!     let minimal = shape(&serde_json::to_value(&artists)?, DetailLevel::Minimal);
//!     println!("{}", serde_json::to_string_pretty(&minimal)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`LastFmApi`] - one method per upstream API call
//! - [`shape`] - `minimal` / `standard` / `full` filtering of any JSON value
//! - [`LastFmTools`] - named tools with JSON arguments and text output
//! - [`server::McpServer`] - the tools over stdio JSON-RPC

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod shaper;
pub mod tools;

pub use api::{LastFmApi, RecentTracksQuery};
pub use config::Config;
pub use error::{LastFmError, Result};
pub use shaper::{shape, DetailLevel};
pub use tools::LastFmTools;

// Re-export models
pub use models::{Album, Artist, Period, Record, TasteComparison, Track, User};
