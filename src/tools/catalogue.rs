//! Tool definitions advertised to clients.

use serde::Serialize;
use serde_json::{json, Value};

/// One callable tool: its name, a human description and a JSON schema for
/// its arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    fn new(name: &'static str, description: &'static str, input_schema: Value) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}

/// Every tool name, in catalogue order.
pub const TOOL_NAMES: &[&str] = &[
    "search_music",
    "get_user_stats",
    "get_recent_tracks",
    "get_now_playing",
    "get_track_info",
    "get_artist_info",
    "get_album_info",
    "get_top_artists",
    "get_top_tracks",
    "get_top_albums",
    "get_loved_tracks",
    "compare_users",
    "get_recommendations",
];

fn username_schema(default_username: Option<&str>) -> Value {
    let description = match default_username {
        Some(user) => format!("Last.fm username (defaults to {})", user),
        None => "Last.fm username".to_string(),
    };
    json!({ "type": "string", "description": description })
}

fn period_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["overall", "7day", "1month", "3month", "6month", "12month"],
        "default": "overall",
        "description": "Time period for the chart"
    })
}

fn detail_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["minimal", "standard", "full"],
        "default": "standard",
        "description": "minimal: names and counts only; standard: without images, ids and urls; full: everything"
    })
}

fn limit_schema(default: u32) -> Value {
    json!({ "type": "integer", "minimum": 1, "maximum": 1000, "default": default })
}

/// Build the tool catalogue. `default_username` only affects descriptions.
pub fn catalogue(default_username: Option<&str>) -> Vec<ToolDefinition> {
    let username = username_schema(default_username);

    vec![
        ToolDefinition::new(
            "search_music",
            "Search Last.fm for tracks, artists or albums",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search text" },
                    "type": {
                        "type": "string",
                        "enum": ["track", "artist", "album"],
                        "description": "What to search for"
                    },
                    "limit": limit_schema(30),
                    "detail_level": detail_schema()
                },
                "required": ["query", "type"]
            }),
        ),
        ToolDefinition::new(
            "get_user_stats",
            "Summary of a user's listening: profile, now playing, top artists, top tracks and recent plays",
            json!({
                "type": "object",
                "properties": {
                    "username": username,
                    "period": period_schema(),
                    "include_sections": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["profile", "nowplaying", "recent", "top_artists", "top_tracks"]
                        },
                        "default": ["profile", "nowplaying", "top_artists", "top_tracks"]
                    },
                    "top_items_count": limit_schema(10),
                    "detail_level": detail_schema()
                }
            }),
        ),
        ToolDefinition::new(
            "get_recent_tracks",
            "A user's recently scrobbled tracks, optionally within a time range",
            json!({
                "type": "object",
                "properties": {
                    "username": username,
                    "limit": limit_schema(50),
                    "time_range": {
                        "type": "string",
                        "enum": ["all", "today", "week", "month", "custom"],
                        "default": "all"
                    },
                    "custom_hours": {
                        "type": "number",
                        "description": "With time_range=custom: look back this many hours"
                    },
                    "from_date": {
                        "type": "string",
                        "description": "With time_range=custom: start (ISO 8601)"
                    },
                    "to_date": {
                        "type": "string",
                        "description": "With time_range=custom: end (ISO 8601)"
                    },
                    "detail_level": detail_schema()
                }
            }),
        ),
        ToolDefinition::new(
            "get_now_playing",
            "The track a user is listening to right now, if any",
            json!({
                "type": "object",
                "properties": { "username": username }
            }),
        ),
        ToolDefinition::new(
            "get_track_info",
            "Details for a track, including the user's play count when a username is known",
            json!({
                "type": "object",
                "properties": {
                    "artist": { "type": "string" },
                    "track": { "type": "string" },
                    "username": username,
                    "detail_level": detail_schema()
                },
                "required": ["artist", "track"]
            }),
        ),
        ToolDefinition::new(
            "get_artist_info",
            "Details for an artist: biography, tags, similar artists and statistics",
            json!({
                "type": "object",
                "properties": {
                    "artist": { "type": "string" },
                    "username": username,
                    "detail_level": detail_schema()
                },
                "required": ["artist"]
            }),
        ),
        ToolDefinition::new(
            "get_album_info",
            "Details for an album, including its track listing",
            json!({
                "type": "object",
                "properties": {
                    "artist": { "type": "string" },
                    "album": { "type": "string" },
                    "username": username,
                    "detail_level": detail_schema()
                },
                "required": ["artist", "album"]
            }),
        ),
        ToolDefinition::new(
            "get_top_artists",
            "A user's most played artists for a period",
            chart_schema(&username),
        ),
        ToolDefinition::new(
            "get_top_tracks",
            "A user's most played tracks for a period",
            chart_schema(&username),
        ),
        ToolDefinition::new(
            "get_top_albums",
            "A user's most played albums for a period",
            chart_schema(&username),
        ),
        ToolDefinition::new(
            "get_loved_tracks",
            "Tracks a user has marked as loved",
            json!({
                "type": "object",
                "properties": {
                    "username": username,
                    "limit": limit_schema(50),
                    "detail_level": detail_schema()
                }
            }),
        ),
        ToolDefinition::new(
            "compare_users",
            "Compare the musical taste of two users",
            json!({
                "type": "object",
                "properties": {
                    "user1": { "type": "string" },
                    "user2": username_schema(default_username),
                    "limit": limit_schema(10),
                    "detail_level": detail_schema()
                },
                "required": ["user1"]
            }),
        ),
        ToolDefinition::new(
            "get_recommendations",
            "Artists similar to a user's favourites that they don't listen to yet",
            json!({
                "type": "object",
                "properties": {
                    "username": username,
                    "period": period_schema(),
                    "seed_count": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 1000,
                        "default": 5,
                        "description": "How many top artists to start from"
                    },
                    "limit": limit_schema(10),
                    "detail_level": detail_schema()
                }
            }),
        ),
    ]
}

fn chart_schema(username: &Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "username": username,
            "period": period_schema(),
            "limit": limit_schema(50),
            "detail_level": detail_schema()
        }
    })
}
