//! Loopback stand-in for the Last.fm endpoint.
//!
//! Each connection serves one request. The request line is recorded and the
//! first route whose needles all occur in it supplies the response.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use lastfm_tools::Config;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct Route {
    needles: Vec<String>,
    status: u16,
    body: String,
}

impl Route {
    /// 200 with a JSON body.
    pub fn json(needles: &[&str], body: Value) -> Self {
        Self::status(needles, 200, body)
    }

    pub fn status(needles: &[&str], status: u16, body: Value) -> Self {
        Self::raw(needles, status, &body.to_string())
    }

    pub fn raw(needles: &[&str], status: u16, body: &str) -> Self {
        Self {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            status,
            body: body.to_string(),
        }
    }

    fn matches(&self, request_line: &str) -> bool {
        self.needles.iter().all(|n| request_line.contains(n.as_str()))
    }
}

pub struct Stub {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let log = log.clone();

                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut chunk = [0u8; 4096];
                    loop {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => head.extend_from_slice(&chunk[..n]),
                        }
                        if head.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let head = String::from_utf8_lossy(&head);
                    let request_line = head.lines().next().unwrap_or_default().to_string();
                    log.lock().unwrap().push(request_line.clone());

                    let (status, body) = routes
                        .iter()
                        .find(|r| r.matches(&request_line))
                        .map(|r| (r.status, r.body.clone()))
                        .unwrap_or_else(|| {
                            let body = json!({ "error": 6, "message": "no stub route" });
                            (404, body.to_string())
                        });

                    let response = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        reason(status),
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/", addr),
            requests,
        }
    }

    pub fn config(&self) -> Config {
        Config::new("test-key")
            .unwrap()
            .with_base_url(self.base_url.clone())
    }

    pub fn config_with_user(&self, username: &str) -> Config {
        self.config().with_default_username(Some(username.to_string()))
    }

    /// Request lines received so far, e.g. `GET /?method=...&format=json HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, method: &str) -> Vec<String> {
        let needle = format!("method={}&", method);
        self.requests()
            .into_iter()
            .filter(|line| line.contains(&needle))
            .collect()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

pub fn track(name: &str, artist: &str) -> Value {
    json!({
        "artist": { "mbid": "", "#text": artist },
        "streamable": "0",
        "image": [{ "size": "small", "#text": "http://img/s.png" }],
        "mbid": "",
        "album": { "mbid": "", "#text": "" },
        "name": name,
        "url": "https://www.last.fm/music/x",
        "date": { "uts": "1700000000", "#text": "14 Nov 2023, 22:13" }
    })
}

pub fn playing(name: &str, artist: &str) -> Value {
    json!({
        "artist": { "mbid": "", "#text": artist },
        "name": name,
        "image": [],
        "url": "https://www.last.fm/music/y",
        "@attr": { "nowplaying": "true" }
    })
}

pub fn recent_tracks(tracks: Vec<Value>) -> Value {
    json!({
        "recenttracks": {
            "track": tracks,
            "@attr": { "user": "rj", "page": "1", "perPage": "50", "totalPages": "1", "total": "2" }
        }
    })
}

pub fn top_artists(names: &[&str]) -> Value {
    let artists: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "name": name,
                "playcount": (100 - i).to_string(),
                "mbid": "",
                "url": format!("https://www.last.fm/music/{}", name),
                "streamable": "0",
                "image": [],
                "@attr": { "rank": (i + 1).to_string() }
            })
        })
        .collect();
    json!({ "topartists": { "artist": artists, "@attr": { "user": "rj", "page": "1" } } })
}

pub fn similar_artists(pairs: &[(&str, &str)]) -> Value {
    let artists: Vec<Value> = pairs
        .iter()
        .map(|(name, score)| json!({ "name": name, "match": score, "url": "u", "image": [] }))
        .collect();
    json!({ "similarartists": { "artist": artists, "@attr": { "artist": "seed" } } })
}

pub fn artist_info(name: &str) -> Value {
    json!({
        "artist": {
            "name": name,
            "mbid": "",
            "url": format!("https://www.last.fm/music/{}", name),
            "image": [],
            "streamable": "0",
            "ontour": "0",
            "stats": { "listeners": "1000", "playcount": "5000" },
            "similar": { "artist": [] },
            "tags": { "tag": [{ "name": "pop", "url": "u" }] },
            "bio": { "summary": "A singer.", "content": "A singer from somewhere." }
        }
    })
}

pub fn user_info(name: &str) -> Value {
    json!({
        "user": {
            "name": name,
            "realname": "Richard Jones",
            "url": format!("https://www.last.fm/user/{}", name),
            "image": [],
            "country": "United Kingdom",
            "playcount": "150316",
            "registered": { "unixtime": "1037793040", "#text": 1037793040 }
        }
    })
}
