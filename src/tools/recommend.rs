//! Artist recommendations built from a user's top artists.
//!
//! The user's favourites seed `artist.getsimilar` lookups; suggestions the
//! user already listens to are discarded and the rest are ranked by their
//! summed similarity. Lookups that fail are skipped rather than failing the
//! whole batch.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use futures_util::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::LastFmTools;
use crate::error::Result;
use crate::models::{Artist, Period, Record};

const SIMILAR_PER_SEED: u32 = 20;

/// Top artists fetched to decide what the user already knows.
const MIN_KNOWN_ARTISTS: u32 = 50;

/// An artist suggested by one or more seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    /// Sum of the match scores from every seed that suggested it.
    pub score: f64,
    /// Seeds that suggested it, in lookup order.
    pub similar_to: Vec<String>,
}

/// Merge per-seed similar-artist lists into ranked candidates.
///
/// `known` holds lowercased names to exclude. Candidates are ordered by score,
/// highest first; equal scores keep the order they were first seen in.
pub fn rank_candidates(known: &HashSet<String>, similar: &[(String, Vec<Artist>)]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (seed, artists) in similar {
        for artist in artists {
            let key = artist.name.to_lowercase();
            if key.is_empty() || known.contains(&key) {
                continue;
            }

            let slot = *index.entry(key).or_insert_with(|| {
                candidates.push(Candidate {
                    name: artist.name.clone(),
                    score: 0.0,
                    similar_to: Vec::new(),
                });
                candidates.len() - 1
            });

            let candidate = &mut candidates[slot];
            candidate.score += artist.match_score();
            if !candidate.similar_to.contains(seed) {
                candidate.similar_to.push(seed.clone());
            }
        }
    }

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates
}

impl LastFmTools {
    pub(super) async fn recommend(
        &self,
        username: &str,
        period: Period,
        seed_count: u32,
        limit: u32,
    ) -> Result<Vec<Value>> {
        let top = self
            .api
            .get_top_artists(username, period, seed_count.max(MIN_KNOWN_ARTISTS))
            .await?;
        let known: HashSet<String> = top.iter().map(|a| a.name.to_lowercase()).collect();

        let lookups = top.iter().take(seed_count as usize).map(|seed| async move {
            let similar = self.api.get_similar_artists(&seed.name, SIMILAR_PER_SEED).await;
            (seed.name.clone(), similar)
        });

        let mut similar = Vec::new();
        for (seed, result) in join_all(lookups).await {
            match result {
                Ok(artists) => similar.push((seed, artists)),
                Err(e) => warn!("Skipping similar artists for {}: {}", seed, e),
            }
        }

        let ranked = rank_candidates(&known, &similar);
        debug!(
            "{} candidates from {} seeds for {}",
            ranked.len(),
            similar.len(),
            username
        );

        let details = ranked.into_iter().take(limit as usize).map(|candidate| async move {
            let info = self.api.get_artist_info(&candidate.name, None).await;
            (candidate, info)
        });

        let mut picks = Vec::new();
        for (candidate, info) in join_all(details).await {
            match info {
                Ok(artist) => picks.push(recommendation(artist, &candidate)),
                Err(e) => warn!("Dropping recommendation {}: {}", candidate.name, e),
            }
        }
        Ok(picks)
    }
}

/// The upstream artist record with its counts lifted out of `stats`, plus
/// `score` and `similar_to`.
fn recommendation(artist: Record<Artist>, candidate: &Candidate) -> Value {
    let mut record = artist.into_raw();
    if let Value::Object(map) = &mut record {
        if let Some(Value::Object(stats)) = map.get("stats").cloned() {
            for key in ["listeners", "playcount"] {
                if !map.get(key).map_or(true, Value::is_null) {
                    continue;
                }
                if let Some(count) = stats.get(key) {
                    map.insert(key.to_string(), count.clone());
                }
            }
        }

        let score = (candidate.score * 1000.0).round() / 1000.0;
        map.insert("score".to_string(), json!(score));
        map.insert("similar_to".to_string(), json!(candidate.similar_to));
    }
    record
}
