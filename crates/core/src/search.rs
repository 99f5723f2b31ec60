//! Query normalization and station suggestion ranking.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Station;

/// Maximum number of suggestions returned for a query.
pub const MAX_SUGGESTIONS: usize = 8;

// Ranking weights and cap are compatibility values, not semantically
// meaningful.
const SCORE_NAME_PREFIX: u32 = 3;
const SCORE_ALT_PREFIX: u32 = 2;
const SCORE_KEY_CONTAINS: u32 = 1;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]+").expect("invalid normalizer regex"));

/// Lowercase, collapse runs of non-alphanumeric characters to single spaces,
/// and trim. Idempotent.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    NON_ALNUM.replace_all(&lowered, " ").trim().to_string()
}

#[derive(Debug, Clone)]
struct IndexEntry {
    /// Position into the station list the index was built from.
    position: usize,
    search_key: String,
    name_lower: String,
    alt_lower: String,
}

/// Precomputed search keys for a station list, built once at load time.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    entries: Vec<IndexEntry>,
}

impl StationIndex {
    /// Build the index for `stations`. The search key per station is the
    /// normalized concatenation of name, alternate name, and subtitle.
    pub fn build(stations: &[Station]) -> Self {
        let entries = stations
            .iter()
            .enumerate()
            .map(|(position, station)| {
                let tokens = format!("{} {} {}", station.name, station.alt, station.subtitle);
                IndexEntry {
                    position,
                    search_key: normalize(&tokens),
                    name_lower: station.name.to_lowercase(),
                    alt_lower: station.alt.to_lowercase(),
                }
            })
            .collect();
        Self { entries }
    }

    /// Number of indexed stations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank `stations` against a free-text query and return at most
    /// [`MAX_SUGGESTIONS`] matches, best first. `stations` must be the slice
    /// the index was built from.
    ///
    /// Scoring: name prefix match beats alternate-name prefix match beats a
    /// normalized substring hit; zero-score stations are excluded. Ties are
    /// broken by case-insensitive name order. An empty or whitespace-only
    /// query yields no suggestions.
    pub fn suggestions<'a>(&self, stations: &'a [Station], query: &str) -> Vec<&'a Station> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();

        let mut scored: Vec<(&IndexEntry, u32)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let mut score = 0;
                if entry.name_lower.starts_with(&query_lower) {
                    score += SCORE_NAME_PREFIX;
                }
                if !entry.alt_lower.is_empty() && entry.alt_lower.starts_with(&query_lower) {
                    score += SCORE_ALT_PREFIX;
                }
                if entry.search_key.contains(&normalized) {
                    score += SCORE_KEY_CONTAINS;
                }
                (score > 0).then_some((entry, score))
            })
            .collect();

        scored.sort_by(|(a, score_a), (b, score_b)| {
            score_b
                .cmp(score_a)
                .then_with(|| a.name_lower.cmp(&b.name_lower))
        });

        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .filter_map(|(entry, _)| stations.get(entry.position))
            .collect()
    }
}
