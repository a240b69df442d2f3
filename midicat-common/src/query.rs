//! Query descriptor construction
//!
//! Converts free text plus a [`FilterState`] into the canonical
//! outbound request for the catalog service. Descriptors are built
//! fresh on every submission and never mutated afterwards, so two
//! submissions from identical state produce identical requests.

use serde::{Deserialize, Serialize};

use crate::facets::{Difficulty, Genre};
use crate::filter::{FilterState, DEFAULT_MIN_QUALITY};

/// Canonical representation of one outbound search request
///
/// Field order here matches parameter order on the wire (see
/// [`QueryDescriptor::query_pairs`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Trimmed free text, omitted entirely when blank
    pub text: Option<String>,
    /// Maximum number of results requested
    pub limit: u32,
    /// Pagination offset, serialized only when non-zero
    pub offset: u32,
    /// Selected difficulties, one `difficulty` parameter each
    pub difficulty: Vec<Difficulty>,
    /// Selected genres, one `genre` parameter each
    pub genre: Vec<Genre>,
    /// Lower tempo bound in BPM
    pub tempo_min: Option<u32>,
    /// Upper tempo bound in BPM
    pub tempo_max: Option<u32>,
    /// Maximum duration in seconds
    pub duration_max: Option<f64>,
    /// Minimum quality score, clamped to the 0-10 scale
    pub min_quality: f64,
}

/// Build the canonical descriptor for one search submission
///
/// Pure and deterministic. Normalization rules:
/// - `text` is trimmed; whitespace-only text is dropped
/// - facet values are copied in stored (insertion) order
/// - tempo bounds are kept only when positive
/// - duration bound is kept only when finite and positive
/// - `min_quality` is always present, clamped to [0.0, 10.0];
///   NaN falls back to the default floor
///
/// An inverted tempo range (min > max) is passed through as given;
/// the catalog returns an empty result set for it.
pub fn build_descriptor(free_text: &str, filters: &FilterState, limit: u32) -> QueryDescriptor {
    let trimmed = free_text.trim();

    QueryDescriptor {
        text: if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        },
        limit,
        offset: 0,
        difficulty: filters.difficulties.clone(),
        genre: filters.genres.clone(),
        tempo_min: filters.tempo_min.filter(|bpm| *bpm > 0),
        tempo_max: filters.tempo_max.filter(|bpm| *bpm > 0),
        duration_max: filters
            .duration_max_secs
            .filter(|secs| secs.is_finite() && *secs > 0.0),
        min_quality: clamp_quality(filters.min_quality),
    }
}

/// Clamp a quality score to the 0-10 scale, mapping NaN to the default
fn clamp_quality(score: f64) -> f64 {
    if score.is_nan() {
        DEFAULT_MIN_QUALITY
    } else {
        score.clamp(0.0, 10.0)
    }
}

impl QueryDescriptor {
    /// Same descriptor addressing a later page of the same result set
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Ordered key/value pairs for the HTTP layer
    ///
    /// `limit` always leads. Repeated `difficulty`/`genre` keys carry
    /// one facet value each. `min_quality` is always present.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];

        if self.offset > 0 {
            pairs.push(("offset", self.offset.to_string()));
        }
        if let Some(text) = &self.text {
            pairs.push(("query", text.clone()));
        }
        for difficulty in &self.difficulty {
            pairs.push(("difficulty", difficulty.as_str().to_string()));
        }
        for genre in &self.genre {
            pairs.push(("genre", genre.as_str().to_string()));
        }
        if let Some(bpm) = self.tempo_min {
            pairs.push(("tempo_min", bpm.to_string()));
        }
        if let Some(bpm) = self.tempo_max {
            pairs.push(("tempo_max", bpm.to_string()));
        }
        if let Some(secs) = self.duration_max {
            pairs.push(("duration_max", secs.to_string()));
        }
        pairs.push(("min_quality", self.min_quality.to_string()));

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_values<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Vec<&'a str> {
        pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_text_trimmed_and_blank_dropped() {
        let filters = FilterState::new();

        let descriptor = build_descriptor("  moonlight sonata  ", &filters, 50);
        assert_eq!(descriptor.text.as_deref(), Some("moonlight sonata"));

        let descriptor = build_descriptor("   ", &filters, 50);
        assert_eq!(descriptor.text, None);

        let descriptor = build_descriptor("", &filters, 50);
        assert_eq!(descriptor.text, None);
    }

    #[test]
    fn test_facets_serialized_in_insertion_order() {
        let mut filters = FilterState::new();
        filters.toggle_genre(Genre::Jazz);
        filters.toggle_genre(Genre::Classical);
        filters.toggle_difficulty(Difficulty::Expert);
        filters.toggle_difficulty(Difficulty::Beginner);

        let descriptor = build_descriptor("", &filters, 50);
        let pairs = descriptor.query_pairs();

        assert_eq!(pair_values(&pairs, "genre"), vec!["jazz", "classical"]);
        assert_eq!(
            pair_values(&pairs, "difficulty"),
            vec!["expert", "beginner"]
        );
    }

    #[test]
    fn test_identical_state_builds_identical_descriptor() {
        let mut filters = FilterState::new();
        filters.toggle_genre(Genre::Game);
        filters.set_tempo_min(Some(100));

        let first = build_descriptor("zelda", &filters, 50);
        let second = build_descriptor("zelda", &filters, 50);
        assert_eq!(first, second);
        assert_eq!(first.query_pairs(), second.query_pairs());
    }

    #[test]
    fn test_zero_tempo_bounds_dropped() {
        let mut filters = FilterState::new();
        filters.set_tempo_min(Some(0));
        filters.set_tempo_max(Some(0));

        let descriptor = build_descriptor("x", &filters, 50);
        assert_eq!(descriptor.tempo_min, None);
        assert_eq!(descriptor.tempo_max, None);

        let pairs = descriptor.query_pairs();
        assert!(pair_values(&pairs, "tempo_min").is_empty());
        assert!(pair_values(&pairs, "tempo_max").is_empty());
    }

    #[test]
    fn test_duration_must_be_finite_and_positive() {
        let mut filters = FilterState::new();

        filters.set_duration_max(Some(0.0));
        assert_eq!(build_descriptor("x", &filters, 50).duration_max, None);

        filters.set_duration_max(Some(-12.0));
        assert_eq!(build_descriptor("x", &filters, 50).duration_max, None);

        filters.set_duration_max(Some(f64::INFINITY));
        assert_eq!(build_descriptor("x", &filters, 50).duration_max, None);

        filters.set_duration_max(Some(f64::NAN));
        assert_eq!(build_descriptor("x", &filters, 50).duration_max, None);

        filters.set_duration_max(Some(300.0));
        assert_eq!(
            build_descriptor("x", &filters, 50).duration_max,
            Some(300.0)
        );
    }

    #[test]
    fn test_min_quality_clamped() {
        let mut filters = FilterState::new();

        filters.set_min_quality(15.0);
        assert_eq!(build_descriptor("x", &filters, 50).min_quality, 10.0);

        filters.set_min_quality(-2.0);
        assert_eq!(build_descriptor("x", &filters, 50).min_quality, 0.0);

        filters.set_min_quality(f64::NAN);
        assert_eq!(
            build_descriptor("x", &filters, 50).min_quality,
            DEFAULT_MIN_QUALITY
        );

        filters.set_min_quality(7.5);
        assert_eq!(build_descriptor("x", &filters, 50).min_quality, 7.5);
    }

    #[test]
    fn test_min_quality_always_serialized() {
        let filters = FilterState::new();
        let pairs = build_descriptor("", &filters, 50).query_pairs();
        assert_eq!(pair_values(&pairs, "min_quality"), vec!["6"]);
    }

    #[test]
    fn test_inverted_tempo_range_passed_through() {
        let mut filters = FilterState::new();
        filters.set_tempo_min(Some(180));
        filters.set_tempo_max(Some(90));

        let descriptor = build_descriptor("x", &filters, 50);
        assert_eq!(descriptor.tempo_min, Some(180));
        assert_eq!(descriptor.tempo_max, Some(90));
    }

    #[test]
    fn test_offset_serialized_only_when_nonzero() {
        let filters = FilterState::new();
        let descriptor = build_descriptor("sonata", &filters, 50);

        let pairs = descriptor.query_pairs();
        assert!(pair_values(&pairs, "offset").is_empty());

        let paged = descriptor.with_offset(50);
        let pairs = paged.query_pairs();
        assert_eq!(pair_values(&pairs, "offset"), vec!["50"]);
    }

    #[test]
    fn test_limit_leads_parameter_order() {
        let mut filters = FilterState::new();
        filters.toggle_difficulty(Difficulty::Advanced);

        let pairs = build_descriptor("chopin", &filters, 25).query_pairs();
        assert_eq!(pairs[0], ("limit", "25".to_string()));
    }

    #[test]
    fn test_query_pairs_round_trip_through_parser() {
        // Serialize to pairs, parse back field by field, compare
        let mut filters = FilterState::new();
        filters.toggle_difficulty(Difficulty::Expert);
        filters.toggle_genre(Genre::Film);
        filters.toggle_genre(Genre::Jazz);
        filters.set_tempo_min(Some(80));
        filters.set_tempo_max(Some(160));
        filters.set_duration_max(Some(240.5));
        filters.set_min_quality(8.0);

        let descriptor = build_descriptor("  bach fugue ", &filters, 50).with_offset(100);
        let pairs = descriptor.query_pairs();

        let mut parsed = QueryDescriptor {
            text: None,
            limit: 0,
            offset: 0,
            difficulty: Vec::new(),
            genre: Vec::new(),
            tempo_min: None,
            tempo_max: None,
            duration_max: None,
            min_quality: DEFAULT_MIN_QUALITY,
        };
        for (key, value) in &pairs {
            match *key {
                "query" => parsed.text = Some(value.clone()),
                "limit" => parsed.limit = value.parse().unwrap(),
                "offset" => parsed.offset = value.parse().unwrap(),
                "difficulty" => parsed.difficulty.push(Difficulty::from_str(value).unwrap()),
                "genre" => parsed.genre.push(Genre::from_str(value).unwrap()),
                "tempo_min" => parsed.tempo_min = Some(value.parse().unwrap()),
                "tempo_max" => parsed.tempo_max = Some(value.parse().unwrap()),
                "duration_max" => parsed.duration_max = Some(value.parse().unwrap()),
                "min_quality" => parsed.min_quality = value.parse().unwrap(),
                other => panic!("Unexpected query key: {}", other),
            }
        }

        assert_eq!(parsed, descriptor);
    }
}
