//! Composable filter state for catalog searches
//!
//! Holds the facet selections and numeric constraints that persist
//! between search submissions. Facet selections are kept in insertion
//! order with no duplicates, so a descriptor built from the same state
//! twice serializes identically.

use serde::{Deserialize, Serialize};

use crate::facets::{Difficulty, Genre};

/// Minimum quality score applied to fresh filter state (0-10 scale)
pub const DEFAULT_MIN_QUALITY: f64 = 6.0;

/// Active facet selections and numeric constraints
///
/// Values are stored exactly as set, without clamping. Validation of
/// out-of-range values happens once, when a query descriptor is built
/// (see [`crate::query::build_descriptor`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected difficulties, in insertion order
    pub difficulties: Vec<Difficulty>,
    /// Selected genres, in insertion order
    pub genres: Vec<Genre>,
    /// Lower tempo bound in BPM
    pub tempo_min: Option<u32>,
    /// Upper tempo bound in BPM
    pub tempo_max: Option<u32>,
    /// Maximum duration in seconds
    pub duration_max_secs: Option<f64>,
    /// Minimum quality score (0-10 scale)
    pub min_quality: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            difficulties: Vec::new(),
            genres: Vec::new(),
            tempo_min: None,
            tempo_max: None,
            duration_max_secs: None,
            min_quality: DEFAULT_MIN_QUALITY,
        }
    }
}

impl FilterState {
    /// Create filter state with no selections and default quality floor
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a difficulty selection
    ///
    /// Adds the value if absent, removes it if present. Toggling the
    /// same value twice restores the original selection.
    pub fn toggle_difficulty(&mut self, difficulty: Difficulty) {
        toggle(&mut self.difficulties, difficulty);
    }

    /// Toggle a genre selection
    ///
    /// Adds the value if absent, removes it if present.
    pub fn toggle_genre(&mut self, genre: Genre) {
        toggle(&mut self.genres, genre);
    }

    /// Set or clear the lower tempo bound (BPM)
    pub fn set_tempo_min(&mut self, bpm: Option<u32>) {
        self.tempo_min = bpm;
    }

    /// Set or clear the upper tempo bound (BPM)
    pub fn set_tempo_max(&mut self, bpm: Option<u32>) {
        self.tempo_max = bpm;
    }

    /// Set or clear the maximum duration in seconds
    pub fn set_duration_max(&mut self, seconds: Option<f64>) {
        self.duration_max_secs = seconds;
    }

    /// Set the minimum quality score
    ///
    /// Stored as given; the descriptor builder clamps to the 0-10 scale.
    pub fn set_min_quality(&mut self, score: f64) {
        self.min_quality = score;
    }

    /// True when at least one difficulty or genre is selected
    ///
    /// Numeric constraints do not count: a search with only tempo or
    /// duration bounds and no text is still suppressed.
    pub fn has_facet_selection(&self) -> bool {
        !self.difficulties.is_empty() || !self.genres.is_empty()
    }

    /// Reset every field to its default
    ///
    /// Idempotent: clearing an already-clear state is a no-op.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Add `value` to the ordered set if absent, remove it if present
fn toggle<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if let Some(pos) = set.iter().position(|v| *v == value) {
        set.remove(pos);
    } else {
        set.push(value);
    }
}
