//! Catalog record normalization
//!
//! The catalog service is loosely typed: hits arrive either flat or
//! wrapped in a relevance envelope, tags arrive as plain strings or as
//! row objects, ids as numbers or strings, and most fields may be
//! missing outright. This module accepts all of those shapes and
//! produces the strict [`ResultRecord`] the rest of the client works
//! with. Normalization is total: a malformed field becomes a documented
//! default, never an error or panic.

use serde::{Deserialize, Serialize};

use crate::facets::{Difficulty, Genre};

/// One element of a search response array
///
/// Ranked endpoints wrap each record in a `{file, relevance_score}`
/// envelope; unranked endpoints serve the record bare. Variant order
/// matters: the envelope is tried first because a bare [`RawRecord`]
/// (all fields optional) would otherwise match anything.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSearchHit {
    Scored {
        file: RawRecord,
        #[serde(default)]
        relevance_score: Option<f64>,
    },
    Flat(RawRecord),
}

/// Record id as served: numeric from the backend, string from exports
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

/// Tag as served: plain string or `{id, name}` row object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTag {
    Name(String),
    Row {
        #[serde(default)]
        name: String,
    },
}

impl RawTag {
    fn into_name(self) -> String {
        match self {
            RawTag::Name(name) => name,
            RawTag::Row { name } => name,
        }
    }
}

/// Catalog record as served, every field tolerated missing
///
/// Numeric fields deserialize as `f64` because the analysis side of
/// the catalog emits floats where the backend emits integers. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub composer: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, alias = "tempo")]
    pub tempo_bpm: Option<f64>,
    #[serde(default, alias = "duration")]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub note_density: Option<f64>,
    #[serde(default)]
    pub download_count: Option<u64>,
    #[serde(default)]
    pub user_rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Normalized, presentation-ready catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Stable identifier, stringified; empty when the record had none
    pub id: String,
    pub title: String,
    pub composer: String,
    /// Defaults to [`Genre::Other`] when missing or unrecognized
    pub genre: Genre,
    /// Defaults to [`Difficulty::Intermediate`] when missing or unrecognized
    pub difficulty: Difficulty,
    /// Rounded to whole BPM; absent when missing or non-positive
    pub tempo_bpm: Option<u32>,
    /// Absent when missing or non-finite
    pub duration_secs: Option<f64>,
    pub quality_score: f64,
    pub note_density: Option<f64>,
    pub download_count: u64,
    pub user_rating: f64,
    /// Tag names with empty entries dropped
    pub tags: Vec<String>,
    /// Ranking score from the envelope, or the inline field when flat
    pub relevance_score: Option<f64>,
    pub source: Option<String>,
    pub download_url: Option<String>,
}

/// Normalize one raw hit into the display model
///
/// Total over all accepted wire shapes. An envelope score takes
/// precedence over an inline `relevance_score` field.
pub fn normalize(hit: RawSearchHit) -> ResultRecord {
    let (record, envelope_score) = match hit {
        RawSearchHit::Scored {
            file,
            relevance_score,
        } => (file, relevance_score),
        RawSearchHit::Flat(record) => (record, None),
    };

    let relevance_score = envelope_score.or(record.relevance_score);

    ResultRecord {
        id: match record.id {
            Some(RawId::Number(n)) => n.to_string(),
            Some(RawId::Text(s)) => s,
            None => String::new(),
        },
        title: record.title.unwrap_or_default(),
        composer: record.composer.unwrap_or_default(),
        genre: record
            .genre
            .as_deref()
            .and_then(Genre::from_str)
            .unwrap_or_default(),
        difficulty: record
            .difficulty
            .as_deref()
            .and_then(Difficulty::from_str)
            .unwrap_or_default(),
        tempo_bpm: record
            .tempo_bpm
            .filter(|bpm| bpm.is_finite() && *bpm > 0.0)
            .map(|bpm| bpm.round() as u32),
        duration_secs: record.duration_sec.filter(|secs| secs.is_finite()),
        quality_score: record.quality_score.unwrap_or(0.0),
        note_density: record.note_density,
        download_count: record.download_count.unwrap_or(0),
        user_rating: record.user_rating.unwrap_or(0.0),
        tags: record
            .tags
            .into_iter()
            .map(RawTag::into_name)
            .filter(|name| !name.is_empty())
            .collect(),
        relevance_score,
        source: record.source,
        download_url: record.download_url,
    }
}
