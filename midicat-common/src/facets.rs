//! Facet vocabularies for catalog filtering
//!
//! A facet is a categorical search dimension with a small fixed value
//! set. The catalog service understands two: difficulty and genre.
//! Values travel on the wire as lowercase strings, both in outbound
//! query parameters and in served records.

use serde::{Deserialize, Serialize};

/// Playing difficulty of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Parse from a wire string (case insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// Canonical wire value (lowercase)
    ///
    /// Used verbatim in query parameters and matched against served
    /// record fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    /// Get all difficulty variants, in ascending order
    ///
    /// Useful for UI menus and validation
    pub fn all_variants() -> &'static [Difficulty] {
        &[
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
            Difficulty::Expert,
        ]
    }
}

impl Default for Difficulty {
    /// Catalog records without a usable difficulty display as Intermediate
    fn default() -> Self {
        Difficulty::Intermediate
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Musical genre of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Classical,
    Pop,
    Jazz,
    Game,
    Film,
    Other,
}

impl Genre {
    /// Parse from a wire string (case insensitive)
    ///
    /// Accepts the legacy value 'movie' as an alias for Film; older
    /// catalog exports still serve it.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classical" => Some(Genre::Classical),
            "pop" => Some(Genre::Pop),
            "jazz" => Some(Genre::Jazz),
            "game" => Some(Genre::Game),
            "film" | "movie" => Some(Genre::Film),
            "other" => Some(Genre::Other),
            _ => None,
        }
    }

    /// Canonical wire value (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Classical => "classical",
            Genre::Pop => "pop",
            Genre::Jazz => "jazz",
            Genre::Game => "game",
            Genre::Film => "film",
            Genre::Other => "other",
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::Classical => "Classical",
            Genre::Pop => "Pop",
            Genre::Jazz => "Jazz",
            Genre::Game => "Game",
            Genre::Film => "Film",
            Genre::Other => "Other",
        }
    }

    /// Get all genre variants, in menu order
    pub fn all_variants() -> &'static [Genre] {
        &[
            Genre::Classical,
            Genre::Pop,
            Genre::Jazz,
            Genre::Game,
            Genre::Film,
            Genre::Other,
        ]
    }
}

impl Default for Genre {
    /// Catalog records without a usable genre display as Other
    fn default() -> Self {
        Genre::Other
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
