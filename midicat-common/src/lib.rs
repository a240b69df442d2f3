//! # midicat Common Library
//!
//! Shared code for the midicat client crates including:
//! - Facet and filter state types
//! - Query descriptor construction
//! - Catalog record normalization
//! - Event types (SearchEvent enum) and the broadcast EventBus
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod facets;
pub mod filter;
pub mod query;
pub mod records;

pub use error::{Error, Result};
pub use facets::{Difficulty, Genre};
pub use filter::FilterState;
pub use query::QueryDescriptor;
pub use records::ResultRecord;
