//! Test helper modules for midicat integration tests
//!
//! Provides reusable test infrastructure:
//! - CatalogFixture: in-process catalog service served over real HTTP

pub mod catalog_fixture;

pub use catalog_fixture::{CapturedRequest, CatalogFixture};
