//! midicat-ui library interface
//!
//! Exposes the catalog client and search session for the terminal
//! front end and for integration testing.

pub mod client;
pub mod session;

pub use client::{CatalogClient, ClientError};
pub use session::{SearchSession, ViewState};
