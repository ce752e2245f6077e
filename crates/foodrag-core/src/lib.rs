//! foodrag-core
//!
//! Domain types, service traits, configuration, dataset loading and the
//! enrichment applied to every record before it is indexed.

pub mod config;
pub mod dataset;
pub mod enrich;
pub mod error;
pub mod fingerprint;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
