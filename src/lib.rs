//! UA Stache - fetch secrets from stache entries.
//!
//! This library loads a stache read key from a local credentials file and
//! retrieves the entry's secret, optionally selecting a nested value with a
//! slash-delimited path.

pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod path;

pub use credentials::{load, StacheEntry};
pub use error::StacheError;
pub use fetcher::{auth, SecretFetcher};
