//! Centralized error type for the memovision umbrella crate.
//!
//! Wraps core errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] memovision_core::Error),

    #[error("JSON in {source_name}: {error}")]
    Json {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
