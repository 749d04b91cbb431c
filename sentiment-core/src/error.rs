//! Capability error types
//!
//! Neither error ever reaches a caller of the ensemble. Slots log them and
//! degrade to a neutral result.

use thiserror::Error;

/// A classifier capability could not be built.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("invalid classifier endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("unsupported endpoint scheme \"{scheme}\" in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to compile lexicon matcher: {0}")]
    Lexicon(#[source] regex::Error),

    #[error("capability unavailable: {0}")]
    Other(String),
}

/// A loaded capability failed on one input.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request to classifier failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode classifier response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("classifier returned no predictions")]
    EmptyPrediction,

    #[error("inference failed: {0}")]
    Other(String),
}
