//! Error type definitions for the EPG aggregator

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Source handling specific errors
///
/// One value describes the failure of a single (channel, date) fetch unit.
/// Handlers log these and continue with the next unit.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Non-success HTTP status from a provider endpoint
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// Transport-level failures (connect, timeout, body read)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Provider payload did not have the expected structure
    #[error("Parse error: {provider} - {message}")]
    Parse { provider: String, message: String },

    /// A provider requiring credentials has none configured
    #[error("Missing credential for provider: {provider}")]
    MissingCredential { provider: String },
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        SourceError::Transport {
            message: message.into(),
        }
    }

    pub fn parse(provider: &str, message: impl std::fmt::Display) -> Self {
        SourceError::Parse {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }
}
