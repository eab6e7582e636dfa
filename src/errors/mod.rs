//! Centralized error handling for the EPG aggregator
//!
//! Per-unit fetch and parse failures are never fatal to a dispatch call:
//! handlers log them and keep going, so the error types here exist to carry
//! *why* a unit failed between the transport/parse layers and the handler
//! that swallows the failure.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
