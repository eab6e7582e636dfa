//! EPG aggregation library
//!
//! This crate fetches television program schedules (EPG data) from a set of
//! heterogeneous remote providers and normalizes them into one canonical
//! per-channel, date-keyed guide shape. Each provider has its own query
//! syntax, transport pattern, and time representation; the registry matches
//! an incoming query string to the right provider handler, and the handler
//! reshapes the provider's records into [`models::ChannelGuide`] values.
//!
//! Providers that report only program start times go through the
//! [`schedule::gapfill`] engine, which infers end times from adjacent starts
//! and stitches schedules across midnight boundaries.

pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod registry;
pub mod schedule;
pub mod transport;
pub mod utils;

pub use config::Config;
pub use models::{AggregateResult, ChannelGuide, ProgramEntry};
pub use registry::ProviderRegistry;
