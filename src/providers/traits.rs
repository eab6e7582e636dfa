//! Provider handler trait definitions

use async_trait::async_trait;

use crate::models::AggregateResult;

/// A single schedule source with its own query syntax and transport
#[async_trait]
pub trait ProviderHandler: Send + Sync {
    /// Stable registry key (e.g. `"tvmao"`); also the query prefix
    fn key(&self) -> &'static str;

    /// Whether this handler claims the raw query string
    fn matches(&self, query: &str) -> bool;

    /// Parse the query, fetch, and normalize. Always returns one
    /// [`crate::models::ChannelGuide`] per requested channel, empty where
    /// every fetch unit failed; malformed queries yield an empty map.
    async fn handle(&self, query: &str) -> AggregateResult;
}
