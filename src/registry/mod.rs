//! Source registry and dispatch
//!
//! An ordered list of provider handlers. Dispatch scans in registration
//! order and invokes the first handler whose predicate claims the query;
//! a query no handler claims resolves to an empty result, not an error
//! (indistinguishable from "provider ran and found nothing" by design).
//!
//! Built-in providers register first. Hosts may append their own handlers
//! through [`ProviderRegistry::register`] before the first dispatch;
//! registering an existing key replaces that handler in place, so the last
//! registration for a key wins. Once built, the registry is read-only and
//! safe to share across concurrent dispatch calls.

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::models::AggregateResult;
use crate::providers::cntv::CntvHandler;
use crate::providers::fourgtv::FourGtvHandler;
use crate::providers::traits::ProviderHandler;
use crate::providers::tvmao::TvmaoHandler;
use crate::providers::twmod::TwmodHandler;
use crate::transport::Transport;

#[derive(Default)]
pub struct ProviderRegistry {
    handlers: Vec<Arc<dyn ProviderHandler>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in providers, in their canonical order
    pub fn with_builtins(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TvmaoHandler::new(transport.clone())));
        registry.register(Arc::new(CntvHandler::new(transport.clone())));
        registry.register(Arc::new(TwmodHandler::new(
            transport.clone(),
            config.providers.twmod.clone(),
        )));
        registry.register(Arc::new(FourGtvHandler::new(transport)));
        registry
    }

    /// Append a handler, or replace the existing handler with the same key
    pub fn register(&mut self, handler: Arc<dyn ProviderHandler>) {
        if let Some(existing) = self
            .handlers
            .iter_mut()
            .find(|registered| registered.key() == handler.key())
        {
            *existing = handler;
        } else {
            self.handlers.push(handler);
        }
    }

    /// Keys of every registered handler, in dispatch order
    pub fn handler_keys(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.key()).collect()
    }

    /// Route a query to the first matching provider and return its result.
    /// Queries no provider claims yield an empty map.
    pub async fn dispatch(&self, query: &str) -> AggregateResult {
        let query = query.trim();
        for handler in &self.handlers {
            if handler.matches(query) {
                debug!(provider = handler.key(), "dispatching query");
                return handler.handle(query).await;
            }
        }
        debug!(query, "no provider matched query");
        AggregateResult::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::ChannelGuide;
    use crate::providers::query::has_prefix;

    struct StubHandler {
        key: &'static str,
        marker: &'static str,
    }

    #[async_trait]
    impl ProviderHandler for StubHandler {
        fn key(&self) -> &'static str {
            self.key
        }

        fn matches(&self, query: &str) -> bool {
            has_prefix(query, self.key)
        }

        async fn handle(&self, _query: &str) -> AggregateResult {
            let mut result = AggregateResult::new();
            result.insert(self.key.to_string(), ChannelGuide::empty(self.marker));
            result
        }
    }

    #[tokio::test]
    async fn unmatched_queries_yield_an_empty_result() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubHandler { key: "tvmao", marker: "a" }));
        assert!(registry.dispatch("sohu,CCTV1:cctv1").await.is_empty());
    }

    #[tokio::test]
    async fn first_matching_handler_wins() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubHandler { key: "tv", marker: "broad" }));
        registry.register(Arc::new(StubHandler { key: "tvmao", marker: "narrow" }));

        // "tv" registered first and its prefix also matches, so it wins
        let result = registry.dispatch("tvmao,CCTV1:cctv1").await;
        assert_eq!(result["tv"].channel_name, "broad");
    }

    #[tokio::test]
    async fn reregistering_a_key_replaces_in_place() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubHandler { key: "tvmao", marker: "builtin" }));
        registry.register(Arc::new(StubHandler { key: "cntv", marker: "builtin" }));
        registry.register(Arc::new(StubHandler { key: "tvmao", marker: "external" }));

        assert_eq!(registry.handler_keys(), vec!["tvmao", "cntv"]);
        let result = registry.dispatch("tvmao,CCTV1:cctv1").await;
        assert_eq!(result["tvmao"].channel_name, "external");
    }

    #[tokio::test]
    async fn dispatch_trims_surrounding_whitespace() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubHandler { key: "tvmao", marker: "a" }));
        let result = registry.dispatch("  tvmao,CCTV1:cctv1  ").await;
        assert!(!result.is_empty());
    }
}
