//! Provider handlers
//!
//! One module per remote schedule source. Every handler implements
//! [`ProviderHandler`]: a key, a cheap prefix predicate over the raw query
//! string, and an async `handle` that parses its own channel list, fetches
//! the provider's raw records, and normalizes them into the canonical
//! guide shape. Handlers are best-effort throughout — a failed fetch unit
//! contributes nothing and never aborts the dispatch call.

pub mod cntv;
pub mod fourgtv;
pub mod query;
pub mod traits;
pub mod tvmao;
pub mod twmod;

pub use traits::ProviderHandler;
