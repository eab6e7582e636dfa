//! Schedule construction helpers
//!
//! [`planner`] expands a day count into the calendar dates a provider must
//! be queried for; [`gapfill`] is the end-time inference engine used by
//! providers that report only program start times.

pub mod gapfill;
pub mod planner;
