//! Canonical guide data model
//!
//! Every provider, whatever its raw record shape, normalizes into these
//! types. The aggregate result is built fresh per dispatch call and handed
//! to the caller whole; nothing here is persisted or cached.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One program slot in a day's schedule
///
/// `start` and `end` are `"HH:MM"` wall-clock strings scoped to the date the
/// entry is filed under. An `end` of `"00:00"` means the program runs to
/// midnight (and possibly continues into the next day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramEntry {
    pub start: String,
    pub end: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    /// Provider-specific status code, preserved verbatim where a provider
    /// supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Programs of a single calendar date, ordered by `start` ascending
///
/// The order is semantically significant: end-time inference reads adjacency.
pub type DaySchedule = Vec<ProgramEntry>;

/// Calendar date to day schedule, iterated chronologically
///
/// Date keys serialize as `YYYY-MM-DD`.
pub type DateKeyedSchedule = BTreeMap<NaiveDate, DaySchedule>;

/// Normalized guide data for one requested channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelGuide {
    pub channel_name: String,
    pub diyp_data: DateKeyedSchedule,
    /// Count of raw provider records consumed while building this guide.
    /// Diagnostic only; records discarded during normalization still count.
    pub process_count: u32,
}

impl ChannelGuide {
    /// An empty guide for a channel whose fetch produced nothing
    pub fn empty(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            diyp_data: DateKeyedSchedule::new(),
            process_count: 0,
        }
    }
}

/// Channel identifier to guide, in query order
pub type AggregateResult = IndexMap<String, ChannelGuide>;
