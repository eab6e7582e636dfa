//! tvmao schedule source
//!
//! One JSON GET per channel against a fixed resource id. The payload is
//! GBK-encoded and carries a fixed-size rolling window of programs with
//! start times only (`times` is a `"YYYY/MM/DD HH:MM"` local timestamp), so
//! this is the one provider that runs the end-time inference engine: the
//! window-start heuristic drops stale leftovers from the front of the
//! window, and [`stitch_days`] derives every end time and carries midnight
//! runovers into the following date.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Asia::Shanghai;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{SourceError, SourceResult};
use crate::models::{AggregateResult, ChannelGuide, DateKeyedSchedule, ProgramEntry};
use crate::providers::query::{has_prefix, split_channel_clauses};
use crate::providers::traits::ProviderHandler;
use crate::schedule::gapfill::{batch_window_start, stitch_days};
use crate::transport::Transport;
use crate::transport::encoding::decode_text;
use crate::utils::clean_channel_name;

const PROVIDER_KEY: &str = "tvmao";
const GUIDE_URL: &str = "https://lighttv.tvmao.com/qa/qadatajson";
const PAYLOAD_CHARSET: &str = "gbk";
const TIMES_FORMAT: &str = "%Y/%m/%d %H:%M";

#[derive(Debug, Deserialize)]
struct TvmaoProgram {
    times: String,
    title: String,
    #[serde(default)]
    desc: String,
}

pub struct TvmaoHandler {
    transport: Arc<dyn Transport>,
}

impl TvmaoHandler {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn fetch_programs(&self, channel_id: &str) -> SourceResult<Vec<TvmaoProgram>> {
        let url = format!("{GUIDE_URL}?id={channel_id}");
        let bytes = self.transport.get(&url, &[]).await?;
        let text = decode_text(&bytes, PAYLOAD_CHARSET);
        serde_json::from_str(&text).map_err(|e| SourceError::parse(PROVIDER_KEY, e))
    }
}

fn parse_times(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMES_FORMAT).ok()
}

/// File the window's records by start date and run end-time inference.
///
/// The window start is classified from the first parseable record (see
/// [`batch_window_start`]); records before it are stale leftovers from the
/// provider's rolling window and are discarded.
fn build_schedule(records: &[TvmaoProgram], now: NaiveDateTime) -> DateKeyedSchedule {
    let mut schedule = DateKeyedSchedule::new();
    let Some(window_start) = records
        .iter()
        .find_map(|record| parse_times(&record.times))
        .map(|first| batch_window_start(first, now))
    else {
        return schedule;
    };

    for record in records {
        let Some(start) = parse_times(&record.times) else {
            debug!(times = %record.times, "skipping record with unparseable timestamp");
            continue;
        };
        if start < window_start {
            continue;
        }
        schedule.entry(start.date()).or_default().push(ProgramEntry {
            start: start.format("%H:%M").to_string(),
            end: String::new(),
            title: record.title.trim().to_string(),
            desc: record.desc.trim().to_string(),
            status: None,
        });
    }

    stitch_days(&mut schedule);
    schedule
}

#[async_trait]
impl ProviderHandler for TvmaoHandler {
    fn key(&self) -> &'static str {
        PROVIDER_KEY
    }

    fn matches(&self, query: &str) -> bool {
        has_prefix(query, PROVIDER_KEY)
    }

    async fn handle(&self, query: &str) -> AggregateResult {
        let rest = query.get(PROVIDER_KEY.len()..).unwrap_or("");
        let rest = rest.strip_prefix(',').unwrap_or(rest);

        let mut result = AggregateResult::new();
        for request in split_channel_clauses(rest) {
            let mut guide = ChannelGuide::empty(clean_channel_name(request.display_name()));
            match self.fetch_programs(&request.id).await {
                Ok(records) => {
                    guide.process_count = records.len() as u32;
                    let now = Utc::now().with_timezone(&Shanghai).naive_local();
                    guide.diyp_data = build_schedule(&records, now);
                    debug!(
                        channel = %request.id,
                        records = records.len(),
                        days = guide.diyp_data.len(),
                        "tvmao channel processed"
                    );
                }
                Err(error) => {
                    warn!(channel = %request.id, %error, "tvmao fetch failed");
                }
            }
            result.insert(request.id.clone(), guide);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(times: &str, title: &str) -> TvmaoProgram {
        TvmaoProgram {
            times: times.to_string(),
            title: title.to_string(),
            desc: String::new(),
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn rolled_window_drops_records_before_tomorrow() {
        // First record starts after 02:00, so the window opens tomorrow and
        // the 23:30 leftover is stale.
        let records = vec![
            record("2024/05/01 23:30", "A"),
            record("2024/05/02 00:10", "B"),
        ];
        let schedule = build_schedule(&records, noon(2024, 5, 1));

        assert_eq!(schedule.len(), 1);
        let day = &schedule[&NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()];
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].start, "00:10");
        assert_eq!(day[0].end, "00:00");
        assert_eq!(day[0].title, "B");
    }

    #[test]
    fn early_window_keeps_every_record() {
        let records = vec![
            record("2024/05/01 01:00", "Overnight"),
            record("2024/05/01 08:00", "Morning News"),
        ];
        let now = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let schedule = build_schedule(&records, now);

        let day = &schedule[&NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()];
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].end, "08:00");
        assert_eq!(day[1].end, "00:00");
    }

    #[test]
    fn midnight_runover_carries_into_the_next_day() {
        let records = vec![
            record("2024/05/02 23:30", "Evening Film"),
            record("2024/05/03 00:10", "Late Review"),
        ];
        let schedule = build_schedule(&records, noon(2024, 5, 1));

        let second = &schedule[&NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()];
        assert_eq!(second[0].start, "00:00");
        assert_eq!(second[0].title, "Evening Film");
        assert_eq!(second[0].end, "00:10");
    }

    #[test]
    fn unparseable_records_are_skipped() {
        let records = vec![
            record("2024/05/02 08:00", "Morning News"),
            record("not a timestamp", "Garbage"),
        ];
        let schedule = build_schedule(&records, noon(2024, 5, 1));
        let day = &schedule[&NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()];
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].title, "Morning News");
    }

    #[test]
    fn empty_batch_builds_an_empty_schedule() {
        assert!(build_schedule(&[], noon(2024, 5, 1)).is_empty());
    }
}
