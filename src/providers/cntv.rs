//! cntv schedule source
//!
//! One JSON GET per (channel, date); the date rides in the query string as
//! `YYYYMMDD`. Records carry absolute epoch seconds for both start and end,
//! so no end-time inference runs here — timestamps convert straight to
//! wall-clock `HH:MM` in the provider's zone and each record files under
//! the date its start falls on.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Shanghai;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{SourceError, SourceResult};
use crate::models::{AggregateResult, ChannelGuide, DateKeyedSchedule, ProgramEntry};
use crate::providers::query::{day_count_pattern, has_prefix, parse_day_count, split_channel_clauses};
use crate::providers::traits::ProviderHandler;
use crate::schedule::planner::plan_dates;
use crate::transport::Transport;
use crate::utils::clean_channel_name;

const PROVIDER_KEY: &str = "cntv";
const EPG_URL: &str = "https://api.cntv.cn/epg/epginfo";

#[derive(Debug, Deserialize)]
struct CntvChannelDay {
    #[serde(default)]
    list: Vec<CntvProgram>,
}

#[derive(Debug, Deserialize)]
struct CntvProgram {
    title: String,
    #[serde(rename = "startTime")]
    start_time: i64,
    #[serde(rename = "endTime")]
    end_time: i64,
}

pub struct CntvHandler {
    transport: Arc<dyn Transport>,
    day_count: Regex,
}

impl CntvHandler {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            day_count: day_count_pattern(PROVIDER_KEY),
        }
    }

    async fn fetch_day(&self, channel_id: &str, date: NaiveDate) -> SourceResult<Vec<CntvProgram>> {
        let url = format!(
            "{EPG_URL}?serviceId=shiyi&d={}&c={}",
            date.format("%Y%m%d"),
            channel_id
        );
        let bytes = self.transport.get(&url, &[]).await?;
        // Payload is keyed by channel id: {"cctv1": {"list": [...]}}
        let mut payload: HashMap<String, CntvChannelDay> =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::parse(PROVIDER_KEY, e))?;
        payload
            .remove(channel_id)
            .map(|day| day.list)
            .ok_or_else(|| {
                SourceError::parse(
                    PROVIDER_KEY,
                    format!("channel {channel_id} missing from payload"),
                )
            })
    }
}

fn file_program(schedule: &mut DateKeyedSchedule, program: &CntvProgram) {
    let Some(start) = Shanghai.timestamp_opt(program.start_time, 0).single() else {
        return;
    };
    let Some(end) = Shanghai.timestamp_opt(program.end_time, 0).single() else {
        return;
    };
    schedule
        .entry(start.date_naive())
        .or_default()
        .push(ProgramEntry {
            start: start.format("%H:%M").to_string(),
            end: end.format("%H:%M").to_string(),
            title: program.title.trim().to_string(),
            desc: String::new(),
            status: None,
        });
}

#[async_trait]
impl ProviderHandler for CntvHandler {
    fn key(&self) -> &'static str {
        PROVIDER_KEY
    }

    fn matches(&self, query: &str) -> bool {
        has_prefix(query, PROVIDER_KEY)
    }

    async fn handle(&self, query: &str) -> AggregateResult {
        let Some((day_count, rest)) = parse_day_count(&self.day_count, query, PROVIDER_KEY) else {
            debug!(query, "cntv query does not match the expected shape");
            return AggregateResult::new();
        };

        let today = Utc::now().with_timezone(&Shanghai).date_naive();
        let dates = plan_dates(today, day_count);

        let mut result = AggregateResult::new();
        for request in split_channel_clauses(rest) {
            let mut guide = ChannelGuide::empty(clean_channel_name(request.display_name()));
            for date in &dates {
                match self.fetch_day(&request.id, *date).await {
                    Ok(programs) => {
                        guide.process_count += programs.len() as u32;
                        for program in &programs {
                            file_program(&mut guide.diyp_data, program);
                        }
                    }
                    Err(error) => {
                        warn!(channel = %request.id, date = %date, %error, "cntv day fetch failed");
                    }
                }
            }
            result.insert(request.id.clone(), guide);
        }
        result
    }
}
