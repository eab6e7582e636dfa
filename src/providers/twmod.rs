//! twmod schedule source
//!
//! Authenticated JSON GET per (channel, date) with a bearer credential from
//! configuration. A failed date unit is swallowed and the loop moves on to
//! the next date. Channel ids given as bare 3-digit numerics normalize into
//! the provider's synthetic fixed-width form (`"005"` becomes
//! `"MOD_LIVE_0000000005"`); any other id passes through unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Taipei;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TwmodSettings;
use crate::errors::{SourceError, SourceResult};
use crate::models::{AggregateResult, ChannelGuide, DateKeyedSchedule, ProgramEntry};
use crate::providers::query::{day_count_pattern, has_prefix, parse_day_count, split_channel_clauses};
use crate::providers::traits::ProviderHandler;
use crate::schedule::planner::plan_dates;
use crate::transport::Transport;
use crate::utils::clean_channel_name;

const PROVIDER_KEY: &str = "twmod";
const EPG_URL: &str = "https://api.mod.cht.com.tw/epg/channel";
const ID_PREFIX: &str = "MOD_LIVE_";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct TwmodResponse {
    #[serde(default)]
    programs: Vec<TwmodProgram>,
}

#[derive(Debug, Deserialize)]
struct TwmodProgram {
    #[serde(rename = "programName")]
    name: String,
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(rename = "endTime")]
    end_time: String,
    #[serde(default)]
    description: String,
}

pub struct TwmodHandler {
    transport: Arc<dyn Transport>,
    settings: TwmodSettings,
    day_count: Regex,
    short_numeric: Regex,
}

impl TwmodHandler {
    pub fn new(transport: Arc<dyn Transport>, settings: TwmodSettings) -> Self {
        Self {
            transport,
            settings,
            day_count: day_count_pattern(PROVIDER_KEY),
            short_numeric: Regex::new(r"^\d{3}$").expect("short-numeric pattern is valid"),
        }
    }

    /// Expand a bare 3-digit id into the provider's synthetic identifier
    fn normalize_channel_id(&self, id: &str) -> String {
        if self.short_numeric.is_match(id) {
            if let Ok(code) = id.parse::<u64>() {
                return format!("{ID_PREFIX}{code:010}");
            }
        }
        id.to_string()
    }

    async fn fetch_day(
        &self,
        token: &str,
        channel_id: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<TwmodProgram>> {
        let url = format!("{EPG_URL}/{channel_id}?date={}", date.format("%Y-%m-%d"));
        let auth = format!("Bearer {token}");
        let bytes = self
            .transport
            .get(&url, &[("Authorization", auth.as_str())])
            .await?;
        let payload: TwmodResponse =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::parse(PROVIDER_KEY, e))?;
        Ok(payload.programs)
    }
}

fn file_program(schedule: &mut DateKeyedSchedule, program: &TwmodProgram) {
    let Ok(start) = NaiveDateTime::parse_from_str(program.start_time.trim(), TIME_FORMAT) else {
        return;
    };
    let Ok(end) = NaiveDateTime::parse_from_str(program.end_time.trim(), TIME_FORMAT) else {
        return;
    };
    schedule.entry(start.date()).or_default().push(ProgramEntry {
        start: start.format("%H:%M").to_string(),
        end: end.format("%H:%M").to_string(),
        title: program.name.trim().to_string(),
        desc: program.description.trim().to_string(),
        status: None,
    });
}

#[async_trait]
impl ProviderHandler for TwmodHandler {
    fn key(&self) -> &'static str {
        PROVIDER_KEY
    }

    fn matches(&self, query: &str) -> bool {
        has_prefix(query, PROVIDER_KEY)
    }

    async fn handle(&self, query: &str) -> AggregateResult {
        let Some((day_count, rest)) = parse_day_count(&self.day_count, query, PROVIDER_KEY) else {
            debug!(query, "twmod query does not match the expected shape");
            return AggregateResult::new();
        };

        let requests = split_channel_clauses(rest);
        let Some(token) = self.settings.token.clone() else {
            warn!("twmod bearer token is not configured, returning empty guides");
            let mut result = AggregateResult::new();
            for request in requests {
                let id = self.normalize_channel_id(&request.id);
                result.insert(id, ChannelGuide::empty(clean_channel_name(request.display_name())));
            }
            return result;
        };

        let today = Utc::now().with_timezone(&Taipei).date_naive();
        let dates = plan_dates(today, day_count);

        let mut result = AggregateResult::new();
        for request in requests {
            let channel_id = self.normalize_channel_id(&request.id);
            let mut guide = ChannelGuide::empty(clean_channel_name(request.display_name()));
            for date in &dates {
                match self.fetch_day(&token, &channel_id, *date).await {
                    Ok(programs) => {
                        guide.process_count += programs.len() as u32;
                        for program in &programs {
                            file_program(&mut guide.diyp_data, program);
                        }
                    }
                    Err(error) => {
                        // one bad date never stops the remaining dates
                        warn!(channel = %channel_id, date = %date, %error, "twmod day fetch failed");
                    }
                }
            }
            result.insert(channel_id, guide);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpTransport;

    fn handler() -> TwmodHandler {
        let http = crate::config::HttpConfig::default();
        TwmodHandler::new(Arc::new(HttpTransport::new(&http)), TwmodSettings::default())
    }

    #[test]
    fn three_digit_ids_expand_to_the_synthetic_form() {
        let handler = handler();
        assert_eq!(handler.normalize_channel_id("005"), "MOD_LIVE_0000000005");
        assert_eq!(handler.normalize_channel_id("050"), "MOD_LIVE_0000000050");
        assert_eq!(handler.normalize_channel_id("123"), "MOD_LIVE_0000000123");
    }

    #[test]
    fn other_id_forms_pass_through() {
        let handler = handler();
        assert_eq!(handler.normalize_channel_id("1234"), "1234");
        assert_eq!(handler.normalize_channel_id("12"), "12");
        assert_eq!(handler.normalize_channel_id("MOD_LIVE_0000000005"), "MOD_LIVE_0000000005");
        assert_eq!(handler.normalize_channel_id("news"), "news");
    }

    #[test]
    fn programs_file_under_their_start_date() {
        let mut schedule = DateKeyedSchedule::new();
        let program = TwmodProgram {
            name: " 公視新聞 ".to_string(),
            start_time: "2024-05-01 08:00:00".to_string(),
            end_time: "2024-05-01 09:30:00".to_string(),
            description: String::new(),
        };
        file_program(&mut schedule, &program);

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(schedule[&date][0].start, "08:00");
        assert_eq!(schedule[&date][0].end, "09:30");
        assert_eq!(schedule[&date][0].title, "公視新聞");
    }

    #[test]
    fn malformed_timestamps_drop_the_record() {
        let mut schedule = DateKeyedSchedule::new();
        let program = TwmodProgram {
            name: "News".to_string(),
            start_time: "08:00".to_string(),
            end_time: "09:30".to_string(),
            description: String::new(),
        };
        file_program(&mut schedule, &program);
        assert!(schedule.is_empty());
    }
}
