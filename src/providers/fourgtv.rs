//! 4gtv schedule source
//!
//! Form-encoded POST per (channel, date) with no authentication. Records
//! carry `HH:MM` start and end strings that are taken verbatim, plus a
//! provider status code that is preserved on the entry. The provider serves
//! one day per request and the query carries no day-count argument, so
//! exactly one date (today) is planned.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Taipei;
use serde::Deserialize;
use tracing::warn;

use crate::errors::{SourceError, SourceResult};
use crate::models::{AggregateResult, ChannelGuide, DaySchedule, ProgramEntry};
use crate::providers::query::{has_prefix, split_channel_clauses};
use crate::providers::traits::ProviderHandler;
use crate::schedule::planner::plan_dates;
use crate::transport::Transport;
use crate::utils::clean_channel_name;

const PROVIDER_KEY: &str = "4gtv";
const EPG_URL: &str = "https://api2.4gtv.tv/Channel/GetEpgByChannel";

#[derive(Debug, Deserialize)]
struct FourGtvProgram {
    #[serde(rename = "fsSTART")]
    start: String,
    #[serde(rename = "fsEND")]
    end: String,
    #[serde(rename = "fsTITLE")]
    title: String,
    #[serde(default, rename = "fsDESC")]
    desc: String,
    #[serde(default, rename = "fsSTATUS")]
    status: Option<String>,
}

pub struct FourGtvHandler {
    transport: Arc<dyn Transport>,
}

impl FourGtvHandler {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn fetch_day(
        &self,
        channel_id: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<FourGtvProgram>> {
        let date_arg = date.format("%Y-%m-%d").to_string();
        let form = [("fsID", channel_id), ("fsDATE", date_arg.as_str())];
        let bytes = self.transport.post_form(EPG_URL, &form).await?;
        serde_json::from_slice(&bytes).map_err(|e| SourceError::parse(PROVIDER_KEY, e))
    }
}

fn day_entries(programs: &[FourGtvProgram]) -> DaySchedule {
    programs
        .iter()
        .map(|program| ProgramEntry {
            start: program.start.trim().to_string(),
            end: program.end.trim().to_string(),
            title: program.title.trim().to_string(),
            desc: program.desc.trim().to_string(),
            status: program.status.clone(),
        })
        .collect()
}

#[async_trait]
impl ProviderHandler for FourGtvHandler {
    fn key(&self) -> &'static str {
        PROVIDER_KEY
    }

    fn matches(&self, query: &str) -> bool {
        has_prefix(query, PROVIDER_KEY)
    }

    async fn handle(&self, query: &str) -> AggregateResult {
        let rest = query.get(PROVIDER_KEY.len()..).unwrap_or("");
        let rest = rest.strip_prefix(',').unwrap_or(rest);

        let today = Utc::now().with_timezone(&Taipei).date_naive();
        let dates = plan_dates(today, 1);

        let mut result = AggregateResult::new();
        for request in split_channel_clauses(rest) {
            let mut guide = ChannelGuide::empty(clean_channel_name(request.display_name()));
            for date in &dates {
                match self.fetch_day(&request.id, *date).await {
                    Ok(programs) => {
                        guide.process_count += programs.len() as u32;
                        if !programs.is_empty() {
                            guide
                                .diyp_data
                                .entry(*date)
                                .or_default()
                                .extend(day_entries(&programs));
                        }
                    }
                    Err(error) => {
                        warn!(channel = %request.id, date = %date, %error, "4gtv day fetch failed");
                    }
                }
            }
            result.insert(request.id.clone(), guide);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_verbatim_times_and_status() {
        let programs = vec![FourGtvProgram {
            start: "06:00".to_string(),
            end: "07:00".to_string(),
            title: " 早安新聞 ".to_string(),
            desc: String::new(),
            status: Some("live".to_string()),
        }];
        let entries = day_entries(&programs);
        assert_eq!(entries[0].start, "06:00");
        assert_eq!(entries[0].end, "07:00");
        assert_eq!(entries[0].title, "早安新聞");
        assert_eq!(entries[0].status.as_deref(), Some("live"));
    }

    #[test]
    fn missing_status_stays_absent() {
        let programs = vec![FourGtvProgram {
            start: "06:00".to_string(),
            end: "07:00".to_string(),
            title: "News".to_string(),
            desc: String::new(),
            status: None,
        }];
        assert_eq!(day_entries(&programs)[0].status, None);
    }
}
