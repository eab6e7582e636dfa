//! End-time inference and cross-day stitching
//!
//! Some providers report only program start times. This engine derives each
//! program's end from the next program's start, and when a day's last
//! program runs to midnight it carries that program into the next day as a
//! `00:00` continuation entry, producing a continuous, non-overlapping
//! schedule across the day boundary.
//!
//! The work runs in two explicit passes over the date-keyed schedule:
//! pass 1 fills ends within each date independently, pass 2 walks dates
//! chronologically and applies the cross-day stitch rule, re-running the
//! fill on a date whenever a continuation entry was prepended to it.

use chrono::{Days, NaiveDateTime, NaiveTime, Timelike};

use crate::models::{DateKeyedSchedule, ProgramEntry};

/// Wall-clock midnight; an `end` of this value means "runs until midnight"
pub const MIDNIGHT: &str = "00:00";

/// Decide where a rolling-window batch of records opens.
///
/// The provider returns a fixed-size window of programs without marking
/// which day it starts on. If the first record starts before 02:00 of the
/// current day, the window still covers today from midnight and nothing is
/// stale; otherwise the window has rolled past midnight and opens tomorrow,
/// so records before tomorrow 00:00 are leftovers to discard. The 02:00
/// cutoff matches the provider's refresh cadence and is kept verbatim.
pub fn batch_window_start(first_start: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date();
    let starts_before_two =
        first_start.date() < today || (first_start.date() == today && first_start.hour() < 2);
    let opens_on = if starts_before_two {
        today
    } else {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    };
    opens_on.and_time(NaiveTime::MIN)
}

/// Set each entry's `end` to the next entry's `start`; the last entry of the
/// list runs until midnight. Idempotent, and a no-op on empty lists.
pub fn fill_end_times(entries: &mut [ProgramEntry]) {
    if entries.is_empty() {
        return;
    }
    for i in 0..entries.len() - 1 {
        let next_start = entries[i + 1].start.clone();
        entries[i].end = next_start;
    }
    if let Some(last) = entries.last_mut() {
        last.end = MIDNIGHT.to_string();
    }
}

/// Run end-time inference over the whole schedule and stitch day boundaries.
///
/// Whenever a date's last entry ends at midnight and the next calendar date
/// is filed with entries that do not already begin at `00:00`, a
/// continuation entry carrying the prior program's title is prepended to the
/// next date, and that date's ends are re-filled so the continuation entry
/// resolves against the entry that used to be first.
pub fn stitch_days(schedule: &mut DateKeyedSchedule) {
    for entries in schedule.values_mut() {
        fill_end_times(entries);
    }

    let dates: Vec<_> = schedule.keys().copied().collect();
    for date in dates {
        let carry_title = match schedule.get(&date).and_then(|entries| entries.last()) {
            Some(last) if last.end == MIDNIGHT => last.title.clone(),
            _ => continue,
        };
        let Some(next_date) = date.succ_opt() else {
            continue;
        };
        let Some(next_entries) = schedule.get_mut(&next_date) else {
            continue;
        };
        let needs_continuation = next_entries
            .first()
            .is_some_and(|first| first.start != MIDNIGHT);
        if needs_continuation {
            next_entries.insert(
                0,
                ProgramEntry {
                    start: MIDNIGHT.to_string(),
                    end: String::new(),
                    title: carry_title,
                    desc: String::new(),
                    status: None,
                },
            );
            fill_end_times(next_entries);
        }
    }
}
