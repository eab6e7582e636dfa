//! Time-window planning

use chrono::{Days, NaiveDate};

/// Expand a requested day count into consecutive calendar dates starting at
/// `start` (the provider's "today"). A count of zero is treated as one; no
/// upper bound is enforced here.
pub fn plan_dates(start: NaiveDate, day_count: u32) -> Vec<NaiveDate> {
    let day_count = day_count.max(1);
    (0..day_count)
        .filter_map(|offset| start.checked_add_days(Days::new(u64::from(offset))))
        .collect()
}
