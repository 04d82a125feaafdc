//! Calendar-day bucketing in a fixed reference zone

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use herald_storage::{DayBucket, WorkItem};

/// Calendar day of `instant` as seen in `zone`
#[must_use]
pub fn day_key(instant: DateTime<Utc>, zone: Tz) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}

/// Split `items` into per-day buckets, oldest day first
///
/// Items keep their input order inside a bucket.
#[must_use]
pub fn group_by_day(items: Vec<WorkItem>, zone: Tz) -> Vec<DayBucket> {
    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for item in items {
        let day = day_key(item.completed_at, zone);
        days.entry(day)
            .or_insert_with(|| DayBucket::new(day))
            .items
            .push(item);
    }

    days.into_values().collect()
}
