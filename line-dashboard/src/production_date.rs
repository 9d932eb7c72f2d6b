//! Production-date keys and hour normalization.

use crate::clock::Clock;
use time::{Date, Duration};

/// `yyMMdd` key for a local calendar date, e.g. 2024-03-05 → `240305`.
pub fn production_date(date: Date) -> String {
    format!(
        "{:02}{:02}{:02}",
        date.year().rem_euclid(100),
        u8::from(date.month()),
        date.day()
    )
}

/// Today's and yesterday's local calendar dates.
pub fn today_and_yesterday(clock: &dyn Clock) -> (Date, Date) {
    let today = clock.local_date();
    (today, today.previous_day().unwrap_or(today))
}

/// Local hour for a UTC hour of `reference`: UTC midnight of the reference
/// date, advanced by `utc_hour`, read back through the viewer's offset.
pub fn utc_hour_to_local(reference: Date, utc_hour: u8, clock: &dyn Clock) -> u8 {
    let instant = reference.midnight().assume_utc() + Duration::hours(i64::from(utc_hour));
    instant.to_offset(clock.offset_at(instant)).hour()
}
