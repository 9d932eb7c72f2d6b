//! Injectable wall clock.
//!
//! Production dates, the UTC→local hour normalization and the live hourly
//! bucketing all read time through [`Clock`] so tests can pin both the
//! instant and the viewer's offset.

use parking_lot::Mutex;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> OffsetDateTime;

    /// Viewer's UTC offset in effect at `instant`.
    fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset;

    fn now_local(&self) -> OffsetDateTime {
        let now = self.now_utc();
        now.to_offset(self.offset_at(now))
    }

    fn local_hour(&self) -> u8 {
        self.now_local().hour()
    }

    fn local_date(&self) -> Date {
        self.now_local().date()
    }
}

/// OS clock. The local offset comes from the OS tz database when the
/// platform lets us read it safely, else from the configured fallback.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    fallback: UtcOffset,
}

impl SystemClock {
    pub fn new(fallback: UtcOffset) -> Self {
        Self { fallback }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        UtcOffset::local_offset_at(instant).unwrap_or(self.fallback)
    }
}

/// Clock frozen at a given instant with a fixed offset.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<OffsetDateTime>,
    offset: UtcOffset,
}

impl FixedClock {
    pub fn new(now: OffsetDateTime, offset: UtcOffset) -> Self {
        Self { now: Mutex::new(now.to_offset(UtcOffset::UTC)), offset }
    }

    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock() = now.to_offset(UtcOffset::UTC);
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        *self.now.lock()
    }

    fn offset_at(&self, _instant: OffsetDateTime) -> UtcOffset {
        self.offset
    }
}
