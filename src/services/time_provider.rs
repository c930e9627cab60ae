//! Time Provider Trait and Implementations
//!
//! Provides time abstraction for deterministic testing and production use.
//! "Today", "this week" and "this month" are always evaluated in the
//! school's timezone.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// Trait for providing time functionality
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now_utc(&self) -> DateTime<Utc>;

    /// Get current time in a specific timezone
    fn now_in_timezone(&self, timezone: Tz) -> DateTime<Tz> {
        self.now_utc().with_timezone(&timezone)
    }

    /// Get current Unix timestamp (seconds since epoch)
    fn now_timestamp(&self) -> i64 {
        self.now_utc().timestamp()
    }
}

/// System time provider for production use
#[derive(Debug, Clone, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time provider for testing
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    current_time: Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl MockTimeProvider {
    /// Create a new mock time provider starting from the given time
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            current_time: Arc::new(std::sync::Mutex::new(start_time)),
        }
    }

    /// Create a mock time provider starting from a specific date/time (UTC)
    pub fn new_from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self::new)
    }

    /// Set the current mock time
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        if let Ok(mut time) = self.current_time.lock() {
            *time = new_time;
        }
    }

    /// Advance the mock time by the specified duration
    pub fn advance(&self, duration: Duration) {
        if let Ok(mut time) = self.current_time.lock() {
            *time += duration;
        }
    }

    /// Advance the mock time by the specified number of days
    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }

    /// Get the current mock time
    pub fn current_time(&self) -> DateTime<Utc> {
        self.current_time.lock().map_or_else(|_| Utc::now(), |time| *time)
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        self.current_time()
    }
}

/// Time provider bound to the school's timezone
#[derive(Clone)]
pub struct Clock {
    provider: Arc<dyn TimeProvider>,
    timezone: Tz,
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("timezone", &self.timezone)
            .field("now", &self.now_utc())
            .finish()
    }
}

impl Clock {
    pub fn new(provider: Arc<dyn TimeProvider>, timezone: Tz) -> Self {
        Self { provider, timezone }
    }

    pub fn system(timezone: Tz) -> Self {
        Self::new(Arc::new(SystemTimeProvider), timezone)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.provider.now_utc()
    }

    pub fn now_timestamp(&self) -> i64 {
        self.provider.now_timestamp()
    }

    /// Calendar date at the school right now
    pub fn today(&self) -> NaiveDate {
        self.provider.now_in_timezone(self.timezone).date_naive()
    }
}

/// Monday of the week containing `day`, `None` past the start of the calendar
pub fn week_start(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(u64::from(day.weekday().num_days_from_monday())))
}

/// Monday to Friday of the week containing `day`
///
/// `None` when part of that week falls outside the supported calendar.
pub fn working_week(day: NaiveDate) -> Option<[NaiveDate; 5]> {
    let monday = week_start(day)?;
    let mut days = [monday; 5];
    for (offset, slot) in (0u64..).zip(days.iter_mut()) {
        *slot = monday.checked_add_days(Days::new(offset))?;
    }
    Some(days)
}

/// First day of the month containing `day`
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}
