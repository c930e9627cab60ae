//! Time slots and weekly availability
//!
//! Times are kept as `HH:MM` strings, the way the forms submit them.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Helper function to validate time format HH:MM
pub fn is_valid_time_format(time_str: &str) -> bool {
    // Check basic format length
    if time_str.len() != 5 {
        return false;
    }

    let Some((hour, minute)) = time_str.split_once(':') else {
        return false;
    };

    // Check hour (00-23)
    match hour.parse::<u8>() {
        Ok(hour) if hour <= 23 => {}
        _ => return false,
    }

    // Check minute (00-59)
    matches!(minute.parse::<u8>(), Ok(minute) if minute <= 59)
}

pub fn validate_time(time: &str) -> Result<(), ValidationError> {
    if is_valid_time_format(time) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime(time.to_string()))
    }
}

/// Both ends must be valid and the range non-empty.
///
/// `HH:MM` strings order lexicographically the same way they order in time.
pub fn validate_time_range(start: &str, end: &str) -> Result<(), ValidationError> {
    validate_time(start)?;
    validate_time(end)?;
    if start >= end {
        return Err(ValidationError::InvalidTimeRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// A half-open span of a working day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_time_range(&self.start, &self.end)
    }

    /// Length of the slot in minutes
    pub fn minutes(&self) -> u32 {
        minutes_of_day(&self.end).saturating_sub(minutes_of_day(&self.start))
    }
}

/// Minutes since midnight of a valid `HH:MM` string, 0 otherwise
pub fn minutes_of_day(time: &str) -> u32 {
    time.split_once(':')
        .and_then(|(h, m)| Some(h.parse::<u32>().ok()? * 60 + m.parse::<u32>().ok()?))
        .unwrap_or(0)
}

/// `time` moved forward by `minutes`, clamped to the end of the day
pub fn add_minutes(time: &str, minutes: u32) -> String {
    let total = (minutes_of_day(time) + minutes).min(23 * 60 + 59);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Slots a teacher is available for, per weekday
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    #[serde(default)]
    pub monday: Vec<TimeSlot>,
    #[serde(default)]
    pub tuesday: Vec<TimeSlot>,
    #[serde(default)]
    pub wednesday: Vec<TimeSlot>,
    #[serde(default)]
    pub thursday: Vec<TimeSlot>,
    #[serde(default)]
    pub friday: Vec<TimeSlot>,
    #[serde(default)]
    pub saturday: Vec<TimeSlot>,
    #[serde(default)]
    pub sunday: Vec<TimeSlot>,
}

impl WeeklyAvailability {
    /// Same slots Monday to Friday, nothing on weekends
    pub fn weekdays(slots: &[TimeSlot]) -> Self {
        Self {
            monday: slots.to_vec(),
            tuesday: slots.to_vec(),
            wednesday: slots.to_vec(),
            thursday: slots.to_vec(),
            friday: slots.to_vec(),
            ..Self::default()
        }
    }

    pub fn slots(&self, day: Weekday) -> &[TimeSlot] {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn all(&self) -> impl Iterator<Item = &TimeSlot> {
        [
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
            &self.sunday,
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }

    /// Total available minutes across the week
    pub fn weekly_minutes(&self) -> u32 {
        self.all().map(TimeSlot::minutes).sum()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.all().try_for_each(TimeSlot::validate)
    }
}
