//! Class Models
//!
//! Practical (one student, one car) and theoretical (group) classes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{require, time_slot::validate_time_range, Record, StatusVariant, ValidationError};

/// Lifecycle of a scheduled class
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Programada,
    Realizada,
    Cancelada,
}

impl ClassStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ClassStatus::Programada => "Programada",
            ClassStatus::Realizada => "Realizada",
            ClassStatus::Cancelada => "Cancelada",
        }
    }

    pub fn variant(&self) -> StatusVariant {
        match self {
            ClassStatus::Programada => StatusVariant::Info,
            ClassStatus::Realizada => StatusVariant::Success,
            ClassStatus::Cancelada => StatusVariant::Error,
        }
    }
}

/// Behind-the-wheel class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalClass {
    pub id: String,
    pub student_id: String,
    pub teacher_id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub status: ClassStatus,
    #[serde(default)]
    pub notes: String,
    /// Teacher's 1-5 rating of the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Record for PracticalClass {
    const KIND: &'static str = "PracticalClass";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("studentId", &self.student_id)?;
        require("teacherId", &self.teacher_id)?;
        require("vehicleId", &self.vehicle_id)?;
        validate_time_range(&self.start_time, &self.end_time)?;
        match self.rating {
            Some(rating) if !(1..=5).contains(&rating) => Err(ValidationError::InvalidRating(rating)),
            _ => Ok(()),
        }
    }
}

/// Group theory session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheoreticalClass {
    pub id: String,
    pub teacher_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub topic: String,
    /// Student ids of the attendees
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub status: ClassStatus,
}

impl Record for TheoreticalClass {
    const KIND: &'static str = "TheoreticalClass";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("teacherId", &self.teacher_id)?;
        require("topic", &self.topic)?;
        validate_time_range(&self.start_time, &self.end_time)
    }
}

/// Anything that sits on the weekly agenda
pub trait Scheduled {
    fn date(&self) -> NaiveDate;
    fn start_time(&self) -> &str;
}

impl Scheduled for PracticalClass {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn start_time(&self) -> &str {
        &self.start_time
    }
}

impl Scheduled for TheoreticalClass {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn start_time(&self) -> &str {
        &self.start_time
    }
}
