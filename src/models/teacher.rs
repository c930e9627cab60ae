//! Teacher Model
//!
//! Instructors of the school, what they teach and when they are available.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{
    require, validate_email, validate_phone, Record, ValidationError, WeeklyAvailability,
};

/// Which kind of classes a teacher gives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TeacherRole {
    /// Practical (behind the wheel) classes only
    Practicas,
    /// Theory classes only
    Teoricas,
    Ambas,
}

impl TeacherRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            TeacherRole::Practicas => "Prácticas",
            TeacherRole::Teoricas => "Teóricas",
            TeacherRole::Ambas => "Prácticas y Teóricas",
        }
    }

    pub fn teaches_practical(&self) -> bool {
        *self != TeacherRole::Teoricas
    }

    pub fn teaches_theory(&self) -> bool {
        *self != TeacherRole::Practicas
    }
}

/// Headline numbers shown on a teacher card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStats {
    pub total_classes: u32,
    pub this_month: u32,
    /// Exam pass rate, percent
    pub success_rate: u8,
    pub active_students: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub role: TeacherRole,
    #[serde(default)]
    pub availability: WeeklyAvailability,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: TeacherStats,
}

impl Teacher {
    /// First two words of the name, as listed in the student table
    pub fn short_name(&self) -> String {
        self.name
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Record for Teacher {
    const KIND: &'static str = "Teacher";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        if self.stats.success_rate > 100 {
            return Err(ValidationError::ProgressOutOfRange(self.stats.success_rate));
        }
        self.availability.validate()
    }
}
