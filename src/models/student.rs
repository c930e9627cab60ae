//! Student Model
//!
//! Represents an enrolled student, the licence they train for and their progress.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{
    require, validate_dni, validate_email, validate_phone, Document, Record, StatusVariant,
    ValidationError,
};

/// Driving licence categories taught by the school
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum LicenseType {
    #[serde(rename = "AM")]
    #[strum(serialize = "AM")]
    Am,
    A1,
    A2,
    A,
    B,
    C,
    D,
    E,
}

impl LicenseType {
    /// Get display name for this licence
    pub fn display_name(&self) -> String {
        format!("Permiso {self}")
    }
}

/// Enrollment state of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StudentStatus {
    Activo,
    Pausado,
    Completado,
    Baja,
}

impl StudentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StudentStatus::Activo => "Activo",
            StudentStatus::Pausado => "Pausado",
            StudentStatus::Completado => "Completado",
            StudentStatus::Baja => "Baja",
        }
    }

    pub fn variant(&self) -> StatusVariant {
        match self {
            StudentStatus::Activo => StatusVariant::Success,
            StudentStatus::Pausado => StatusVariant::Warning,
            StudentStatus::Completado => StatusVariant::Info,
            StudentStatus::Baja => StatusVariant::Error,
        }
    }
}

/// Student enrolled at the school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dni: String,
    pub birth_date: NaiveDate,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub license: LicenseType,
    pub status: StudentStatus,
    /// Assigned teacher; not checked against the teacher list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    /// Theory progress percentage
    pub theoretical_progress: u8,
    /// Practice progress percentage
    pub practical_progress: u8,
    /// Practical classes taken so far
    pub practical_classes: u32,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub documents: Vec<Document>,
    pub enrollment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
}

impl Student {
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Activo
    }

    /// Age in whole years on the given day
    pub fn age_on(&self, day: NaiveDate) -> u32 {
        day.years_since(self.birth_date).unwrap_or(0)
    }
}

impl Record for Student {
    const KIND: &'static str = "Student";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        validate_dni(&self.dni)?;
        for progress in [self.theoretical_progress, self.practical_progress] {
            if progress > 100 {
                return Err(ValidationError::ProgressOutOfRange(progress));
            }
        }
        Ok(())
    }
}
