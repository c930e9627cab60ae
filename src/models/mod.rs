//! Models module for the driving school back office
//!
//! Contains all records of the school and their validation logic.

pub mod class;
pub mod document;
pub mod notification;
pub mod payment;
pub mod student;
pub mod teacher;
pub mod time_slot;
pub mod user;
pub mod vehicle;

use std::sync::OnceLock;

use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};

pub use class::{ClassStatus, PracticalClass, Scheduled, TheoreticalClass};
pub use document::{Document, SchoolDocument};
pub use notification::{Notification, NotificationKind};
pub use payment::{Payment, PaymentStatus};
pub use student::{LicenseType, Student, StudentStatus};
pub use teacher::{Teacher, TeacherRole, TeacherStats};
pub use time_slot::{TimeSlot, WeeklyAvailability};
pub use user::{AuthRecord, User, UserRole};
pub use vehicle::{ItvStatus, Vehicle};

/// Name shown wherever a reference id does not resolve to a record
pub const UNKNOWN_NAME: &str = "Desconocido";

/// Badge colour a status maps to on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusVariant {
    Success,
    Warning,
    Error,
    Info,
}

/// A stored record with a string identifier
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human readable kind, used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Check field-level constraints before the record is stored
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Record validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    Required(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid DNI: {0}")]
    InvalidDni(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Start time {start} must be before end time {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("Progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u8),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("Invalid vehicle year: {0}")]
    InvalidYear(i32),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("A class starting at {0} has no room before midnight")]
    NoRoomBeforeMidnight(String),
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

fn dni_regex() -> &'static Regex {
    static DNI: OnceLock<Regex> = OnceLock::new();
    DNI.get_or_init(|| Regex::new(r"^[0-9XYZ][0-9]{7}[A-Z]$").expect("dni pattern is valid"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9 ]{9,15}$").expect("phone pattern is valid"))
}

/// Reject blank required text fields
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Spanish national id (DNI) or foreigner id (NIE), case-insensitive
pub fn validate_dni(dni: &str) -> Result<(), ValidationError> {
    require("dni", dni)?;
    if !dni_regex().is_match(&dni.to_uppercase()) {
        return Err(ValidationError::InvalidDni(dni.to_string()));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    require("phone", phone)?;
    if !phone_regex().is_match(phone) {
        return Err(ValidationError::InvalidPhone(phone.to_string()));
    }
    Ok(())
}

/// Uppercase initials of the first two words of a name
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// New record identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
