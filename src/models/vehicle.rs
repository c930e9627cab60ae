//! Vehicle Model
//!
//! School cars and their inspection (ITV) and insurance deadlines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::{require, Record, StatusVariant, ValidationError};

/// Days before the ITV deadline at which a vehicle is flagged as due soon
pub const ITV_WARNING_DAYS: i64 = 30;

/// Days before the ITV deadline at which a vehicle enters the alert list
pub const ITV_ALERT_DAYS: i64 = 60;

/// Oldest model year accepted for a school car
const MIN_YEAR: i32 = 1990;
const MAX_YEAR: i32 = 2100;

/// Inspection standing of a vehicle on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItvStatus {
    /// Deadline already passed
    Vencida,
    /// Less than [`ITV_WARNING_DAYS`] left
    Proxima,
    Vigente,
}

impl ItvStatus {
    pub fn from_days_left(days: i64) -> Self {
        if days < 0 {
            ItvStatus::Vencida
        } else if days < ITV_WARNING_DAYS {
            ItvStatus::Proxima
        } else {
            ItvStatus::Vigente
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItvStatus::Vencida => "Vencida",
            ItvStatus::Proxima => "Próxima",
            ItvStatus::Vigente => "Vigente",
        }
    }

    pub fn variant(&self) -> StatusVariant {
        match self {
            ItvStatus::Vencida => StatusVariant::Error,
            ItvStatus::Proxima => StatusVariant::Warning,
            ItvStatus::Vigente => StatusVariant::Success,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub itv_date: NaiveDate,
    pub insurance_date: NaiveDate,
    pub active: bool,
}

impl Vehicle {
    /// Signed number of days from `today` to the ITV deadline
    pub fn days_until_itv(&self, today: NaiveDate) -> i64 {
        (self.itv_date - today).num_days()
    }

    pub fn days_until_insurance(&self, today: NaiveDate) -> i64 {
        (self.insurance_date - today).num_days()
    }

    pub fn itv_status(&self, today: NaiveDate) -> ItvStatus {
        ItvStatus::from_days_left(self.days_until_itv(today))
    }

    /// Brand and model, e.g. "Volkswagen Golf"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

impl Record for Vehicle {
    const KIND: &'static str = "Vehicle";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("brand", &self.brand)?;
        require("model", &self.model)?;
        require("plate", &self.plate)?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(ValidationError::InvalidYear(self.year));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golf() -> Vehicle {
        Vehicle {
            id: "1".to_string(),
            brand: "Volkswagen".to_string(),
            model: "Golf".to_string(),
            plate: "8899 LLR".to_string(),
            year: 2023,
            itv_date: NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
            insurance_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            active: true,
        }
    }

    #[test]
    fn test_itv_status_thresholds() {
        assert_eq!(ItvStatus::from_days_left(-1), ItvStatus::Vencida);
        assert_eq!(ItvStatus::from_days_left(0), ItvStatus::Proxima);
        assert_eq!(ItvStatus::from_days_left(29), ItvStatus::Proxima);
        assert_eq!(ItvStatus::from_days_left(30), ItvStatus::Vigente);
    }

    #[test]
    fn test_days_until_itv() {
        let vehicle = golf();
        let today = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(vehicle.days_until_itv(today), 14);
        assert_eq!(vehicle.itv_status(today), ItvStatus::Proxima);

        let later = NaiveDate::from_ymd_opt(2027, 2, 1).unwrap();
        assert_eq!(vehicle.days_until_itv(later), -17);
        assert_eq!(vehicle.itv_status(later).label(), "Vencida");
    }

    #[test]
    fn test_vehicle_validation() {
        let mut vehicle = golf();
        assert!(vehicle.validate().is_ok());

        vehicle.year = 1970;
        assert_eq!(vehicle.validate(), Err(ValidationError::InvalidYear(1970)));

        let mut vehicle = golf();
        vehicle.plate = " ".to_string();
        assert_eq!(vehicle.validate(), Err(ValidationError::Required("plate")));
    }
}
