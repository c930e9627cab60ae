//! Payment Model
//!
//! Fees charged to students and their collection status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{require, Record, StatusVariant, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    Pagado,
    Pendiente,
    /// Partially paid; counted as pending
    Parcial,
    Vencido,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pagado => "Pagado",
            PaymentStatus::Pendiente => "Pendiente",
            PaymentStatus::Parcial => "Parcial",
            PaymentStatus::Vencido => "Vencido",
        }
    }

    pub fn variant(&self) -> StatusVariant {
        match self {
            PaymentStatus::Pagado => StatusVariant::Success,
            PaymentStatus::Pendiente => StatusVariant::Warning,
            PaymentStatus::Parcial => StatusVariant::Info,
            PaymentStatus::Vencido => StatusVariant::Error,
        }
    }

    pub fn is_paid(&self) -> bool {
        *self == PaymentStatus::Pagado
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub student_id: String,
    /// Amount in euros
    pub amount: f64,
    pub concept: String,
    pub date: NaiveDate,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

/// Invoice number for the `sequence`-th payment of a year, e.g. `F-2025-0007`
pub fn invoice_number(year: i32, sequence: usize) -> String {
    format!("F-{year}-{sequence:04}")
}

impl Record for Payment {
    const KIND: &'static str = "Payment";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("studentId", &self.student_id)?;
        require("concept", &self.concept)?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}
