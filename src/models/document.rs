//! Document Models
//!
//! Student attachments and the school's own document library.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Record, ValidationError};

/// File attached to a student record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Internal document of the school (regulations, fee sheets, contract templates)
///
/// Only metadata is stored; file contents live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDocument {
    pub id: String,
    pub name: String,
    /// Upper-case file kind, e.g. `PDF` or `DOC`
    #[serde(rename = "type")]
    pub kind: String,
    /// Human readable size, e.g. `2.4 MB`
    pub size: String,
    pub date: NaiveDate,
}

impl SchoolDocument {
    /// File kind inferred from the extension of a file name
    pub fn kind_from_name(name: &str) -> String {
        name.rsplit_once('.')
            .map(|(_, ext)| ext.to_uppercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "FILE".to_string())
    }
}

/// Human readable size of a byte count, one decimal in MB
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB / 10 {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{} KB", bytes.div_ceil(KB))
    }
}

impl Record for SchoolDocument {
    const KIND: &'static str = "Document";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}
