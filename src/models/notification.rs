//! Notification Model
//!
//! Notices shown in the header bell and on the notifications page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{require, Record, ValidationError};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

/// Notice addressed to the back office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    /// Dashboard route the notice points at, e.g. `/alumnos`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Notification {
    /// Create a new unread notification
    pub fn new(
        kind: NotificationKind,
        title: &str,
        message: &str,
        link: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: super::new_id(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
            read: false,
            created_at,
            link: link.map(str::to_string),
        }
    }

    /// Notice raised when a student enrolls
    pub fn enrollment(student_name: &str, license: &str, created_at: DateTime<Utc>) -> Self {
        Self::new(
            NotificationKind::Success,
            "Nueva Matriculación",
            &format!("{student_name} se ha matriculado en el permiso {license}."),
            Some("/alumnos"),
            created_at,
        )
    }

    /// Mark the notification as read
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

impl Record for Notification {
    const KIND: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("message", &self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let notification = Notification::new(
            NotificationKind::Warning,
            "ITV próxima",
            "El Golf pasa la ITV en 10 días.",
            None,
            Utc::now(),
        );

        assert!(!notification.read);
        assert_eq!(notification.kind, NotificationKind::Warning);
        assert!(notification.link.is_none());
        assert!(notification.validate().is_ok());
    }

    #[test]
    fn test_enrollment_notification() {
        let mut notification = Notification::enrollment("Ana Martínez", "B", Utc::now());

        assert_eq!(notification.title, "Nueva Matriculación");
        assert_eq!(notification.message, "Ana Martínez se ha matriculado en el permiso B.");
        assert_eq!(notification.link.as_deref(), Some("/alumnos"));

        notification.mark_read();
        assert!(notification.read);
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let notification =
            Notification::new(NotificationKind::Error, "Error", "Algo falló", None, Utc::now());
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["read"], false);
    }
}
