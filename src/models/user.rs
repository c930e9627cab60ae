//! User Model
//!
//! The back office account and the persisted sign-in state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{validate_email, require, ValidationError};

/// Staff role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    Admin,
    Profesora,
    Secretaria,
}

impl UserRole {
    /// Get display name for this role
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administradora",
            UserRole::Profesora => "Profesora",
            UserRole::Secretaria => "Secretaria",
        }
    }
}

/// Back office user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// The school director, owner of the single back office credential
    pub fn director() -> Self {
        Self {
            id: "1".to_string(),
            name: "Directora".to_string(),
            email: "directora@autoescuelalaroca.com".to_string(),
            role: UserRole::Admin,
            avatar: None,
        }
    }

    pub fn initials(&self) -> String {
        super::initials(&self.name)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        validate_email(&self.email)
    }
}

/// Persisted credential and sign-in state
///
/// The profile survives sign-out; only the session fields are cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRecord {
    pub profile: User,

    /// Hex SHA-256 of salt followed by password; empty until first initialised
    #[serde(default)]
    pub password_hash: String,

    #[serde(default)]
    pub salt: String,

    /// Start of the current session, `None` when signed out
    #[serde(default)]
    pub signed_in_at: Option<DateTime<Utc>>,

    /// Random id of the current session; tokens carry it
    #[serde(default)]
    pub session_id: Option<String>,
}

impl Default for AuthRecord {
    fn default() -> Self {
        Self {
            profile: User::director(),
            password_hash: String::new(),
            salt: String::new(),
            signed_in_at: None,
            session_id: None,
        }
    }
}

impl AuthRecord {
    pub fn has_credential(&self) -> bool {
        !self.password_hash.is_empty() && !self.salt.is_empty()
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<&User> {
        self.signed_in_at.map(|_| &self.profile)
    }
}
