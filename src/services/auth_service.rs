//! Authentication Service
//!
//! Single credential sign-in, profile edits and signed session tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::Config;
use crate::database::StoreError;
use crate::logging;
use crate::models::{require, AuthRecord, User, ValidationError};
use crate::services::store::CrmStore;

type HmacSha256 = Hmac<Sha256>;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session expired")]
    ExpiredToken,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: CrmStore,
    login: String,
    secret: Vec<u8>,
    session_ttl: i64,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("login", &self.login)
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(store: CrmStore, config: &Config) -> Self {
        Self {
            store,
            login: config.admin_login.clone(),
            secret: config.shared_secret.as_bytes().to_vec(),
            session_ttl: i64::try_from(config.session_ttl).unwrap_or(i64::MAX),
        }
    }

    /// Store the initial password when the data file has no credential yet
    pub async fn ensure_credential(&self, initial_password: &str) -> Result<(), AuthServiceError> {
        if self.store.read(|data| data.auth.has_credential()).await {
            return Ok(());
        }

        debug!("Initialising back office credential");
        self.store
            .mutate(|data| {
                set_password(&mut data.auth, initial_password);
                Ok::<_, AuthServiceError>(())
            })
            .await
    }

    /// Check the credential pair and open a session
    ///
    /// A new session replaces the previous one, so tokens from an earlier
    /// login stop working.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthServiceError> {
        let now = self.store.clock().now_utc();
        let session_id = new_session_id();

        let user = self
            .store
            .mutate(|data| {
                if request.login != self.login || !password_matches(&data.auth, &request.password) {
                    return Err(AuthServiceError::InvalidCredentials);
                }
                data.auth.signed_in_at = Some(now);
                data.auth.session_id = Some(session_id.clone());
                Ok(data.auth.profile.clone())
            })
            .await;

        let user = match user {
            Ok(user) => user,
            Err(e) => {
                logging::log_authentication_event("login", Some(&request.login), false);
                return Err(e);
            }
        };

        logging::log_authentication_event("login", Some(&request.login), true);
        let token = self.issue_token(&SessionClaims {
            user_id: user.id.clone(),
            session_id,
            issued_at: now.timestamp(),
        })?;
        Ok(LoginResponse { token, user })
    }

    /// Close the session; every token issued so far stops working
    pub async fn logout(&self) -> Result<(), AuthServiceError> {
        self.store
            .mutate(|data| {
                data.auth.signed_in_at = None;
                data.auth.session_id = None;
                Ok::<_, AuthServiceError>(())
            })
            .await?;
        logging::log_authentication_event("logout", None, true);
        Ok(())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.store
            .read(|data| data.auth.current_user().cloned())
            .await
    }

    /// Resolve a bearer token to the signed-in user
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthServiceError> {
        let claims = self.decode_token(token)?;

        if self.store.clock().now_timestamp() - claims.issued_at >= self.session_ttl {
            return Err(AuthServiceError::ExpiredToken);
        }

        let auth = self.store.read(|data| data.auth.clone()).await;
        let session_id = auth.session_id.ok_or(AuthServiceError::NotSignedIn)?;

        if auth.profile.id != claims.user_id || session_id != claims.session_id {
            return Err(AuthServiceError::InvalidToken);
        }

        Ok(auth.profile)
    }

    /// Merge a profile update into the signed-in user
    pub async fn update_user(&self, update: ProfileUpdate) -> Result<User, AuthServiceError> {
        self.store
            .mutate(|data| {
                if data.auth.signed_in_at.is_none() {
                    return Err(AuthServiceError::NotSignedIn);
                }

                let mut profile = data.auth.profile.clone();
                if let Some(name) = update.name {
                    profile.name = name.trim().to_string();
                }
                if let Some(email) = update.email {
                    profile.email = email.trim().to_string();
                }
                if update.avatar.is_some() {
                    profile.avatar = update.avatar;
                }
                profile.validate()?;

                data.auth.profile = profile.clone();
                Ok(profile)
            })
            .await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), AuthServiceError> {
        require("newPassword", &change.new_password)?;
        if change.new_password != change.confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let result = self
            .store
            .mutate(|data| {
                if !password_matches(&data.auth, &change.current_password) {
                    return Err(AuthServiceError::WrongPassword);
                }
                set_password(&mut data.auth, &change.new_password);
                Ok(())
            })
            .await;

        logging::log_authentication_event("change_password", None, result.is_ok());
        result
    }

    fn mac(&self) -> Result<HmacSha256, AuthServiceError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| AuthServiceError::InvalidToken)
    }

    /// Token format: `base64(user_id:session_id:issued_at).base64(hmac)`
    fn issue_token(&self, claims: &SessionClaims) -> Result<String, AuthServiceError> {
        let payload = format!(
            "{}:{}:{}",
            claims.user_id, claims.session_id, claims.issued_at
        );
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    fn decode_token(&self, token: &str) -> Result<SessionClaims, AuthServiceError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthServiceError::InvalidToken)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthServiceError::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthServiceError::InvalidToken)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| AuthServiceError::InvalidToken)?;

        let payload = String::from_utf8(payload).map_err(|_| AuthServiceError::InvalidToken)?;
        let (rest, issued_at) = payload
            .rsplit_once(':')
            .ok_or(AuthServiceError::InvalidToken)?;
        let (user_id, session_id) = rest.rsplit_once(':').ok_or(AuthServiceError::InvalidToken)?;
        let issued_at = issued_at
            .parse()
            .map_err(|_| AuthServiceError::InvalidToken)?;

        Ok(SessionClaims {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            issued_at,
        })
    }
}

/// Signed contents of a session token
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionClaims {
    user_id: String,
    session_id: String,
    issued_at: i64,
}

fn new_session_id() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn password_matches(auth: &AuthRecord, password: &str) -> bool {
    auth.has_credential() && hash_password(&auth.salt, password) == auth.password_hash
}

fn set_password(auth: &mut AuthRecord, password: &str) {
    let salt: [u8; 16] = rand::thread_rng().gen();
    auth.salt = hex::encode(salt);
    auth.password_hash = hash_password(&auth.salt, password);
}
