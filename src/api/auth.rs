//! Session API Endpoints
//!
//! Sign-in, sign-out and the profile page.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Serialize;

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::User;
use crate::services::auth_service::{LoginRequest, LoginResponse, PasswordChange, ProfileUpdate};

/// Data the layout header needs for the signed-in user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: User,
    pub role_name: &'static str,
    pub initials: String,
    pub unread_notifications: usize,
}

/// Routes that need a session; `/auth/login` is mounted separately
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me).put(update_profile))
        .route("/auth/password", put(change_password))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    Ok(Json(state.auth.login(&request).await?))
}

pub async fn logout(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Json<SessionView> {
    Json(SessionView {
        role_name: user.role.display_name(),
        initials: user.initials(),
        unread_notifications: state.notifications.unread_count().await,
        user,
    })
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<User>> {
    Ok(Json(state.auth.update_user(update).await?))
}

pub async fn change_password(
    State(state): State<AppState>,
    Json(change): Json<PasswordChange>,
) -> AppResult<StatusCode> {
    state.auth.change_password(&change).await?;
    Ok(StatusCode::NO_CONTENT)
}
