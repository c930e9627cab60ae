//! Notification API Endpoints

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::Notification;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: usize,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", post(mark_all_as_read))
        .route("/notifications/:id/read", post(mark_as_read))
}

pub async fn list_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.notifications.list().await)
}

pub async fn unread_count(State(state): State<AppState>) -> Json<UnreadCount> {
    Json(UnreadCount {
        unread: state.notifications.unread_count().await,
    })
}

pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    Ok(Json(state.notifications.mark_as_read(&id).await?))
}

pub async fn mark_all_as_read(State(state): State<AppState>) -> AppResult<Json<MarkedRead>> {
    let updated = state.notifications.mark_all_as_read().await?;
    Ok(Json(MarkedRead { updated }))
}
