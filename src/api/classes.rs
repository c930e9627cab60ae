//! Class API Endpoints
//!
//! Practical driving lessons and theory sessions, listed flat or as a
//! Monday to Friday agenda.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::{PracticalClass, TheoreticalClass};
use crate::services::schedule_service::{
    PracticalClassForm, PracticalClassView, PracticalFormOptions, TheoreticalClassForm,
    TheoreticalClassView, TheoreticalFormOptions, WeekAgenda,
};

/// Week navigation: `date` picks the reference day (today when absent),
/// `weeks` moves it by whole weeks
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub weeks: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/classes/practical",
            get(list_practical).post(create_practical),
        )
        .route("/classes/practical/week", get(practical_week))
        .route("/classes/practical/options", get(practical_options))
        .route(
            "/classes/practical/:id",
            put(update_practical).delete(delete_practical),
        )
        .route(
            "/classes/theoretical",
            get(list_theoretical).post(create_theoretical),
        )
        .route("/classes/theoretical/week", get(theoretical_week))
        .route("/classes/theoretical/options", get(theoretical_options))
        .route(
            "/classes/theoretical/:id",
            put(update_theoretical).delete(delete_theoretical),
        )
}

pub async fn list_practical(State(state): State<AppState>) -> Json<Vec<PracticalClassView>> {
    Json(state.schedule.practical_classes().await)
}

pub async fn practical_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<WeekAgenda<PracticalClassView>>> {
    Ok(Json(state.schedule.practical_week(query.date, query.weeks).await?))
}

pub async fn practical_options(State(state): State<AppState>) -> Json<PracticalFormOptions> {
    Json(state.schedule.practical_options().await)
}

pub async fn create_practical(
    State(state): State<AppState>,
    Json(form): Json<PracticalClassForm>,
) -> AppResult<(StatusCode, Json<PracticalClass>)> {
    let class = state.schedule.create_practical(form).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

pub async fn update_practical(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PracticalClassForm>,
) -> AppResult<Json<PracticalClass>> {
    Ok(Json(state.schedule.update_practical(&id, form).await?))
}

pub async fn delete_practical(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.schedule.delete_practical(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_theoretical(State(state): State<AppState>) -> Json<Vec<TheoreticalClassView>> {
    Json(state.schedule.theoretical_classes().await)
}

pub async fn theoretical_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<WeekAgenda<TheoreticalClassView>>> {
    Ok(Json(state.schedule.theoretical_week(query.date, query.weeks).await?))
}

pub async fn theoretical_options(State(state): State<AppState>) -> Json<TheoreticalFormOptions> {
    Json(state.schedule.theoretical_options().await)
}

pub async fn create_theoretical(
    State(state): State<AppState>,
    Json(form): Json<TheoreticalClassForm>,
) -> AppResult<(StatusCode, Json<TheoreticalClass>)> {
    let class = state.schedule.create_theoretical(form).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

pub async fn update_theoretical(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<TheoreticalClassForm>,
) -> AppResult<Json<TheoreticalClass>> {
    Ok(Json(state.schedule.update_theoretical(&id, form).await?))
}

pub async fn delete_theoretical(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.schedule.delete_theoretical(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
