//! Teacher API Endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::{Teacher, WeeklyAvailability};
use crate::services::teacher_service::{TeacherCard, TeacherForm};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route(
            "/teachers/:id",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/teachers/:id/availability", put(set_availability))
}

pub async fn list_teachers(State(state): State<AppState>) -> Json<Vec<TeacherCard>> {
    Json(state.teachers.cards().await)
}

pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Teacher>> {
    Ok(Json(state.teachers.get(&id).await?))
}

pub async fn create_teacher(
    State(state): State<AppState>,
    Json(form): Json<TeacherForm>,
) -> AppResult<(StatusCode, Json<Teacher>)> {
    let teacher = state.teachers.create(form).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<TeacherForm>,
) -> AppResult<Json<Teacher>> {
    Ok(Json(state.teachers.update(&id, form).await?))
}

/// Replace the weekly availability grid
pub async fn set_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(availability): Json<WeeklyAvailability>,
) -> AppResult<Json<Teacher>> {
    Ok(Json(state.teachers.set_availability(&id, availability).await?))
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.teachers.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
