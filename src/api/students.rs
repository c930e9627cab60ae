//! Student API Endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::{AppState, SearchQuery};
use crate::error::AppResult;
use crate::models::Student;
use crate::services::student_service::{StudentForm, StudentRow, StudentSummary};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/summary", get(student_summary))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<StudentRow>> {
    Json(state.students.rows(query.search.as_deref()).await)
}

pub async fn student_summary(State(state): State<AppState>) -> Json<StudentSummary> {
    Json(state.students.summary().await)
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Student>> {
    Ok(Json(state.students.get(&id).await?))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(form): Json<StudentForm>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let student = state.students.create(form).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<StudentForm>,
) -> AppResult<Json<Student>> {
    Ok(Json(state.students.update(&id, form).await?))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.students.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
