//! Document API Endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::SchoolDocument;
use crate::services::document_service::{DocumentRename, DocumentUpload};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents).post(upload_document))
        .route("/documents/:id", put(rename_document).delete(delete_document))
}

pub async fn list_documents(State(state): State<AppState>) -> Json<Vec<SchoolDocument>> {
    Json(state.documents.list().await)
}

pub async fn upload_document(
    State(state): State<AppState>,
    Json(upload): Json<DocumentUpload>,
) -> AppResult<(StatusCode, Json<SchoolDocument>)> {
    let document = state.documents.upload(upload).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn rename_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(rename): Json<DocumentRename>,
) -> AppResult<Json<SchoolDocument>> {
    Ok(Json(state.documents.rename(&id, rename).await?))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.documents.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
