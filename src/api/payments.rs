//! Payment API Endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::{AppState, SearchQuery};
use crate::error::AppResult;
use crate::models::Payment;
use crate::services::payment_service::{PaymentForm, PaymentRow, PaymentSummary};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/summary", get(payment_summary))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<PaymentRow>> {
    Json(state.payments.rows(query.search.as_deref()).await)
}

/// Totals per bucket, the pie chart and the overdue list
pub async fn payment_summary(State(state): State<AppState>) -> Json<PaymentSummary> {
    Json(state.payments.summary().await)
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(form): Json<PaymentForm>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let payment = state.payments.create(form).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}
