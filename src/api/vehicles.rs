//! Vehicle API Endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::Vehicle;
use crate::services::vehicle_service::{FleetOverview, VehicleForm, VehicleRow};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(fleet_overview).post(create_vehicle))
        .route("/vehicles/itv-alerts", get(itv_alerts))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

pub async fn fleet_overview(State(state): State<AppState>) -> Json<FleetOverview> {
    Json(state.vehicles.overview().await)
}

/// Vehicles whose ITV is due soon or already expired
pub async fn itv_alerts(State(state): State<AppState>) -> Json<Vec<VehicleRow>> {
    Json(state.vehicles.itv_alerts().await)
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vehicle>> {
    Ok(Json(state.vehicles.get(&id).await?))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(form): Json<VehicleForm>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    let vehicle = state.vehicles.create(form).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<VehicleForm>,
) -> AppResult<Json<Vehicle>> {
    Ok(Json(state.vehicles.update(&id, form).await?))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.vehicles.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
