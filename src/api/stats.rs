//! Statistics API Endpoints
//!
//! Dashboard cards, the statistics page and progress tracking.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::services::stats_service::{ChartSource, DashboardStats, OverviewStats, ProgressCard};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub chart: ChartSource,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats/dashboard", get(dashboard))
        .route("/stats/overview", get(overview))
        .route("/stats/progress", get(progress))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<DashboardStats> {
    Json(state.stats.dashboard(query.chart).await)
}

pub async fn overview(State(state): State<AppState>) -> Json<OverviewStats> {
    Json(state.stats.overview().await)
}

pub async fn progress(State(state): State<AppState>) -> Json<Vec<ProgressCard>> {
    Json(state.stats.progress().await)
}
