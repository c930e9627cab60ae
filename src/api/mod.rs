//! API module for the back office
//!
//! REST endpoints behind each dashboard page, the session middleware and
//! the router assembly.

pub mod auth;
pub mod classes;
pub mod documents;
pub mod notifications;
pub mod payments;
pub mod stats;
pub mod students;
pub mod teachers;
pub mod vehicles;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;
use crate::error::AppError;
use crate::services::document_service::DocumentService;
use crate::services::notification_service::NotificationService;
use crate::services::payment_service::PaymentService;
use crate::services::schedule_service::ScheduleService;
use crate::services::stats_service::StatsService;
use crate::services::student_service::StudentService;
use crate::services::teacher_service::TeacherService;
use crate::services::vehicle_service::VehicleService;
use crate::services::{AuthService, CrmStore};

/// Services shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub students: StudentService,
    pub teachers: TeacherService,
    pub vehicles: VehicleService,
    pub schedule: ScheduleService,
    pub payments: PaymentService,
    pub documents: DocumentService,
    pub notifications: NotificationService,
    pub stats: StatsService,
}

impl AppState {
    pub fn new(store: CrmStore, config: &Config) -> Self {
        Self {
            auth: AuthService::new(store.clone(), config),
            students: StudentService::new(store.clone()),
            teachers: TeacherService::new(store.clone()),
            vehicles: VehicleService::new(store.clone()),
            schedule: ScheduleService::new(store.clone()),
            payments: PaymentService::new(store.clone()),
            documents: DocumentService::new(store.clone()),
            notifications: NotificationService::new(store.clone()),
            stats: StatsService::new(store),
        }
    }
}

/// `?search=` filter used by the table pages
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Build the application router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .merge(auth::routes())
        .merge(students::routes())
        .merge(teachers::routes())
        .merge(vehicles::routes())
        .merge(classes::routes())
        .merge(payments::routes())
        .merge(documents::routes())
        .merge(notifications::routes())
        .merge(stats::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .nest("/api", public.merge(protected))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors_origins)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Resolve the bearer token to the signed-in user and hand it to the handler
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let user = state.auth.authenticate(&token).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).as_deref(), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer  ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
