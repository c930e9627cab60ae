//! Shared setup for the HTTP tests
//!
//! Every test gets its own data directory and a clock frozen on
//! Wednesday 8 January 2025, 09:00 UTC.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use autoescuela_crm::database::Database;
use autoescuela_crm::services::{AuthService, Clock, CrmStore, MockTimeProvider};
use autoescuela_crm::{create_router, seed, AppState, Config};

pub const LOGIN: &str = "autoescuela_laroca";
pub const PASSWORD: &str = "laroca1234";

pub fn wednesday() -> MockTimeProvider {
    MockTimeProvider::new_from_ymd_hms(2025, 1, 8, 9, 0, 0).unwrap()
}

/// Router over a demo data file in `data_dir`, assembled the way `main` does
pub async fn build_router(data_dir: &Path, time: &MockTimeProvider) -> Router {
    let config = Config {
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    };

    let clock = Clock::new(Arc::new(time.clone()), config.tz().unwrap());
    let today = clock.today();

    let database = Database::open(&config.data_dir, &config.data_file)
        .await
        .unwrap();
    let store = CrmStore::open(database, clock, || seed::demo_data(today))
        .await
        .unwrap();
    AuthService::new(store.clone(), &config)
        .ensure_credential(&config.admin_initial_password)
        .await
        .unwrap();

    create_router(AppState::new(store, &config), &config)
}

pub struct TestApp {
    pub server: TestServer,
    pub time: MockTimeProvider,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let time = wednesday();
        let app = build_router(data_dir.path(), &time).await;

        Self {
            server: TestServer::new(app).unwrap(),
            time,
            _data_dir: data_dir,
        }
    }

    /// Sign in with the default credential and return the session token
    pub async fn login(&self) -> String {
        self.login_with(PASSWORD).await
    }

    pub async fn login_with(&self, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "login": LOGIN, "password": password }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn student_form(name: &str, dni: &str) -> Value {
    json!({
        "name": name,
        "email": "lucia@email.com",
        "phone": "622333444",
        "dni": dni,
        "birthDate": "2006-03-02",
        "address": "Calle Real 3",
        "license": "A2",
        "status": "activo",
        "teacherId": "1"
    })
}
