//! Autoescuela CRM
//!
//! Back office API for a driving school: students, teachers, fleet,
//! class agendas, billing, school documents and notices.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod seed;
pub mod services;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, AppResult};
