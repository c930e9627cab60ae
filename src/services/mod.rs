//! Services module for the driving school back office
//!
//! Contains the business logic behind each page of the dashboard.

pub mod auth_service;
pub mod document_service;
pub mod notification_service;
pub mod payment_service;
pub mod schedule_service;
pub mod stats_service;
pub mod store;
pub mod student_service;
pub mod teacher_service;
pub mod time_provider;
pub mod vehicle_service;

use crate::database::StoreError;
use crate::models::ValidationError;

// Re-export commonly used services
pub use auth_service::{AuthService, AuthServiceError};
pub use store::CrmStore;
pub use time_provider::{Clock, MockTimeProvider, SystemTimeProvider, TimeProvider};

/// Errors shared by the record services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found<T: crate::models::Record>(id: &str) -> Self {
        ServiceError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::{Clock, CrmStore, MockTimeProvider};
    use crate::database::Database;
    use crate::seed;

    /// Wednesday 8 January 2025, 09:00 UTC
    pub fn wednesday() -> MockTimeProvider {
        MockTimeProvider::new_from_ymd_hms(2025, 1, 8, 9, 0, 0).unwrap()
    }

    /// Demo store in a temp directory, driven by `time`
    pub async fn demo_store(dir: &tempfile::TempDir, time: &MockTimeProvider) -> CrmStore {
        let clock = Clock::new(Arc::new(time.clone()), chrono_tz::Europe::Madrid);
        let today = clock.today();
        let database = Database::open(dir.path(), "crm.json").await.unwrap();
        CrmStore::open(database, clock, || seed::demo_data(today))
            .await
            .unwrap()
    }
}
