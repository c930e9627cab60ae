//! Teacher Service
//!
//! Teaching staff cards and the teacher form.

use serde::{Deserialize, Serialize};

use crate::models::{new_id, Teacher, TeacherRole, TeacherStats, WeeklyAvailability};
use crate::services::store::CrmStore;
use crate::services::ServiceResult;

/// Fields editable from the teacher form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: TeacherRole,
    /// Missing means active
    #[serde(default)]
    pub active: Option<bool>,
}

/// Teacher card
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCard {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub role_label: &'static str,
    pub initials: String,
    pub weekly_minutes: u32,
}

impl From<Teacher> for TeacherCard {
    fn from(teacher: Teacher) -> Self {
        Self {
            role_label: teacher.role.display_name(),
            initials: crate::models::initials(&teacher.name),
            weekly_minutes: teacher.availability.weekly_minutes(),
            teacher,
        }
    }
}

/// Teacher service
#[derive(Debug, Clone)]
pub struct TeacherService {
    store: CrmStore,
}

impl TeacherService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    pub async fn cards(&self) -> Vec<TeacherCard> {
        self.store
            .list::<Teacher>()
            .await
            .into_iter()
            .map(TeacherCard::from)
            .collect()
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Teacher> {
        self.store.get(id).await
    }

    /// New teachers start active, with no availability and zeroed stats
    pub async fn create(&self, form: TeacherForm) -> ServiceResult<Teacher> {
        let teacher = Teacher {
            id: new_id(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            photo: None,
            role: form.role,
            availability: WeeklyAvailability::default(),
            active: form.active.unwrap_or(true),
            created_at: self.store.clock().now_utc(),
            stats: TeacherStats::default(),
        };
        let (teacher, _) = self.store.upsert(teacher).await?;
        Ok(teacher)
    }

    /// Replace the form fields; creation date, availability, stats and photo are kept
    pub async fn update(&self, id: &str, form: TeacherForm) -> ServiceResult<Teacher> {
        self.store
            .replace(id, |existing: &Teacher| {
                Ok(Teacher {
                    name: form.name.trim().to_string(),
                    email: form.email.trim().to_string(),
                    phone: form.phone.trim().to_string(),
                    role: form.role,
                    active: form.active.unwrap_or(true),
                    ..existing.clone()
                })
            })
            .await
    }

    pub async fn set_availability(
        &self,
        id: &str,
        availability: WeeklyAvailability,
    ) -> ServiceResult<Teacher> {
        self.store
            .replace(id, |existing: &Teacher| {
                Ok(Teacher {
                    availability,
                    ..existing.clone()
                })
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<Teacher> {
        self.store.remove(id).await
    }
}
