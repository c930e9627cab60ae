//! Student Service
//!
//! Student table, enrollment form and the counters above the table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::CrmData;
use crate::logging;
use crate::models::{
    new_id, LicenseType, Notification, Record, Student, StudentStatus, Teacher,
};
use crate::services::store::CrmStore;
use crate::services::{ServiceError, ServiceResult};

/// Fields editable from the student form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dni: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub license: LicenseType,
    pub status: StudentStatus,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
}

/// Student as listed in the table, with the assigned teacher resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    #[serde(flatten)]
    pub student: Student,
    /// Short name of the assigned teacher, `None` when unassigned or unknown
    pub teacher_name: Option<String>,
    pub status_label: &'static str,
}

/// Counters shown above the student table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub paused: usize,
}

/// Student service
#[derive(Debug, Clone)]
pub struct StudentService {
    store: CrmStore,
}

impl StudentService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    /// Table rows, optionally filtered by name, email or DNI
    pub async fn rows(&self, search: Option<&str>) -> Vec<StudentRow> {
        self.store
            .read(|data| {
                data.students
                    .iter()
                    .filter(|s| search.map_or(true, |q| matches_search(s, q)))
                    .map(|s| row(data, s))
                    .collect()
            })
            .await
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Student> {
        self.store.get(id).await
    }

    pub async fn summary(&self) -> StudentSummary {
        self.store.read(|data| summarize(&data.students)).await
    }

    /// Create a student; raises an enrollment notification in the same write
    pub async fn create(&self, form: StudentForm) -> ServiceResult<Student> {
        let clock = self.store.clock();
        let student = build(form, None, clock.today());
        student.validate()?;

        let notification = Notification::enrollment(
            &student.name,
            &student.license.to_string(),
            clock.now_utc(),
        );

        let stored = student.clone();
        self.store
            .mutate(move |data| {
                data.students.push(stored);
                data.notifications.insert(0, notification);
                Ok::<_, ServiceError>(())
            })
            .await?;

        logging::log_record_saved(Student::KIND, &student.id, true);
        Ok(student)
    }

    /// Replace the form fields of an existing student
    pub async fn update(&self, id: &str, form: StudentForm) -> ServiceResult<Student> {
        self.store
            .replace(id, |existing: &Student| {
                Ok(build(form, Some(existing), existing.enrollment_date))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<Student> {
        self.store.remove(id).await
    }
}

/// Build a record from the form; progress, class count, documents and
/// enrollment date come from `existing` or start empty
fn build(form: StudentForm, existing: Option<&Student>, enrollment_date: NaiveDate) -> Student {
    Student {
        id: existing.map_or_else(new_id, |s| s.id.clone()),
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        dni: form.dni.trim().to_uppercase(),
        birth_date: form.birth_date,
        address: form.address,
        photo: form.photo.or_else(|| existing.and_then(|s| s.photo.clone())),
        license: form.license,
        status: form.status,
        teacher_id: form.teacher_id.filter(|id| !id.trim().is_empty()),
        theoretical_progress: existing.map_or(0, |s| s.theoretical_progress),
        practical_progress: existing.map_or(0, |s| s.practical_progress),
        practical_classes: existing.map_or(0, |s| s.practical_classes),
        observations: form.observations,
        documents: existing.map(|s| s.documents.clone()).unwrap_or_default(),
        enrollment_date,
        exam_date: form.exam_date,
    }
}

fn row(data: &CrmData, student: &Student) -> StudentRow {
    let teacher_name = student
        .teacher_id
        .as_deref()
        .and_then(|id| data.find::<Teacher>(id))
        .map(Teacher::short_name);

    StudentRow {
        student: student.clone(),
        teacher_name,
        status_label: student.status.label(),
    }
}

fn matches_search(student: &Student, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || [&student.name, &student.email, &student.dni]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
}

pub fn summarize(students: &[Student]) -> StudentSummary {
    let count = |status: StudentStatus| students.iter().filter(|s| s.status == status).count();
    StudentSummary {
        total: students.len(),
        active: count(StudentStatus::Activo),
        completed: count(StudentStatus::Completado),
        paused: count(StudentStatus::Pausado),
    }
}
