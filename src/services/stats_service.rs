//! Stats Service
//!
//! Derived numbers for the dashboard, the statistics page and the progress
//! tracking page. Nothing here is stored; every figure is computed on read.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::database::CrmData;
use crate::models::{
    ClassStatus, LicenseType, PaymentStatus, Scheduled, StudentStatus, Teacher,
};
use crate::services::schedule_service::{
    practical_view, teacher_name, weekday_label, PracticalClassView,
};
use crate::services::store::CrmStore;
use crate::services::time_provider::{month_start, working_week};

/// Scheduled classes listed on the dashboard
pub const UPCOMING_LIMIT: usize = 5;

/// Which class list feeds the weekly chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSource {
    #[default]
    Practicas,
    Teoricas,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    pub day: &'static str,
    pub date: NaiveDate,
    pub classes: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_students: usize,
    pub enrolled_this_month: usize,
    /// Percent growth of active students over last month's base
    pub growth_rate: i64,
    pub active_teachers: usize,
    pub today_classes: usize,
    /// Count of payments still owed (pending or overdue)
    pub pending_payments: usize,
    pub pending_amount: f64,
    pub unread_notifications: usize,
    pub weekly: Vec<DayCount>,
    pub upcoming: Vec<PracticalClassView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseShare {
    pub license: LicenseType,
    pub name: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPerformance {
    pub teacher_id: String,
    pub name: String,
    pub classes_this_month: u32,
    pub success_rate: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_students: usize,
    pub active_students: usize,
    pub completed_students: usize,
    pub success_rate: u32,
    pub total_practical_classes: usize,
    pub total_revenue: f64,
    pub license_distribution: Vec<LicenseShare>,
    pub teacher_performance: Vec<TeacherPerformance>,
}

/// Progress card of an active student
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCard {
    pub student_id: String,
    pub name: String,
    pub initials: String,
    pub dni: String,
    pub license: LicenseType,
    pub theoretical_progress: u8,
    pub practical_progress: u8,
    pub practical_classes: u32,
    pub teacher_name: Option<String>,
}

/// Stats service
#[derive(Debug, Clone)]
pub struct StatsService {
    store: CrmStore,
}

impl StatsService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    pub async fn dashboard(&self, source: ChartSource) -> DashboardStats {
        let today = self.store.clock().today();
        self.store.read(|data| dashboard(data, today, source)).await
    }

    pub async fn overview(&self) -> OverviewStats {
        self.store.read(overview).await
    }

    pub async fn progress(&self) -> Vec<ProgressCard> {
        self.store.read(progress).await
    }
}

/// Growth of `active` over the base it had before this month's enrollments
///
/// Returns 100 when there was no base to compare with.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn growth_rate(active: usize, enrolled_this_month: usize) -> i64 {
    let active = active as i64;
    let previous = active - enrolled_this_month as i64;
    if previous <= 0 {
        return 100;
    }
    (((active - previous) as f64 / previous as f64) * 100.0).round() as i64
}

/// Completed over completed plus dropped, as a rounded percentage
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn success_rate(completed: usize, dropped: usize) -> u32 {
    if completed == 0 {
        return 0;
    }
    (completed as f64 / (completed + dropped) as f64 * 100.0).round() as u32
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Empty when today's week runs off the calendar
fn weekly_counts<C: Scheduled>(classes: &[C], today: NaiveDate) -> Vec<DayCount> {
    working_week(today)
        .into_iter()
        .flatten()
        .map(|date| DayCount {
            day: weekday_label(date.weekday()),
            date,
            classes: classes.iter().filter(|c| c.date() == date).count(),
        })
        .collect()
}

fn dashboard(data: &CrmData, today: NaiveDate, source: ChartSource) -> DashboardStats {
    let active_students = data.students.iter().filter(|s| s.is_active()).count();
    let since = month_start(today);
    let enrolled_this_month = data
        .students
        .iter()
        .filter(|s| s.enrollment_date >= since)
        .count();

    let owed: Vec<_> = data
        .payments
        .iter()
        .filter(|p| matches!(p.status, PaymentStatus::Pendiente | PaymentStatus::Vencido))
        .collect();

    let weekly = match source {
        ChartSource::Practicas => weekly_counts(&data.practical_classes, today),
        ChartSource::Teoricas => weekly_counts(&data.theoretical_classes, today),
    };

    DashboardStats {
        active_students,
        enrolled_this_month,
        growth_rate: growth_rate(active_students, enrolled_this_month),
        active_teachers: data.teachers.iter().filter(|t| t.active).count(),
        today_classes: data
            .practical_classes
            .iter()
            .filter(|c| c.date == today)
            .count(),
        pending_payments: owed.len(),
        pending_amount: owed.iter().map(|p| p.amount).sum(),
        unread_notifications: data.notifications.iter().filter(|n| !n.read).count(),
        weekly,
        upcoming: data
            .practical_classes
            .iter()
            .filter(|c| c.status == ClassStatus::Programada)
            .take(UPCOMING_LIMIT)
            .map(|c| practical_view(data, c))
            .collect(),
    }
}

fn overview(data: &CrmData) -> OverviewStats {
    let students = &data.students;
    let count = |status: StudentStatus| students.iter().filter(|s| s.status == status).count();
    let completed = count(StudentStatus::Completado);

    let license_distribution = LicenseType::iter()
        .map(|license| {
            let count = students.iter().filter(|s| s.license == license).count();
            LicenseShare {
                license,
                name: license.display_name(),
                count,
                percentage: percentage(count, students.len()),
            }
        })
        .filter(|share| share.count > 0)
        .collect();

    OverviewStats {
        total_students: students.len(),
        active_students: count(StudentStatus::Activo),
        completed_students: completed,
        success_rate: success_rate(completed, count(StudentStatus::Baja)),
        total_practical_classes: data.practical_classes.len(),
        total_revenue: data
            .payments
            .iter()
            .filter(|p| p.status.is_paid())
            .map(|p| p.amount)
            .sum(),
        license_distribution,
        teacher_performance: data.teachers.iter().map(performance).collect(),
    }
}

fn performance(teacher: &Teacher) -> TeacherPerformance {
    TeacherPerformance {
        teacher_id: teacher.id.clone(),
        name: teacher.short_name(),
        classes_this_month: teacher.stats.this_month,
        success_rate: teacher.stats.success_rate,
    }
}

fn progress(data: &CrmData) -> Vec<ProgressCard> {
    data.students
        .iter()
        .filter(|s| s.is_active())
        .map(|s| ProgressCard {
            student_id: s.id.clone(),
            name: s.name.clone(),
            initials: crate::models::initials(&s.name),
            dni: s.dni.clone(),
            license: s.license,
            theoretical_progress: s.theoretical_progress,
            practical_progress: s.practical_progress,
            practical_classes: s.practical_classes,
            teacher_name: s.teacher_id.as_deref().map(|id| teacher_name(data, id)),
        })
        .collect()
}
