//! Schedule Service
//!
//! Weekly agendas and forms for practical and theoretical classes.
//!
//! The agenda is a plain filter-and-group over the stored classes: no overlap
//! detection, no recurrence.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::database::CrmData;
use crate::models::time_slot::{add_minutes, validate_time};
use crate::models::{
    new_id, ClassStatus, PracticalClass, Scheduled, StatusVariant, Student, Teacher,
    TheoreticalClass, ValidationError, Vehicle, UNKNOWN_NAME,
};
use crate::services::store::CrmStore;
use crate::services::time_provider::working_week;
use crate::services::ServiceResult;

/// End time a theory session gets when the form leaves it blank
pub const DEFAULT_THEORY_END: &str = "11:00";

/// Length of a practical class when no end time is given
pub const PRACTICAL_CLASS_MINUTES: u32 = 60;

/// Start times offered by the practical class form
pub const PRACTICAL_TIME_SLOTS: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "17:00", "18:00", "19:00", "20:00",
];

/// Start times offered by the theory class form
pub const THEORY_TIME_SLOTS: [&str; 6] = ["10:00", "11:00", "16:00", "17:00", "18:00", "19:00"];

/// Topics offered by the theory class form
pub const THEORY_TOPICS: [&str; 6] = [
    "Señales de Tráfico",
    "Normas de Circulación",
    "Seguridad Vial",
    "Mecánica Básica",
    "Primeros Auxilios",
    "Documentación y Puntos",
];

/// Short Spanish weekday name, as shown on agenda columns and charts
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lun",
        Weekday::Tue => "Mar",
        Weekday::Wed => "Mié",
        Weekday::Thu => "Jue",
        Weekday::Fri => "Vie",
        Weekday::Sat => "Sáb",
        Weekday::Sun => "Dom",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalClassForm {
    pub student_id: String,
    pub teacher_id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: Option<ClassStatus>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheoreticalClassForm {
    pub teacher_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub topic: String,
    #[serde(default)]
    pub status: Option<ClassStatus>,
}

/// Practical class with its references resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalClassView {
    #[serde(flatten)]
    pub class: PracticalClass,
    pub student_name: String,
    pub teacher_name: String,
    /// Brand, model and plate; `None` when the vehicle is unknown
    pub vehicle: Option<String>,
    pub status_label: &'static str,
    pub status_variant: StatusVariant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TheoreticalClassView {
    #[serde(flatten)]
    pub class: TheoreticalClass,
    pub teacher_name: String,
    pub attendee_count: usize,
    pub status_label: &'static str,
    pub status_variant: StatusVariant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaDay<V> {
    pub date: NaiveDate,
    pub label: &'static str,
    pub classes: Vec<V>,
}

/// Monday to Friday of one week
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekAgenda<V> {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<AgendaDay<V>>,
}

/// Entry of a select box in a class form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalFormOptions {
    pub students: Vec<Choice>,
    pub teachers: Vec<Choice>,
    pub vehicles: Vec<Choice>,
    pub time_slots: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TheoreticalFormOptions {
    pub teachers: Vec<Choice>,
    pub topics: Vec<&'static str>,
    pub time_slots: Vec<&'static str>,
}

/// Schedule service
#[derive(Debug, Clone)]
pub struct ScheduleService {
    store: CrmStore,
}

impl ScheduleService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    /// Monday..Friday of the reference week moved by whole weeks
    ///
    /// The reference defaults to today. Weeks outside the calendar chrono
    /// supports are rejected.
    fn week_days(
        &self,
        reference: Option<NaiveDate>,
        weeks: i64,
    ) -> ServiceResult<[NaiveDate; 5]> {
        let reference = reference.unwrap_or_else(|| self.store.clock().today());
        let out_of_range =
            || ValidationError::DateOutOfRange(format!("{reference} moved by {weeks} weeks"));

        let offset = Days::new(weeks.unsigned_abs().checked_mul(7).ok_or_else(out_of_range)?);
        let day = if weeks >= 0 {
            reference.checked_add_days(offset)
        } else {
            reference.checked_sub_days(offset)
        };
        let days = day.and_then(working_week).ok_or_else(out_of_range)?;
        Ok(days)
    }

    pub async fn practical_week(
        &self,
        reference: Option<NaiveDate>,
        weeks: i64,
    ) -> ServiceResult<WeekAgenda<PracticalClassView>> {
        let days = self.week_days(reference, weeks)?;
        let week = self
            .store
            .read(|data| agenda(&data.practical_classes, days, |c| practical_view(data, c)))
            .await;
        Ok(week)
    }

    /// Same grouping as the practical agenda, each day ordered by start time
    pub async fn theoretical_week(
        &self,
        reference: Option<NaiveDate>,
        weeks: i64,
    ) -> ServiceResult<WeekAgenda<TheoreticalClassView>> {
        let days = self.week_days(reference, weeks)?;
        let mut week = self
            .store
            .read(|data| agenda(&data.theoretical_classes, days, |c| theoretical_view(data, c)))
            .await;
        for day in &mut week.days {
            day.classes
                .sort_by(|a, b| a.class.start_time.cmp(&b.class.start_time));
        }
        Ok(week)
    }

    pub async fn practical_classes(&self) -> Vec<PracticalClassView> {
        self.store
            .read(|data| {
                data.practical_classes
                    .iter()
                    .map(|c| practical_view(data, c))
                    .collect()
            })
            .await
    }

    pub async fn theoretical_classes(&self) -> Vec<TheoreticalClassView> {
        self.store
            .read(|data| {
                data.theoretical_classes
                    .iter()
                    .map(|c| theoretical_view(data, c))
                    .collect()
            })
            .await
    }

    /// Active students, active teachers who drive, active vehicles
    pub async fn practical_options(&self) -> PracticalFormOptions {
        self.store
            .read(|data| PracticalFormOptions {
                students: data
                    .students
                    .iter()
                    .filter(|s| s.is_active())
                    .map(|s| Choice {
                        id: s.id.clone(),
                        label: s.name.clone(),
                    })
                    .collect(),
                teachers: data
                    .teachers
                    .iter()
                    .filter(|t| t.active && t.role.teaches_practical())
                    .map(teacher_choice)
                    .collect(),
                vehicles: data
                    .vehicles
                    .iter()
                    .filter(|v| v.active)
                    .map(|v| Choice {
                        id: v.id.clone(),
                        label: format!("{} ({})", v.display_name(), v.plate),
                    })
                    .collect(),
                time_slots: PRACTICAL_TIME_SLOTS.to_vec(),
            })
            .await
    }

    /// Teachers who give theory, active or not
    pub async fn theoretical_options(&self) -> TheoreticalFormOptions {
        self.store
            .read(|data| TheoreticalFormOptions {
                teachers: data
                    .teachers
                    .iter()
                    .filter(|t| t.role.teaches_theory())
                    .map(teacher_choice)
                    .collect(),
                topics: THEORY_TOPICS.to_vec(),
                time_slots: THEORY_TIME_SLOTS.to_vec(),
            })
            .await
    }

    pub async fn create_practical(&self, form: PracticalClassForm) -> ServiceResult<PracticalClass> {
        let class = practical_from_form(form, new_id())?;
        let (class, _) = self.store.upsert(class).await?;
        Ok(class)
    }

    pub async fn update_practical(
        &self,
        id: &str,
        form: PracticalClassForm,
    ) -> ServiceResult<PracticalClass> {
        self.store
            .replace(id, |existing: &PracticalClass| {
                practical_from_form(form, existing.id.clone())
            })
            .await
    }

    pub async fn delete_practical(&self, id: &str) -> ServiceResult<PracticalClass> {
        self.store.remove(id).await
    }

    /// New sessions start with no attendees
    pub async fn create_theoretical(
        &self,
        form: TheoreticalClassForm,
    ) -> ServiceResult<TheoreticalClass> {
        let class = theoretical_from_form(form, new_id(), Vec::new())?;
        let (class, _) = self.store.upsert(class).await?;
        Ok(class)
    }

    /// Attendees are kept from the stored session
    pub async fn update_theoretical(
        &self,
        id: &str,
        form: TheoreticalClassForm,
    ) -> ServiceResult<TheoreticalClass> {
        self.store
            .replace(id, |existing: &TheoreticalClass| {
                theoretical_from_form(form, existing.id.clone(), existing.attendees.clone())
            })
            .await
    }

    pub async fn delete_theoretical(&self, id: &str) -> ServiceResult<TheoreticalClass> {
        self.store.remove(id).await
    }
}

fn practical_from_form(form: PracticalClassForm, id: String) -> ServiceResult<PracticalClass> {
    validate_time(&form.start_time)?;
    let end_time = match form.end_time.filter(|t| !t.is_empty()) {
        Some(end_time) => end_time,
        None => default_end(
            &form.start_time,
            add_minutes(&form.start_time, PRACTICAL_CLASS_MINUTES),
        )?,
    };

    Ok(PracticalClass {
        id,
        student_id: form.student_id,
        teacher_id: form.teacher_id,
        vehicle_id: form.vehicle_id,
        date: form.date,
        start_time: form.start_time,
        end_time,
        status: form.status.unwrap_or_default(),
        notes: form.notes,
        rating: form.rating,
    })
}

fn theoretical_from_form(
    form: TheoreticalClassForm,
    id: String,
    attendees: Vec<String>,
) -> ServiceResult<TheoreticalClass> {
    validate_time(&form.start_time)?;
    let end_time = match form.end_time.filter(|t| !t.is_empty()) {
        Some(end_time) => end_time,
        None => default_end(&form.start_time, default_theory_end(&form.start_time))?,
    };

    Ok(TheoreticalClass {
        id,
        teacher_id: form.teacher_id,
        date: form.date,
        start_time: form.start_time,
        end_time,
        topic: form.topic.trim().to_string(),
        attendees,
        status: form.status.unwrap_or_default(),
    })
}

/// `11:00` for morning sessions; one hour after the start otherwise
fn default_theory_end(start_time: &str) -> String {
    if start_time < DEFAULT_THEORY_END {
        DEFAULT_THEORY_END.to_string()
    } else {
        add_minutes(start_time, 60)
    }
}

/// A derived end time is clamped to 23:59, which can leave no time after the start
fn default_end(start_time: &str, end_time: String) -> Result<String, ValidationError> {
    if end_time.as_str() > start_time {
        Ok(end_time)
    } else {
        Err(ValidationError::NoRoomBeforeMidnight(start_time.to_string()))
    }
}

/// Group `classes` into the given Monday..Friday
fn agenda<C: Scheduled, V>(
    classes: &[C],
    days: [NaiveDate; 5],
    view: impl Fn(&C) -> V,
) -> WeekAgenda<V> {
    WeekAgenda {
        week_start: days[0],
        week_end: days[4],
        days: days
            .iter()
            .map(|&date| AgendaDay {
                date,
                label: weekday_label(date.weekday()),
                classes: classes
                    .iter()
                    .filter(|c| c.date() == date)
                    .map(&view)
                    .collect(),
            })
            .collect(),
    }
}

fn teacher_choice(teacher: &Teacher) -> Choice {
    Choice {
        id: teacher.id.clone(),
        label: teacher.name.clone(),
    }
}

pub fn student_name(data: &CrmData, id: &str) -> String {
    data.find::<Student>(id)
        .map_or(UNKNOWN_NAME, |s| s.name.as_str())
        .to_string()
}

pub fn teacher_name(data: &CrmData, id: &str) -> String {
    data.find::<Teacher>(id)
        .map_or(UNKNOWN_NAME, |t| t.name.as_str())
        .to_string()
}

pub fn practical_view(data: &CrmData, class: &PracticalClass) -> PracticalClassView {
    PracticalClassView {
        student_name: student_name(data, &class.student_id),
        teacher_name: teacher_name(data, &class.teacher_id),
        vehicle: data
            .find::<Vehicle>(&class.vehicle_id)
            .map(|v| format!("{} ({})", v.display_name(), v.plate)),
        status_label: class.status.label(),
        status_variant: class.status.variant(),
        class: class.clone(),
    }
}

fn theoretical_view(data: &CrmData, class: &TheoreticalClass) -> TheoreticalClassView {
    TheoreticalClassView {
        teacher_name: teacher_name(data, &class.teacher_id),
        attendee_count: class.attendees.len(),
        status_label: class.status.label(),
        status_variant: class.status.variant(),
        class: class.clone(),
    }
}
