//! Demo data for a fresh install
//!
//! One record of each kind, dated around `today` so the dashboard has
//! something to show on the first day.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::database::CrmData;
use crate::models::{
    ClassStatus, LicenseType, Notification, NotificationKind, Payment, PaymentStatus,
    PracticalClass, SchoolDocument, Student, StudentStatus, Teacher, TeacherRole, TeacherStats,
    TheoreticalClass, TimeSlot, Vehicle, WeeklyAvailability,
};

/// Collections with no records at all; used when demo data is turned off
pub fn empty_data() -> CrmData {
    CrmData::default()
}

pub fn demo_data(today: NaiveDate) -> CrmData {
    CrmData {
        students: vec![demo_student()],
        teachers: vec![demo_teacher()],
        vehicles: vec![demo_vehicle()],
        practical_classes: vec![PracticalClass {
            id: "1".to_string(),
            student_id: "1".to_string(),
            teacher_id: "1".to_string(),
            vehicle_id: "1".to_string(),
            date: today,
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            status: ClassStatus::Programada,
            notes: "Práctica de estacionamiento.".to_string(),
            rating: None,
        }],
        theoretical_classes: vec![TheoreticalClass {
            id: "1".to_string(),
            teacher_id: "1".to_string(),
            date: today,
            start_time: "17:00".to_string(),
            end_time: "18:00".to_string(),
            topic: "Señales de Tráfico".to_string(),
            attendees: vec!["1".to_string()],
            status: ClassStatus::Programada,
        }],
        payments: vec![Payment {
            id: "1".to_string(),
            student_id: "1".to_string(),
            amount: 150.0,
            concept: "Matrícula Permiso B".to_string(),
            date: date(2024, 11, 1),
            status: PaymentStatus::Pagado,
            due_date: None,
            invoice_number: Some("FE-2024-001".to_string()),
        }],
        notifications: vec![Notification {
            id: "1".to_string(),
            title: "Nueva Matriculación".to_string(),
            message: "Ana Martínez se ha matriculado en el permiso B.".to_string(),
            kind: NotificationKind::Success,
            read: false,
            created_at: at_start_of(today),
            link: Some("/alumnos".to_string()),
        }],
        documents: demo_documents(),
        auth: crate::models::AuthRecord::default(),
    }
}

fn demo_teacher() -> Teacher {
    let split_day = [TimeSlot::new("09:00", "14:00"), TimeSlot::new("16:00", "20:00")];
    Teacher {
        id: "1".to_string(),
        name: "Roberto Gómez".to_string(),
        email: "roberto@autoescuelalaroca.com".to_string(),
        phone: "600111222".to_string(),
        photo: None,
        role: TeacherRole::Ambas,
        availability: WeeklyAvailability {
            friday: vec![TimeSlot::new("09:00", "14:00")],
            ..WeeklyAvailability::weekdays(&split_day)
        },
        active: true,
        created_at: at_start_of(date(2024, 1, 10)),
        stats: TeacherStats {
            total_classes: 150,
            this_month: 24,
            success_rate: 95,
            active_students: 5,
        },
    }
}

fn demo_student() -> Student {
    Student {
        id: "1".to_string(),
        name: "Ana Martínez".to_string(),
        email: "ana.martinez@email.com".to_string(),
        phone: "611222333".to_string(),
        dni: "12345678Z".to_string(),
        birth_date: date(2004, 5, 20),
        address: "Calle Mayor 10, Guadalajara".to_string(),
        photo: None,
        license: LicenseType::B,
        status: StudentStatus::Activo,
        teacher_id: Some("1".to_string()),
        theoretical_progress: 45,
        practical_progress: 15,
        practical_classes: 3,
        observations: "Comienza prácticas. Atenta pero insegura en rotondas.".to_string(),
        documents: vec![],
        enrollment_date: date(2024, 11, 1),
        exam_date: None,
    }
}

fn demo_vehicle() -> Vehicle {
    Vehicle {
        id: "1".to_string(),
        brand: "Volkswagen".to_string(),
        model: "Golf".to_string(),
        plate: "8899 LLR".to_string(),
        year: 2023,
        itv_date: date(2027, 1, 15),
        insurance_date: date(2025, 1, 15),
        active: true,
    }
}

fn demo_documents() -> Vec<SchoolDocument> {
    [
        ("1", "Reglamento General.pdf", "2.4 MB", date(2024, 12, 1)),
        ("2", "Tasas DGT 2025.pdf", "1.1 MB", date(2024, 11, 28)),
        ("3", "Hoja de Reclamaciones.doc", "0.5 MB", date(2024, 10, 15)),
        ("4", "Contrato Alumno Tipo.pdf", "3.2 MB", date(2024, 9, 1)),
    ]
    .into_iter()
    .map(|(id, name, size, date)| SchoolDocument {
        id: id.to_string(),
        name: name.to_string(),
        kind: SchoolDocument::kind_from_name(name),
        size: size.to_string(),
        date,
    })
    .collect()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at_start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
