use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::crm_integration_utils::{student_form, TestApp};

#[tokio::test]
async fn test_student_lifecycle() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let created = app
        .server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&student_form("Lucía Pérez", "87654321x"))
        .await;
    created.assert_status(StatusCode::CREATED);
    let student: Value = created.json();
    let id = student["id"].as_str().unwrap().to_string();
    assert_eq!(student["dni"], "87654321X");
    assert_eq!(student["theoreticalProgress"], 0);
    assert_eq!(student["enrollmentDate"], "2025-01-08");

    let rows: Value = app
        .server
        .get("/api/students")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[1]["teacherName"], "Roberto Gómez");
    assert_eq!(rows[1]["statusLabel"], "Activo");

    let mut update = student_form("Lucía Pérez", "87654321X");
    update["status"] = json!("pausado");
    let updated: Value = app
        .server
        .put(&format!("/api/students/{id}"))
        .authorization_bearer(&token)
        .json(&update)
        .await
        .json();
    assert_eq!(updated["status"], "pausado");

    let summary: Value = app
        .server
        .get("/api/students/summary")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["paused"], 1);

    app.server
        .delete(&format!("/api/students/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .get(&format!("/api/students/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_search_and_validation() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let found: Value = app
        .server
        .get("/api/students")
        .add_query_param("search", "martínez")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(found.as_array().unwrap().len(), 1);

    let response = app
        .server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&student_form("Lucía Pérez", "123"))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn test_enrollment_raises_notification() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    app.server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&student_form("Lucía Pérez", "87654321X"))
        .await
        .assert_status(StatusCode::CREATED);

    let notifications: Value = app
        .server
        .get("/api/notifications")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(notifications[0]["title"], "Nueva Matriculación");

    let unread: Value = app
        .server
        .get("/api/notifications/unread-count")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(unread["unread"], 2);

    let marked: Value = app
        .server
        .post("/api/notifications/read-all")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(marked["updated"], 2);

    app.server
        .post("/api/notifications/missing/read")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_teacher_availability() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let created = app
        .server
        .post("/api/teachers")
        .authorization_bearer(&token)
        .json(&json!({
            "name": "Marta Sanz",
            "email": "marta@autoescuelalaroca.com",
            "phone": "633444555",
            "role": "teoricas"
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let teacher: Value = created.json();
    assert_eq!(teacher["active"], true);
    let id = teacher["id"].as_str().unwrap().to_string();

    let updated: Value = app
        .server
        .put(&format!("/api/teachers/{id}/availability"))
        .authorization_bearer(&token)
        .json(&json!({ "monday": [{ "start": "09:00", "end": "13:00" }] }))
        .await
        .json();
    assert_eq!(updated["availability"]["monday"][0]["end"], "13:00");

    app.server
        .put(&format!("/api/teachers/{id}/availability"))
        .authorization_bearer(&token)
        .json(&json!({ "monday": [{ "start": "13:00", "end": "09:00" }] }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let cards: Value = app
        .server
        .get("/api/teachers")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(cards.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_itv_alerts() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    app.server
        .post("/api/vehicles")
        .authorization_bearer(&token)
        .json(&json!({
            "brand": "Seat",
            "model": "Ibiza",
            "plate": "1234 abc",
            "year": 2020,
            "itvDate": "2025-02-01",
            "insuranceDate": "2025-06-30",
            "active": true
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let alerts: Value = app
        .server
        .get("/api/vehicles/itv-alerts")
        .authorization_bearer(&token)
        .await
        .json();
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["plate"], "1234 ABC");
    assert_eq!(alerts[0]["daysUntilItv"], 24);

    let fleet: Value = app
        .server
        .get("/api/vehicles")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(fleet["activeCount"], 2);
}

#[tokio::test]
async fn test_payments_and_summary() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let created = app
        .server
        .post("/api/payments")
        .authorization_bearer(&token)
        .json(&json!({
            "studentId": "1",
            "amount": 300.0,
            "concept": "Bono 10 prácticas",
            "status": "pendiente"
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let payment: Value = created.json();
    assert_eq!(payment["invoiceNumber"], "F-2025-0002");
    assert_eq!(payment["dueDate"], "2025-01-23");

    let summary: Value = app
        .server
        .get("/api/payments/summary")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(summary["totalPaid"], 150.0);
    assert_eq!(summary["totalPending"], 300.0);
    assert_eq!(summary["pendingCount"], 1);

    let rows: Value = app
        .server
        .get("/api/payments")
        .add_query_param("search", "bono")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["studentName"], "Ana Martínez");
}

#[tokio::test]
async fn test_overdue_payments_in_summary() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    app.server
        .post("/api/payments")
        .authorization_bearer(&token)
        .json(&json!({
            "studentId": "1",
            "amount": 80.0,
            "concept": "Examen práctico",
            "status": "vencido"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let summary: Value = app
        .server
        .get("/api/payments/summary")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(summary["totalOverdue"], 80.0);
    assert_eq!(summary["overdueCount"], 1);
    assert_eq!(summary["overdue"][0]["studentName"], "Ana Martínez");
    assert_eq!(summary["overdue"][0]["statusLabel"], "Vencido");
    assert_eq!(summary["chart"][1]["name"], "Vencido");
    assert_eq!(summary["chart"][1]["value"], 80.0);
}

#[tokio::test]
async fn test_documents() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let uploaded: Value = app
        .server
        .post("/api/documents")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Horario Enero.xlsx", "sizeBytes": 358400 }))
        .await
        .json();
    assert_eq!(uploaded["type"], "XLSX");

    app.server
        .delete("/api/documents/1")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let documents: Value = app
        .server
        .get("/api/documents")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(documents.as_array().unwrap().len(), 4);
}
