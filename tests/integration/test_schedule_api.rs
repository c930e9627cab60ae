use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::crm_integration_utils::TestApp;

#[tokio::test]
async fn test_practical_week_agenda() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let week: Value = app
        .server
        .get("/api/classes/practical/week")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(week["weekStart"], "2025-01-06");
    assert_eq!(week["weekEnd"], "2025-01-10");
    assert_eq!(week["days"].as_array().unwrap().len(), 5);

    let wednesday = &week["days"][2];
    assert_eq!(wednesday["label"], "Mié");
    assert_eq!(wednesday["classes"][0]["studentName"], "Ana Martínez");
    assert_eq!(wednesday["classes"][0]["vehicle"], "Volkswagen Golf (8899 LLR)");

    let next: Value = app
        .server
        .get("/api/classes/practical/week")
        .add_query_param("weeks", 1)
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(next["weekStart"], "2025-01-13");
    assert!(next["days"]
        .as_array()
        .unwrap()
        .iter()
        .all(|day| day["classes"].as_array().unwrap().is_empty()));
}

#[tokio::test]
async fn test_practical_class_defaults_to_one_hour() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let created = app
        .server
        .post("/api/classes/practical")
        .authorization_bearer(&token)
        .json(&json!({
            "studentId": "1",
            "teacherId": "1",
            "vehicleId": "1",
            "date": "2025-01-09",
            "startTime": "12:00"
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let class: Value = created.json();
    assert_eq!(class["endTime"], "13:00");
    assert_eq!(class["status"], "programada");

    app.server
        .post("/api/classes/practical")
        .authorization_bearer(&token)
        .json(&json!({
            "studentId": "1",
            "teacherId": "1",
            "vehicleId": "1",
            "date": "2025-01-09",
            "startTime": "25:00"
        }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let id = class["id"].as_str().unwrap();
    app.server
        .delete(&format!("/api/classes/practical/{id}"))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_theory_agenda_is_sorted_by_start_time() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let created: Value = app
        .server
        .post("/api/classes/theoretical")
        .authorization_bearer(&token)
        .json(&json!({
            "teacherId": "1",
            "date": "2025-01-08",
            "startTime": "09:00",
            "topic": "Normas de Circulación"
        }))
        .await
        .json();
    assert_eq!(created["endTime"], "11:00");
    assert_eq!(created["attendees"], json!([]));

    let week: Value = app
        .server
        .get("/api/classes/theoretical/week")
        .add_query_param("date", "2025-01-08")
        .authorization_bearer(&token)
        .await
        .json();
    let classes = week["days"][2]["classes"].as_array().unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0]["startTime"], "09:00");
    assert_eq!(classes[1]["startTime"], "17:00");
    assert_eq!(classes[1]["attendeeCount"], 1);
}

#[tokio::test]
async fn test_form_options() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let options: Value = app
        .server
        .get("/api/classes/practical/options")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(options["students"][0]["label"], "Ana Martínez");
    assert_eq!(options["vehicles"][0]["label"], "Volkswagen Golf (8899 LLR)");
    assert_eq!(options["timeSlots"].as_array().unwrap().len(), 9);

    let options: Value = app
        .server
        .get("/api/classes/theoretical/options")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(options["teachers"].as_array().unwrap().len(), 1);
    assert_eq!(options["topics"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let stats: Value = app
        .server
        .get("/api/stats/dashboard")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(stats["activeStudents"], 1);
    assert_eq!(stats["todayClasses"], 1);
    assert_eq!(stats["unreadNotifications"], 1);
    assert_eq!(stats["weekly"][2]["classes"], 1);
    assert_eq!(stats["upcoming"].as_array().unwrap().len(), 1);

    let theory: Value = app
        .server
        .get("/api/stats/dashboard")
        .add_query_param("chart", "teoricas")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(theory["weekly"][2]["classes"], 1);
}

#[tokio::test]
async fn test_overview_and_progress() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let overview: Value = app
        .server
        .get("/api/stats/overview")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(overview["totalStudents"], 1);
    assert_eq!(overview["totalRevenue"], 150.0);
    assert_eq!(overview["licenseDistribution"][0]["license"], "B");
    assert_eq!(overview["licenseDistribution"][0]["percentage"], 100);

    let progress: Value = app
        .server
        .get("/api/stats/progress")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(progress[0]["name"], "Ana Martínez");
    assert_eq!(progress[0]["theoreticalProgress"], 45);
    assert_eq!(progress[0]["teacherName"], "Roberto Gómez");
}

#[tokio::test]
async fn test_week_far_outside_calendar_is_unprocessable() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    for path in ["/api/classes/practical/week", "/api/classes/theoretical/week"] {
        let response = app
            .server
            .get(path)
            .add_query_param("weeks", 100_000_000)
            .authorization_bearer(&token)
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["error"], "ValidationError");
    }

    // The server keeps answering afterwards
    app.server
        .get("/api/classes/practical/week")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_update_after_delete_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    app.server
        .delete("/api/classes/practical/1")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .put("/api/classes/practical/1")
        .authorization_bearer(&token)
        .json(&json!({
            "studentId": "1",
            "teacherId": "1",
            "vehicleId": "1",
            "date": "2025-01-09",
            "startTime": "12:00"
        }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let classes: Value = app
        .server
        .get("/api/classes/practical")
        .authorization_bearer(&token)
        .await
        .json();
    assert!(classes.as_array().unwrap().is_empty());
}
