//! Integration tests for taxform-api endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - List endpoint with filters and pagination
//! - Create pipeline: schema rejection, model rejection, duplicate
//!   rejection, success path and persistence
//! - Update pipeline (no duplicate check)
//! - Report endpoint content-type/filename decision rule

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use std::io::Cursor;
use tower::util::ServiceExt; // for `oneshot` method
use taxform_api::{build_router, AppState};
use taxform_common::db::{connect_memory, init_schema};

/// Test helper: Create app over a fresh in-memory database
async fn setup_app() -> axum::Router {
    let pool = connect_memory().await.expect("in-memory pool");
    init_schema(&pool).await.expect("schema init");
    build_router(AppState::new(pool, 100))
}

/// Test helper: GET request with empty body
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: JSON request with body
fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: Extract raw bytes from response
async fn extract_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

fn tax_form_body(employee_id: i64, year: i64) -> Value {
    json!({
        "employeeId": employee_id,
        "calendarYear": year,
        "employeeName": format!("Employee {}", employee_id),
        "company": "Acme",
        "department": "Payroll",
        "date": "2024-02-15",
        "status": 1
    })
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "taxform-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// Create Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_create_returns_201_with_resolved_status() {
    let app = setup_app().await;

    let response = app
        .oneshot(json_request("POST", "/tax-forms", &tax_form_body(1, 2024)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["employeeId"], 1);
    assert_eq!(body["statusDesc"], "Single");
}

#[tokio::test]
async fn test_create_with_wrong_field_type_lists_that_field_and_persists_nothing() {
    let app = setup_app().await;

    let mut body = tax_form_body(2, 2024);
    body["employeeId"] = json!("two");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/tax-forms", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let errors = extract_json(response.into_body()).await;
    let issues = errors["errors"].as_array().expect("errors array");
    assert!(
        issues.iter().any(|i| i["path"] == "/employeeId"),
        "expected /employeeId issue, got {:?}",
        issues
    );

    let response = app.oneshot(get("/tax-forms")).await.unwrap();
    let records = extract_json(response.into_body()).await;
    assert_eq!(records.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_missing_required_field_is_rejected() {
    let app = setup_app().await;

    let mut body = tax_form_body(3, 2024);
    body.as_object_mut().unwrap().remove("company");

    let response = app
        .oneshot(json_request("POST", "/tax-forms", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_semantic_failure_joins_messages() {
    let app = setup_app().await;

    let mut body = tax_form_body(4, 2024);
    body["calendarYear"] = json!(1800);
    body["date"] = json!("February");

    let response = app
        .oneshot(json_request("POST", "/tax-forms", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let errors = extract_json(response.into_body()).await;
    let joined = errors["errors"].as_str().expect("joined message string");
    assert!(joined.contains("calendarYear"));
    assert!(joined.contains("date"));
}

#[tokio::test]
async fn test_duplicate_create_rejected_with_conflict_message() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/tax-forms", &tax_form_body(5, 2024)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/tax-forms", &tax_form_body(5, 2024)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let errors = extract_json(response.into_body()).await;
    assert_eq!(
        errors["errors"],
        "Employee has already registered for the current year."
    );

    let response = app.oneshot(get("/tax-forms")).await.unwrap();
    let records = extract_json(response.into_body()).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

// =============================================================================
// Update Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_update_returns_200_and_rewrites_record() {
    let app = setup_app().await;

    app.clone()
        .oneshot(json_request("POST", "/tax-forms", &tax_form_body(6, 2024)))
        .await
        .unwrap();

    let mut body = tax_form_body(6, 2024);
    body["status"] = json!(4);
    body["department"] = json!("Finance");

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/tax-forms", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = extract_json(response.into_body()).await;
    assert_eq!(updated["statusDesc"], "Deceased");

    let response = app.oneshot(get("/tax-forms?employeeId=6")).await.unwrap();
    let records = extract_json(response.into_body()).await;
    assert_eq!(records[0]["department"], "Finance");
}

#[tokio::test]
async fn test_update_has_no_duplicate_check() {
    let app = setup_app().await;

    app.clone()
        .oneshot(json_request("POST", "/tax-forms", &tax_form_body(7, 2024)))
        .await
        .unwrap();

    // Updating the same (employee, year) twice is fine
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("PUT", "/tax-forms", &tax_form_body(7, 2024)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// =============================================================================
// List Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = setup_app().await;

    for id in 1..=3 {
        app.clone()
            .oneshot(json_request("POST", "/tax-forms", &tax_form_body(id, 2024)))
            .await
            .unwrap();
    }
    app.clone()
        .oneshot(json_request("POST", "/tax-forms", &tax_form_body(1, 2023)))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/tax-forms?year=2024")).await.unwrap();
    let records = extract_json(response.into_body()).await;
    assert_eq!(records.as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(get("/tax-forms?employeeId=1"))
        .await
        .unwrap();
    let records = extract_json(response.into_body()).await;
    assert_eq!(records.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/tax-forms?year=2024&pageNumber=2&pageSize=2"))
        .await
        .unwrap();
    let records = extract_json(response.into_body()).await;
    assert_eq!(records.as_array().unwrap().len(), 1);

    let response = app
        .oneshot(get("/tax-forms?startDate=2024-01-01&endDate=2024-12-31"))
        .await
        .unwrap();
    let records = extract_json(response.into_body()).await;
    assert_eq!(records.as_array().unwrap().len(), 4);
}

// =============================================================================
// Report Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_report_single_employee_match_is_pdf_with_filename() {
    let app = setup_app().await;

    app.clone()
        .oneshot(json_request("POST", "/tax-forms", &tax_form_body(8, 2024)))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/tax-forms/report?employeeId=8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"TaxForm_8.pdf\""
    );

    let bytes = extract_bytes(response.into_body()).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_report_without_employee_filter_is_zip_with_one_entry_per_record() {
    let app = setup_app().await;

    for id in [3, 9] {
        app.clone()
            .oneshot(json_request("POST", "/tax-forms", &tax_form_body(id, 2024)))
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/tax-forms/report")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/zip"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"TaxFormFormReport.zip\""
    );

    let bytes = extract_bytes(response.into_body()).await;
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names, vec!["TaxForm_3.pdf", "TaxForm_9.pdf"]);
}

#[tokio::test]
async fn test_report_with_no_matches_is_valid_empty_zip() {
    let app = setup_app().await;

    let response = app.oneshot(get("/tax-forms/report")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/zip"
    );

    let bytes = extract_bytes(response.into_body()).await;
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    assert_eq!(archive.len(), 0);
}
