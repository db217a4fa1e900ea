use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use labreq_api::AppState;
use labreq_auth::jwt::TokenVerifier;
use labreq_core::models::requisition::Requisition;
use labreq_core::schema::SectionId;
use labreq_storage::memory::MemoryDocumentStore;
use labreq_storage::repository::RequisitionRepository;

const SECRET: &[u8] = b"api-test-secret";

fn app() -> Router {
    let state = AppState::new(
        RequisitionRepository::new(MemoryDocumentStore::new()),
        TokenVerifier::hs256(SECRET, None, None),
    );
    labreq_api::router(state)
}

fn token(sub: &str) -> String {
    let now = jiff::Timestamp::now().as_second();
    let claims = json!({ "sub": sub, "iat": now, "exp": now + 3600 });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn patient_only() -> Requisition {
    let mut r = Requisition::new();
    for (key, value) in [
        ("clinicName", "Harbour Clinic"),
        ("phn", "9123456789"),
        ("chartNumber", "C-1001"),
        ("lastName", "Okafor"),
        ("firstName", "Ada"),
        ("collectionDate", "2024-05-02"),
        ("collectionTime", "08:30"),
    ] {
        r.set_text(SectionId::PatientInfo, key, value).unwrap();
    }
    r.set_text(SectionId::RequestingPhysician, "firstName", "Lee").unwrap();
    r.set_text(SectionId::RequestingPhysician, "lastName", "Chen").unwrap();
    r
}

fn complete() -> Value {
    let mut r = patient_only();
    for (section, key) in [
        (SectionId::TherapeuticDrugs, "digi"),
        (SectionId::Hematology, "cbc"),
        (SectionId::Chemistry, "urea"),
        (SectionId::Lipids, "trig"),
        (SectionId::Biochemistry, "alb"),
        (SectionId::Prenatal, "preim"),
        (SectionId::UrineTests, "ua"),
        (SectionId::Hepatitis, "hcab"),
        (SectionId::Microbiology, "throatCAndS"),
    ] {
        r.set_flag(section, key, true).unwrap();
    }
    r.set_text(SectionId::Microbiology, "source", "Throat").unwrap();
    r.to_value()
}

fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user)));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, req).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, user: &str) -> String {
    let (status, body) =
        send_json(app, request("POST", "/requisitions", Some(user), Some(complete()))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send_json(&app(), request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn schema_lists_sections_and_steps() {
    let (status, body) = send_json(&app(), request("GET", "/schema", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sections"].as_array().unwrap().len(), 12);

    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 11);
    assert_eq!(steps[0]["id"], "patient_info");
    assert_eq!(steps[0]["sections"], json!(["patientInfo", "requestingPhysician"]));
    assert_eq!(steps[10]["id"], "review");
}

#[tokio::test]
async fn step_validation_reports_messages() {
    let app = app();
    let body = json!({ "chemistry": { "crcle": true, "weight": "  " } });
    let (status, result) =
        send_json(&app, request("POST", "/steps/chemistry/validate", None, Some(body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["valid"], false);
    assert_eq!(
        result["errors"][0]["message"],
        "Weight is required when Creatinine Clearance is selected"
    );

    let body = json!({ "hematology": { "cbc": true } });
    let (_, result) =
        send_json(&app, request("POST", "/steps/hematology/validate", None, Some(body))).await;
    assert_eq!(result["valid"], true);
    assert_eq!(result["errors"], json!([]));
}

#[tokio::test]
async fn requisitions_require_a_token() {
    let app = app();
    let (status, body) = send_json(&app, request("GET", "/requisitions", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing bearer token");

    let req = Request::builder()
        .uri("/requisitions")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/requisitions")
        .header(header::AUTHORIZATION, format!("bearer {}", token("user-1")))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn incomplete_record_is_rejected_before_saving() {
    let app = app();
    let (status, body) = send_json(
        &app,
        request("POST", "/requisitions", Some("user-1"), Some(patient_only().to_value())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors[0]["step"], "therapeutic_drugs");
    assert_eq!(errors[0]["message"], "Please select at least one therapeutic drug test");

    let (_, list) = send_json(&app, request("GET", "/requisitions", Some("user-1"), None)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn created_record_is_visible_to_its_owner_only() {
    let app = app();
    let id = create(&app, "user-1").await;

    let (status, record) =
        send_json(&app, request("GET", &format!("/requisitions/{id}"), Some("user-1"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["userId"], "user-1");
    assert_eq!(record["status"], "draft");
    assert_eq!(record["formData"]["hematology"]["cbc"], true);
    assert_eq!(record["formData"]["patientInfo"]["lastName"], "Okafor");

    let (_, list) = send_json(&app, request("GET", "/requisitions", Some("user-1"), None)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], id.as_str());

    let (status, _) =
        send_json(&app, request("GET", &format!("/requisitions/{id}"), Some("user-2"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = send_json(&app, request("GET", "/requisitions", Some("user-2"), None)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn update_merges_and_sets_status() {
    let app = app();
    let id = create(&app, "user-1").await;

    let update = json!({
        "formData": { "lipids": { "lipid": true } },
        "status": "completed"
    });
    let (status, record) = send_json(
        &app,
        request("PUT", &format!("/requisitions/{id}"), Some("user-1"), Some(update.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["status"], "completed");
    assert_eq!(record["formData"]["lipids"]["trig"], true);

    let (status, _) = send_json(
        &app,
        request("PUT", &format!("/requisitions/{id}"), Some("user-2"), Some(update)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_gone() {
    let app = app();
    let id = create(&app, "user-1").await;
    let uri = format!("/requisitions/{id}");

    let (status, _) = send(&app, request("DELETE", &uri, Some("user-2"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, request("DELETE", &uri, Some("user-1"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send(&app, request("GET", &uri, Some("user-1"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, request("DELETE", &uri, Some("user-1"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pdf_download_has_requisition_filename() {
    let app = app();
    let id = create(&app, "user-1").await;

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/requisitions/{id}/pdf"), Some("user-1"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"SHA-requisition-"));
    assert!(disposition.ends_with(".pdf\""));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn summary_is_plain_text() {
    let app = app();
    let id = create(&app, "user-1").await;

    let (status, body) = send(
        &app,
        request("GET", &format!("/requisitions/{id}/summary"), Some("user-1"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("Name: Okafor, Ada"));
    assert!(text.contains("Requesting Physician: Chen, Lee"));
    assert!(text.contains("Source/Site: Throat"));
}
