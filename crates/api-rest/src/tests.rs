use crate::{router, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use hms_core::store::MemoryStore;
use hms_core::CoreConfig;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    let cfg = CoreConfig::new("router-test-secret".into(), Duration::from_secs(5), None)
        .expect("valid config");
    router(AppState::new(Arc::new(cfg), Arc::new(MemoryStore::new())))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn signup_body(email: &str, phone: &str) -> Value {
    json!({
        "first_name": "Mary",
        "last_name": "Seacole",
        "password": "crimea-1855",
        "email": email,
        "phone": phone
    })
}

/// Signs a patient up, logs in, and returns the access token.
async fn login_token(app: &Router) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/patients/signup",
        None,
        Some(signup_body("mary@example.org", "555-1855")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/patients/login",
        None,
        Some(json!({ "email": "mary@example.org", "password": "crimea-1855" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("access token").to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(&app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "message": "HMS is alive" }));
}

#[tokio::test]
async fn test_signup_duplicate_and_login() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/signup",
        None,
        Some(signup_body("mary@example.org", "555-1855")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["inserted_id"].as_str().is_some());

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/signup",
        None,
        Some(signup_body("other@example.org", "555-1855")),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("this email or phone number already exists"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/login",
        None,
        Some(json!({ "email": "mary@example.org", "password": "crimea-1855" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body.get("password").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/login",
        None,
        Some(json!({ "email": "mary@example.org", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("login or password is incorrect"));
}

#[tokio::test]
async fn test_signup_validation_lists_fields() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/patients/signup",
        None,
        Some(json!({ "first_name": "M", "email": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("validation failed"));
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    for field in ["first_name", "last_name", "password", "email", "phone"] {
        assert!(fields.contains(&field), "missing {}", field);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/patients/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app();
    for uri in ["/patients", "/doctors", "/appoinments", "/prescriptions", "/invoices"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert!(body["error"].is_string());
    }

    let (status, _) = send(&app, Method::GET, "/doctors", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_legacy_token_header_is_accepted() {
    let app = app();
    let token = login_token(&app).await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/doctors")
        .header("token", token)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_issues_new_pair_and_rejects_access_token() {
    let app = app();
    let access = login_token(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/patients/refresh",
        None,
        Some(json!({ "refresh_token": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(
        &app,
        Method::POST,
        "/patients/login",
        None,
        Some(json!({ "email": "mary@example.org", "password": "crimea-1855" })),
    )
    .await;
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
    assert_ne!(body["refresh_token"].as_str(), Some(refresh.as_str()));

    let (status, _) = send(
        &app,
        Method::POST,
        "/patients/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_patient_can_only_update_own_record() {
    let app = app();
    let token = login_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/signup",
        None,
        Some(signup_body("florence@example.org", "555-1820")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let other_id = body["inserted_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/patients/{}", other_id),
        Some(&token),
        Some(json!({ "last_name": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, Method::GET, &format!("/patients/{}", other_id), Some(&token), None).await;
    assert_eq!(body["last_name"], json!("Seacole"));

    let (_, page) = send(&app, Method::GET, "/patients", Some(&token), None).await;
    let own_id = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["email"] == json!("mary@example.org"))
        .and_then(|p| p["patient_id"].as_str())
        .unwrap()
        .to_string();
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/patients/{}", own_id),
        Some(&token),
        Some(json!({ "last_name": "Grant" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched_count"], json!(1));
}

#[tokio::test]
async fn test_doctor_partial_update_round_trip() {
    let app = app();
    let token = login_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/doctors",
        Some(&token),
        Some(json!({ "name": "Dr Barry", "speciality": "surgery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["inserted_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/doctors/{}", id),
        Some(&token),
        Some(json!({ "speciality": "military surgery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched_count"], json!(1));

    let (status, body) = send(&app, Method::GET, &format!("/doctors/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Dr Barry"));
    assert_eq!(body["speciality"], json!("military surgery"));
    assert_eq!(body["doctor_id"], json!(id));
}

#[tokio::test]
async fn test_listing_pages_in_creation_order() {
    let app = app();
    let token = login_token(&app).await;

    let mut ids = Vec::new();
    for n in 1..=12 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/doctors",
            Some(&token),
            Some(json!({ "name": format!("Dr {}", n), "speciality": "general" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(body["inserted_id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/doctors?page=2&recordPerPage=5",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], json!(12));
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Dr 6", "Dr 7", "Dr 8", "Dr 9", "Dr 10"]);
    let page_ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["doctor_id"].as_str())
        .collect();
    assert_eq!(page_ids, ids[5..10].iter().map(String::as_str).collect::<Vec<_>>());

    let (_, body) = send(&app, Method::GET, "/doctors?recordPerPage=junk", Some(&token), None).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_appointment_with_unknown_doctor() {
    let app = app();
    let token = login_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/appointment",
        Some(&token),
        Some(json!({
            "appointment_date": "2031-06-01T10:00:00Z",
            "invoice_id": "inv-42",
            "doctor_id": "550e8400e29b41d4a716446655440000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("doctor not found"));

    let (_, body) = send(&app, Method::GET, "/appoinments", Some(&token), None).await;
    assert_eq!(body["total_count"], json!(0));
}

#[tokio::test]
async fn test_malformed_path_id_is_bad_request() {
    let app = app();
    let token = login_token(&app).await;
    let (status, _) = send(&app, Method::GET, "/invoices/not-an-id", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_record_is_generic_server_error() {
    let app = app();
    let token = login_token(&app).await;
    let (status, body) = send(
        &app,
        Method::GET,
        "/prescription/550e8400e29b41d4a716446655440000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("error occurred while fetching the prescription"));
}

#[tokio::test]
async fn test_prescription_span_rule() {
    let app = app();
    let token = login_token(&app).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/precription",
        Some(&token),
        Some(json!({
            "drugs": "quinine",
            "dosage": "daily",
            "start_date": "2001-01-01T00:00:00Z",
            "end_date": "2001-02-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("kindly retype the time"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(&app(), Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/patients/signup"].is_object());
}
