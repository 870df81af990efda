use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use models::db::{connect_with_config, migrate, DatabaseConfig};
use server::routes::auth::issue_token;
use server::startup::build_app;
use service::EngineConfig;

const SECRET: &str = "test-secret";

async fn build_test_app() -> anyhow::Result<Router> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), acquire_timeout_secs: 10, ..DatabaseConfig::default() };
    let db = connect_with_config(&cfg).await?;
    migrate(&db).await?;
    let (app, _engine) = build_app(db, EngineConfig::default(), SECRET.into());
    Ok(app)
}

fn bearer(user: &str) -> String {
    format!("Bearer {}", issue_token(SECRET, user, 3600).unwrap())
}

async fn send(app: &Router, method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(u) = user {
        builder = builder.header("authorization", bearer(u));
    }
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = build_test_app().await?;
    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn booking_flow_until_slot_is_full() -> anyhow::Result<()> {
    let app = build_test_app().await?;

    let (status, body) = send(&app, "POST", "/restaurants/7/tables", Some("owner"), Some(json!({"count": 2}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["table_ids"].as_array().map(Vec::len), Some(2));

    let (status, body) = send(&app, "GET", "/restaurants/7/availability?start_time=10000", Some("alice"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_tables"], 2);

    let (status, first) = send(&app, "POST", "/restaurants/7/reservations", Some("alice"), Some(json!({"start_time": 10000}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["user_id"], "alice");
    assert_eq!(first["restaurant_id"], 7);

    let (status, second) = send(&app, "POST", "/restaurants/7/reservations", Some("bob"), Some(json!({"start_time": 11000}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(first["table_id"], second["table_id"]);

    let (status, body) = send(&app, "POST", "/restaurants/7/reservations", Some("carol"), Some(json!({"start_time": 12000}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "No Availability");

    // one hour after the first booking its table is free again
    let (_, body) = send(&app, "GET", "/restaurants/7/availability?start_time=13600", Some("carol"), None).await?;
    assert_eq!(body["available_tables"], 1);
    Ok(())
}

#[tokio::test]
async fn reservation_is_visible_to_its_owner_only() -> anyhow::Result<()> {
    let app = build_test_app().await?;
    send(&app, "POST", "/restaurants/1/tables", Some("owner"), Some(json!({"count": 1}))).await?;
    let (_, booked) = send(&app, "POST", "/restaurants/1/reservations", Some("alice"), Some(json!({"start_time": 5000}))).await?;
    let uri = format!("/reservations/{}", booked["reservation_id"]);

    let (status, body) = send(&app, "GET", &uri, Some("alice"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table_id"], booked["table_id"]);
    assert_eq!(body["deleted"], false);

    let (status, _) = send(&app, "GET", &uri, Some("mallory"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/reservations/999", Some("alice"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn missing_or_invalid_token_is_rejected() -> anyhow::Result<()> {
    let app = build_test_app().await?;
    let (status, _) = send(&app, "GET", "/restaurants/1/availability?start_time=0", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .uri("/restaurants/1/availability?start_time=0")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let forged = issue_token("other-secret", "alice", 3600)?;
    let req = Request::builder()
        .uri("/restaurants/1/availability?start_time=0")
        .header("authorization", format!("Bearer {forged}"))
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn invalid_provisioning_count_is_bad_request() -> anyhow::Result<()> {
    let app = build_test_app().await?;
    let (status, body) = send(&app, "POST", "/restaurants/1/tables", Some("owner"), Some(json!({"count": 0}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = build_test_app().await?;
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/restaurants/{restaurant_id}/availability").is_some());
    Ok(())
}

#[tokio::test]
async fn out_of_range_slot_is_bad_request() -> anyhow::Result<()> {
    let app = build_test_app().await?;
    let (status, _) = send(&app, "POST", "/restaurants/0/reservations", Some("alice"), Some(json!({"start_time": 1000}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/restaurants/1/availability?start_time=-5", Some("alice"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn returned_engine_serves_the_router() -> anyhow::Result<()> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), acquire_timeout_secs: 10, ..DatabaseConfig::default() };
    let db = connect_with_config(&cfg).await?;
    migrate(&db).await?;
    let (app, engine): (Router, std::sync::Arc<server::state::Engine>) = build_app(db, EngineConfig::default(), SECRET.into());

    send(&app, "POST", "/restaurants/3/tables", Some("owner"), Some(json!({"count": 1}))).await?;
    let (_, booked) = send(&app, "POST", "/restaurants/3/reservations", Some("alice"), Some(json!({"start_time": 7200}))).await?;
    let id = booked["reservation_id"].as_i64().expect("numeric id") as i32;

    let stored = engine.find_reservation(id).await?.expect("visible through the engine");
    assert_eq!(stored.user_id, "alice");
    assert_eq!(engine.available_table_count(3, 7200).await?, 0);
    Ok(())
}
