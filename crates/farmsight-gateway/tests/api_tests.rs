// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the gateway router over an in-process
//! temporary database.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use farmsight_gateway::{GatewayState, router};
use farmsight_storage::Database;

async fn setup_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("gateway.db");
    let db = Database::open(path.to_str().expect("utf-8 path"), true)
        .await
        .expect("open database");
    let state = GatewayState { db: Arc::new(db) };
    (router(state), dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("build request");
    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse body");
    (status, json)
}

fn sample_event(container_id: &str, datetime: &str) -> Value {
    json!({
        "event_name": "plotting_progress",
        "event_type": "farmer",
        "event_level": "info",
        "event_container_alias": format!("{container_id}-alias"),
        "event_container_id": container_id,
        "event_container_type": "farmer",
        "event_data": {"progress": 42},
        "event_datetime": datetime,
    })
}

#[tokio::test]
async fn ping_returns_pong() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, "GET", "/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn insert_event_then_duplicate() {
    let (app, _dir) = setup_app().await;
    let event = sample_event("node-a", "2026-03-01 12:00:00");

    let (status, body) = send(&app, "POST", "/insert/event", Some(event.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Event inserted successfully");

    let (status, body) = send(&app, "POST", "/insert/event", Some(event)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event already exists");
}

#[tokio::test]
async fn insert_event_missing_fields_is_rejected() {
    let (app, _dir) = setup_app().await;
    let event = json!({
        "event_name": "plotting_progress",
        "event_container_id": "",
    });

    let (status, body) = send(&app, "POST", "/insert/event", Some(event)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().expect("message string");
    assert!(message.starts_with("Missing fields"), "{message}");
    assert!(message.contains("event_container_id"), "{message}");
    assert!(message.contains("event_datetime"), "{message}");
}

#[tokio::test]
async fn insert_unknown_entity_is_rejected() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, "POST", "/insert/widget", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown entity: widget");
}

#[tokio::test]
async fn insert_rejects_non_object_body() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, "POST", "/insert/event", Some(json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().expect("message string");
    assert!(message.starts_with("Invalid request body"), "{message}");
}

#[tokio::test]
async fn get_events_pagination_and_filters() {
    let (app, _dir) = setup_app().await;
    for i in 0..5 {
        let container = if i < 3 { "node-a" } else { "node-b" };
        let event = sample_event(container, &format!("2026-03-01 12:00:0{i}"));
        let (status, _) = send(&app, "POST", "/insert/event", Some(event)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "GET",
        "/get/events?page=1&limit=2&sort_column=id&sort_order=asc",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["data"].as_array().expect("data array").len(), 2);
    assert_eq!(body["data"][0]["id"], 1);

    let (status, body) = send(
        &app,
        "GET",
        "/get/events?sort_column=id&event_container_id=node-b",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 2);
    for row in body["data"].as_array().expect("data array") {
        assert_eq!(row["event_container_id"], "node-b");
    }
}

#[tokio::test]
async fn get_events_datetime_window() {
    let (app, _dir) = setup_app().await;
    for i in 0..4 {
        let event = sample_event("node-a", &format!("2026-03-01 12:00:0{i}"));
        send(&app, "POST", "/insert/event", Some(event)).await;
    }

    let uri = "/get/events?sort_column=id&start=2026-03-01%2012:00:01&end=2026-03-01%2012:00:02";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 2);
}

#[tokio::test]
async fn get_unknown_entity_is_rejected() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, "GET", "/get/widgets?sort_column=id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid entity name: widgets");
}

#[tokio::test]
async fn get_requires_sort_column() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, "GET", "/get/events", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Sort column is required");
}

#[tokio::test]
async fn get_rejects_unknown_sort_column() {
    let (app, _dir) = setup_app().await;

    let (status, body) = send(&app, "GET", "/get/events?sort_column=nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid sort_column: nope");
}

#[tokio::test]
async fn get_malformed_page_falls_back_to_defaults() {
    let (app, _dir) = setup_app().await;
    let event = sample_event("node-a", "2026-03-01 12:00:00");
    send(&app, "POST", "/insert/event", Some(event)).await;

    let (status, body) = send(
        &app,
        "GET",
        "/get/events?page=abc&limit=xyz&sort_column=id",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
async fn farm_insert_then_partial_update() {
    let (app, _dir) = setup_app().await;
    let farm = json!({
        "farmer_id": "farmer-1",
        "farm_index": 0,
        "farm_public_key": "pk-1",
        "farm_size": "2.0 TiB",
    });

    let (status, body) = send(&app, "POST", "/insert/farm", Some(farm)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Farm inserted successfully");

    let update = json!({
        "farmer_id": "farmer-1",
        "farm_index": 0,
        "farm_plot_progress": 55.5,
    });
    let (status, body) = send(&app, "POST", "/insert/farm", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Farm updated successfully");

    let noop = json!({
        "farmer_id": "farmer-1",
        "farm_index": 0,
    });
    let (status, body) = send(&app, "POST", "/insert/farm", Some(noop)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Nothing to update");

    let (status, body) = send(
        &app,
        "GET",
        "/get/farms?sort_column=id&farmer_id=farmer-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 1);
    assert_eq!(body["data"][0]["farm_size"], "2.0 TiB");
    assert_eq!(body["data"][0]["farm_plot_progress"], 55.5);
}

#[tokio::test]
async fn container_and_farmer_upserts() {
    let (app, _dir) = setup_app().await;
    let container = json!({
        "container_id": "node-a",
        "container_type": "farmer",
        "container_alias": "node-a-alias",
        "container_status": "running",
        "container_image": "img:1",
        "container_started_at": "2026-03-01 10:00:00",
        "container_is_cluster": false,
        "container_ip": "10.0.0.2",
    });

    let (status, body) = send(&app, "POST", "/insert/container", Some(container.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Inserted Container");

    let (status, body) = send(&app, "POST", "/insert/container", Some(container)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Updated Container");

    let farmer = json!({
        "farmer_id": "farmer-1",
        "container_id": "node-a",
        "farmer_status": "farming",
    });
    let (status, body) = send(&app, "POST", "/insert/farmer", Some(farmer.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Inserted Farmer");

    let (status, body) = send(&app, "POST", "/insert/farmer", Some(farmer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Updated Farmer");
}

#[tokio::test]
async fn sector_lifecycle_over_http() {
    let (app, _dir) = setup_app().await;
    let farm = json!({
        "farmer_id": "farmer-1",
        "farm_index": 0,
        "farm_public_key": "pk-1",
    });
    send(&app, "POST", "/insert/farm", Some(farm)).await;

    let start = json!({
        "sector_index": 7,
        "public_key": "pk-1",
        "complete": 0,
        "plotter_id": "plotter-1",
        "event_datetime": "2026-03-01 12:00:00",
    });
    let (status, body) = send(&app, "POST", "/insert/incomplete_sector", Some(start)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Sector inserted successfully");

    let finish = json!({
        "sector_index": 7,
        "public_key": "pk-1",
        "complete": 1,
        "plotter_id": "plotter-1",
        "event_datetime": "2026-03-01 12:05:30",
    });
    let (status, body) = send(&app, "POST", "/insert/complete_sector", Some(finish)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sector updated successfully");

    let (status, body) = send(
        &app,
        "GET",
        "/get/sectors?sort_column=id&sort_order=asc",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], 1);
    let row = &body["data"][0];
    assert_eq!(row["complete"], 1);
    assert_eq!(row["farmer_id"], "farmer-1");
    assert_eq!(row["plot_time_seconds"], 330);
}
