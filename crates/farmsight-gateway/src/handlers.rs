// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the telemetry API.
//!
//! Write handlers dispatch on the `{entity}` path segment to the typed
//! storage operations; the read handler funnels query parameters into the
//! generic entity reader.

use std::collections::{BTreeMap, HashMap};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use farmsight_core::{FarmsightError, WriteOutcome, WriteStatus};
use farmsight_storage::queries::{containers, events, farmers, farms, reader, sectors};
use farmsight_storage::{ReadQuery, SortOrder};

use crate::server::GatewayState;

/// Body shape for every non-paged response, success or failure.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query parameters the reader consumes directly; everything else in the
/// query string is treated as a column filter.
const RESERVED_PARAMS: [&str; 6] = ["page", "limit", "start", "end", "sort_column", "sort_order"];

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// GET /ping -- liveness probe.
pub async fn get_ping() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "pong".to_string(),
    })
}

/// POST /insert/{entity} -- ingest one telemetry record.
///
/// Status codes: 201 for a fresh insert, 200 for an update or a detected
/// duplicate, 400 for validation failures or an unknown entity.
pub async fn post_insert(
    State(state): State<GatewayState>,
    Path(entity): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    match dispatch_insert(&state, &entity, body).await {
        Ok(outcome) => write_response(outcome),
        Err(e) => error_response(e),
    }
}

async fn dispatch_insert(
    state: &GatewayState,
    entity: &str,
    body: serde_json::Value,
) -> Result<WriteOutcome, FarmsightError> {
    match entity {
        "event" => events::insert_event(&state.db, parse_body(body)?).await,
        "container" => containers::upsert_container(&state.db, parse_body(body)?).await,
        "farmer" => farmers::upsert_farmer(&state.db, parse_body(body)?).await,
        "farm" => farms::upsert_farm(&state.db, parse_body(body)?).await,
        "incomplete_sector" => sectors::start_sector(&state.db, parse_body(body)?).await,
        "complete_sector" => sectors::finish_sector(&state.db, parse_body(body)?).await,
        _ => Err(FarmsightError::Validation(format!(
            "Unknown entity: {entity}"
        ))),
    }
}

fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, FarmsightError> {
    // serde's derive would happily read a JSON array positionally; the wire
    // format for every entity is an object.
    if !body.is_object() {
        return Err(FarmsightError::Validation(
            "Invalid request body: expected a JSON object".to_string(),
        ));
    }
    serde_json::from_value(body)
        .map_err(|e| FarmsightError::Validation(format!("Invalid request body: {e}")))
}

fn write_response(outcome: WriteOutcome) -> Response {
    let status = match outcome.status {
        WriteStatus::Created => StatusCode::CREATED,
        WriteStatus::Updated | WriteStatus::Unchanged => StatusCode::OK,
    };
    (
        status,
        Json(MessageResponse {
            message: outcome.message,
        }),
    )
        .into_response()
}

fn error_response(err: FarmsightError) -> Response {
    if err.is_validation() {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                message: err.to_string(),
            }),
        )
            .into_response();
    }
    tracing::error!("request failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse {
            message: format!("Internal Server Error: {err}"),
        }),
    )
        .into_response()
}

/// GET /get/{entity} -- paged, filtered entity listing.
///
/// Unparseable `page`/`limit` values fall back to the defaults rather than
/// erroring, matching how clients have always treated them.
pub async fn get_entity(
    State(state): State<GatewayState>,
    Path(entity): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page = params
        .get("page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PAGE);
    let limit = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LIMIT);
    let sort_order = params
        .get("sort_order")
        .map(|s| SortOrder::parse(s))
        .unwrap_or_default();

    let filters: BTreeMap<String, String> = params
        .iter()
        .filter(|(k, _)| !RESERVED_PARAMS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let query = ReadQuery {
        entity,
        page,
        limit,
        filters,
        start: params.get("start").cloned(),
        end: params.get("end").cloned(),
        sort_column: params.get("sort_column").cloned(),
        sort_order,
    };

    match reader::get_entity(&state.db, query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => error_response(e),
    }
}
