// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request, outcome, and page types shared across the Farmsight workspace.
//!
//! Write-request structs keep every field `Option` so the storage layer can
//! report exactly which required fields a client omitted, matching the
//! missing-field lists the monitor fleet already expects. Optional columns
//! stay `None` through to SQL NULL.

use serde::{Deserialize, Serialize};

/// Result classification for a write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// A new row was inserted (HTTP 201).
    Created,
    /// An existing row was updated (HTTP 200).
    Updated,
    /// Nothing was written: duplicate event or empty farm update (HTTP 200).
    Unchanged,
}

/// Outcome of a write operation, carrying the client-facing message.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub status: WriteStatus,
    pub message: String,
}

impl WriteOutcome {
    pub fn created(message: impl Into<String>) -> Self {
        Self {
            status: WriteStatus::Created,
            message: message.into(),
        }
    }

    pub fn updated(message: impl Into<String>) -> Self {
        Self {
            status: WriteStatus::Updated,
            message: message.into(),
        }
    }

    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            status: WriteStatus::Unchanged,
            message: message.into(),
        }
    }
}

/// One page of rows from the generic reader.
///
/// `total_rows` is the count of all rows matching the filter predicate,
/// independent of `page`/`limit`; callers use it for page-count math.
#[derive(Debug, Clone, Serialize)]
pub struct EntityPage {
    pub data: Vec<serde_json::Value>,
    pub total_rows: i64,
    pub page: i64,
    pub limit: i64,
}

/// Incoming telemetry event.
///
/// All seven non-payload fields are required; `event_data` is a free-form
/// JSON object stored as its canonical serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEvent {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_level: Option<String>,
    #[serde(default)]
    pub event_container_alias: Option<String>,
    #[serde(default)]
    pub event_container_id: Option<String>,
    #[serde(default)]
    pub event_container_type: Option<String>,
    #[serde(default)]
    pub event_data: Option<serde_json::Value>,
    #[serde(default)]
    pub event_datetime: Option<String>,
}

/// Container registration/heartbeat. Upserted by `container_id` with
/// full-replace semantics: every column is overwritten on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerUpsert {
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default)]
    pub container_type: Option<String>,
    #[serde(default)]
    pub container_alias: Option<String>,
    #[serde(default)]
    pub container_status: Option<String>,
    #[serde(default)]
    pub container_image: Option<String>,
    #[serde(default)]
    pub container_started_at: Option<String>,
    #[serde(default)]
    pub container_is_cluster: Option<bool>,
    #[serde(default)]
    pub container_nats_url: Option<String>,
    #[serde(default)]
    pub container_ip: Option<String>,
}

/// Farmer registration. Upserted by `farmer_id` with full-replace semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmerUpsert {
    #[serde(default)]
    pub farmer_id: Option<String>,
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default)]
    pub farmer_status: Option<String>,
    #[serde(default)]
    pub farmer_reward_address: Option<String>,
}

/// Farm attributes, upserted by (farmer_id, farm_index).
///
/// Unlike containers and farmers, the update path is partial: only fields
/// present and non-null here are written. This asymmetry is intentional --
/// farm attributes arrive incrementally from different plotter events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmUpsert {
    #[serde(default)]
    pub farmer_id: Option<String>,
    #[serde(default)]
    pub farm_index: Option<i64>,
    #[serde(default)]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub farm_public_key: Option<String>,
    #[serde(default)]
    pub farm_genesis_hash: Option<String>,
    #[serde(default)]
    pub farm_size: Option<String>,
    #[serde(default)]
    pub farm_directory: Option<String>,
    #[serde(default)]
    pub farm_fastest_mode: Option<String>,
    #[serde(default)]
    pub farm_initial_plot_complete: Option<bool>,
    #[serde(default)]
    pub farm_plot_progress: Option<f64>,
    #[serde(default)]
    pub farm_latest_sector: Option<i64>,
}

/// Sector plotting lifecycle event, shared by the start and finish entry points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorEvent {
    #[serde(default)]
    pub sector_index: Option<i64>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub complete: Option<i64>,
    #[serde(default)]
    pub plotter_id: Option<String>,
    #[serde(default)]
    pub event_datetime: Option<String>,
}
