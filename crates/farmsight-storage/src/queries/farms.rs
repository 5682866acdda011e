// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Farm upserts, keyed by (farmer_id, farm_index).
//!
//! The update path is PARTIAL: only fields present and non-null in the
//! request make it into the SET clause, because farm attributes trickle in
//! from different plotter events (size from one, progress from another).
//! Containers and farmers full-replace instead; the asymmetry is intentional.

use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use farmsight_core::{FarmUpsert, FarmsightError, WriteOutcome};

use crate::database::Database;

/// Insert a farm, or partially update the row matching the composite key.
pub async fn upsert_farm(db: &Database, farm: FarmUpsert) -> Result<WriteOutcome, FarmsightError> {
    let mut missing = Vec::new();
    if farm.farmer_id.is_none() {
        missing.push("farmer_id");
    }
    if farm.farm_index.is_none() {
        missing.push("farm_index");
    }
    if !missing.is_empty() {
        return Err(FarmsightError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    let farmer_id = farm.farmer_id.clone().unwrap_or_default();
    let farm_index = farm.farm_index.unwrap_or_default();

    db.connection()
        .call(move |conn| {
            let exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM farms WHERE farmer_id = ?1 AND farm_index = ?2",
                params![farmer_id, farm_index],
                |row| row.get(0),
            )?;

            if exists == 0 {
                conn.execute(
                    "INSERT INTO farms (
                        farmer_id, farm_index, farm_id, farm_public_key, farm_genesis_hash,
                        farm_size, farm_directory, farm_fastest_mode,
                        farm_initial_plot_complete, farm_plot_progress, farm_latest_sector
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        farmer_id,
                        farm_index,
                        farm.farm_id,
                        farm.farm_public_key,
                        farm.farm_genesis_hash,
                        farm.farm_size,
                        farm.farm_directory,
                        farm.farm_fastest_mode,
                        farm.farm_initial_plot_complete,
                        farm.farm_plot_progress,
                        farm.farm_latest_sector,
                    ],
                )?;
                return Ok(WriteOutcome::created("Farm inserted successfully"));
            }

            // Partial update: collect SET fragments for present fields only.
            let mut sets: Vec<&'static str> = Vec::new();
            let mut values: Vec<Value> = Vec::new();

            if let Some(v) = farm.farm_id {
                sets.push("farm_id = ?");
                values.push(Value::Text(v));
            }
            if let Some(v) = farm.farm_public_key {
                sets.push("farm_public_key = ?");
                values.push(Value::Text(v));
            }
            if let Some(v) = farm.farm_genesis_hash {
                sets.push("farm_genesis_hash = ?");
                values.push(Value::Text(v));
            }
            if let Some(v) = farm.farm_size {
                sets.push("farm_size = ?");
                values.push(Value::Text(v));
            }
            if let Some(v) = farm.farm_directory {
                sets.push("farm_directory = ?");
                values.push(Value::Text(v));
            }
            if let Some(v) = farm.farm_fastest_mode {
                sets.push("farm_fastest_mode = ?");
                values.push(Value::Text(v));
            }
            if let Some(v) = farm.farm_initial_plot_complete {
                sets.push("farm_initial_plot_complete = ?");
                values.push(Value::Integer(v as i64));
            }
            if let Some(v) = farm.farm_plot_progress {
                sets.push("farm_plot_progress = ?");
                values.push(Value::Real(v));
            }
            if let Some(v) = farm.farm_latest_sector {
                sets.push("farm_latest_sector = ?");
                values.push(Value::Integer(v));
            }

            if sets.is_empty() {
                return Ok(WriteOutcome::unchanged("Nothing to update"));
            }

            let sql = format!(
                "UPDATE farms SET {} WHERE farmer_id = ? AND farm_index = ?",
                sets.join(", ")
            );
            values.push(Value::Text(farmer_id));
            values.push(Value::Integer(farm_index));
            conn.execute(&sql, params_from_iter(values.iter()))?;
            Ok(WriteOutcome::updated("Farm updated successfully"))
        })
        .await
        .map_err(crate::database::map_tr_err)
}
