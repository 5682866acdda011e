// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Farmer upserts, keyed by `farmer_id`. Full-replace semantics like containers.

use rusqlite::params;

use farmsight_core::{FarmerUpsert, FarmsightError, WriteOutcome};

use crate::database::Database;

/// Insert or fully overwrite a farmer row.
pub async fn upsert_farmer(
    db: &Database,
    farmer: FarmerUpsert,
) -> Result<WriteOutcome, FarmsightError> {
    let mut missing = Vec::new();
    if farmer.farmer_id.is_none() {
        missing.push("farmer_id");
    }
    if farmer.container_id.is_none() {
        missing.push("container_id");
    }
    if farmer.farmer_status.is_none() {
        missing.push("farmer_status");
    }
    if !missing.is_empty() {
        return Err(FarmsightError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    db.connection()
        .call(move |conn| {
            let exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM farmers WHERE farmer_id = ?1",
                params![farmer.farmer_id],
                |row| row.get(0),
            )?;

            if exists > 0 {
                conn.execute(
                    "UPDATE farmers
                     SET container_id = ?1, farmer_status = ?2, farmer_reward_address = ?3
                     WHERE farmer_id = ?4",
                    params![
                        farmer.container_id,
                        farmer.farmer_status,
                        farmer.farmer_reward_address,
                        farmer.farmer_id,
                    ],
                )?;
                Ok(WriteOutcome::updated("Updated Farmer"))
            } else {
                conn.execute(
                    "INSERT INTO farmers (farmer_id, container_id, farmer_status, farmer_reward_address)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        farmer.farmer_id,
                        farmer.container_id,
                        farmer.farmer_status,
                        farmer.farmer_reward_address,
                    ],
                )?;
                Ok(WriteOutcome::created("Inserted Farmer"))
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
