// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Container upserts, keyed by `container_id`.
//!
//! Updates are full-replace: every listed column is overwritten, including
//! nulling `container_nats_url` when the request omits it. Farms (see
//! `farms.rs`) deliberately do NOT behave this way.

use rusqlite::params;

use farmsight_core::{ContainerUpsert, FarmsightError, WriteOutcome};

use crate::database::Database;

/// Insert or fully overwrite a container row.
pub async fn upsert_container(
    db: &Database,
    container: ContainerUpsert,
) -> Result<WriteOutcome, FarmsightError> {
    let mut missing = Vec::new();
    if container.container_id.is_none() {
        missing.push("container_id");
    }
    if container.container_type.is_none() {
        missing.push("container_type");
    }
    if container.container_alias.is_none() {
        missing.push("container_alias");
    }
    if container.container_status.is_none() {
        missing.push("container_status");
    }
    if container.container_image.is_none() {
        missing.push("container_image");
    }
    if container.container_started_at.is_none() {
        missing.push("container_started_at");
    }
    if container.container_is_cluster.is_none() {
        missing.push("container_is_cluster");
    }
    if container.container_ip.is_none() {
        missing.push("container_ip");
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
                "SELECT COUNT(*) FROM containers WHERE container_id = ?1",
                params![container.container_id],
                |row| row.get(0),
            )?;

            if exists > 0 {
                conn.execute(
                    "UPDATE containers
                     SET container_type = ?1, container_alias = ?2, container_status = ?3,
                         container_image = ?4, container_started_at = ?5,
                         container_is_cluster = ?6, container_nats_url = ?7, container_ip = ?8
                     WHERE container_id = ?9",
                    params![
                        container.container_type,
                        container.container_alias,
                        container.container_status,
                        container.container_image,
                        container.container_started_at,
                        container.container_is_cluster,
                        container.container_nats_url,
                        container.container_ip,
                        container.container_id,
                    ],
                )?;
                Ok(WriteOutcome::updated("Updated Container"))
            } else {
                conn.execute(
                    "INSERT INTO containers (
                        container_id, container_type, container_alias, container_status,
                        container_image, container_started_at, container_is_cluster,
                        container_nats_url, container_ip
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        container.container_id,
                        container.container_type,
                        container.container_alias,
                        container.container_status,
                        container.container_image,
                        container.container_started_at,
                        container.container_is_cluster,
                        container.container_nats_url,
                        container.container_ip,
                    ],
                )?;
                Ok(WriteOutcome::created("Inserted Container"))
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
