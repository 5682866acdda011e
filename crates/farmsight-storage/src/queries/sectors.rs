// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sector plotting lifecycle: start and finish entry points.
//!
//! A sector row is "open" while complete = 0 and created within the trailing
//! hour. The window is a staleness heuristic for pairing start/finish events
//! from plotters, not a consistency guarantee: delayed or concurrent events
//! can still race, and a finish without a prior start is recorded as a
//! completed row with no started_at.

use rusqlite::params;
use tracing::debug;

use farmsight_core::{FarmsightError, SectorEvent, WriteOutcome};

use crate::database::Database;

/// Predicate selecting the open record for a (sector_index, public_key) pair.
const OPEN_MATCH: &str = "sector_index = ?1
             AND public_key = ?2
             AND complete = 0
             AND created_at >= DATETIME('now', '-1 hour')";

fn require_fields(sector: &SectorEvent) -> Result<(), FarmsightError> {
    let mut missing = Vec::new();
    if sector.sector_index.is_none() {
        missing.push("sector_index");
    }
    if sector.public_key.is_none() {
        missing.push("public_key");
    }
    if sector.complete.is_none() {
        missing.push("complete");
    }
    if sector.plotter_id.is_none() {
        missing.push("plotter_id");
    }
    if sector.event_datetime.is_none() {
        missing.push("event_datetime");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FarmsightError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )))
    }
}

/// Resolve the owning farmer through the farm's public key.
///
/// Plotters only know the farm public key; the sentinel keeps rows queryable
/// when the farm has not registered yet.
fn resolve_farmer_id(
    conn: &rusqlite::Connection,
    public_key: &str,
) -> Result<String, rusqlite::Error> {
    let result = conn.query_row(
        "SELECT farmer_id FROM farms WHERE farm_public_key = ?1",
        params![public_key],
        |row| row.get(0),
    );
    match result {
        Ok(farmer_id) => Ok(farmer_id),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok("Unknown".to_string()),
        Err(e) => Err(e),
    }
}

/// Record the start of plotting a sector.
///
/// Restarting within the open window is idempotent: the existing open record
/// gets a fresh started_at and plotter_id instead of a second row.
pub async fn start_sector(
    db: &Database,
    sector: SectorEvent,
) -> Result<WriteOutcome, FarmsightError> {
    require_fields(&sector)?;

    let sector_index = sector.sector_index.unwrap_or_default();
    let public_key = sector.public_key.unwrap_or_default();
    let complete = sector.complete.unwrap_or_default();
    let plotter_id = sector.plotter_id.unwrap_or_default();
    let event_datetime = sector.event_datetime.unwrap_or_default();

    db.connection()
        .call(move |conn| {
            let farmer_id = resolve_farmer_id(conn, &public_key)?;

            let open: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM sectors WHERE {OPEN_MATCH}"),
                params![sector_index, public_key],
                |row| row.get(0),
            )?;

            if open == 0 {
                conn.execute(
                    "INSERT INTO sectors (
                        sector_index, public_key, complete, farmer_id, plotter_id, started_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        sector_index,
                        public_key,
                        complete,
                        farmer_id,
                        plotter_id,
                        event_datetime,
                    ],
                )?;
                Ok(WriteOutcome::created("Sector inserted successfully"))
            } else {
                debug!(sector_index, "re-start within open window");
                conn.execute(
                    &format!(
                        "UPDATE sectors SET started_at = ?3, plotter_id = ?4 WHERE {OPEN_MATCH}"
                    ),
                    params![sector_index, public_key, event_datetime, plotter_id],
                )?;
                Ok(WriteOutcome::updated("Sector updated successfully"))
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record the completion of plotting a sector.
///
/// Matching open record: close it and derive plot_time_seconds from the
/// recorded started_at. No open record: insert a completed row with only
/// finished_at set.
pub async fn finish_sector(
    db: &Database,
    sector: SectorEvent,
) -> Result<WriteOutcome, FarmsightError> {
    require_fields(&sector)?;

    let sector_index = sector.sector_index.unwrap_or_default();
    let public_key = sector.public_key.unwrap_or_default();
    let complete = sector.complete.unwrap_or_default();
    let plotter_id = sector.plotter_id.unwrap_or_default();
    let event_datetime = sector.event_datetime.unwrap_or_default();

    db.connection()
        .call(move |conn| {
            let farmer_id = resolve_farmer_id(conn, &public_key)?;

            let open = conn.query_row(
                &format!("SELECT started_at FROM sectors WHERE {OPEN_MATCH}"),
                params![sector_index, public_key],
                |row| row.get::<_, Option<String>>(0),
            );

            match open {
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    debug!(sector_index, "finish without prior start");
                    conn.execute(
                        "INSERT INTO sectors (
                            sector_index, public_key, complete, farmer_id, plotter_id, finished_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        params![
                            sector_index,
                            public_key,
                            complete,
                            farmer_id,
                            plotter_id,
                            event_datetime,
                        ],
                    )?;
                    Ok(WriteOutcome::created("Sector inserted successfully"))
                }
                Ok(started_at) => {
                    conn.execute(
                        &format!(
                            "UPDATE sectors
                             SET finished_at = ?3,
                                 plotter_id = ?4,
                                 complete = ?5,
                                 plot_time_seconds = (strftime('%s', ?3) - strftime('%s', ?6))
                             WHERE {OPEN_MATCH}"
                        ),
                        params![
                            sector_index,
                            public_key,
                            event_datetime,
                            plotter_id,
                            complete,
                            started_at,
                        ],
                    )?;
                    Ok(WriteOutcome::updated("Sector updated successfully"))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
