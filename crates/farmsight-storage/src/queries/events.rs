// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry event writes.
//!
//! Events are immutable once inserted. A resend of the same
//! (container, payload, timestamp) triple is a success no-op, so agents can
//! retry deliveries blindly.

use chrono::NaiveDateTime;
use rusqlite::params;
use tracing::debug;

use farmsight_core::{FarmsightError, NewEvent, WriteOutcome};

use crate::database::Database;

/// Exact timestamp format accepted on the wire and stored in the table.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Insert a telemetry event unless an identical one is already stored.
pub async fn insert_event(db: &Database, event: NewEvent) -> Result<WriteOutcome, FarmsightError> {
    // Blank counts as missing here: agents have been observed sending empty
    // strings for fields they could not resolve.
    let required: [(&str, &Option<String>); 7] = [
        ("event_name", &event.event_name),
        ("event_type", &event.event_type),
        ("event_level", &event.event_level),
        ("event_container_alias", &event.event_container_alias),
        ("event_container_id", &event.event_container_id),
        ("event_container_type", &event.event_container_type),
        ("event_datetime", &event.event_datetime),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(FarmsightError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    let raw_datetime = event.event_datetime.as_deref().unwrap_or_default();
    let parsed = NaiveDateTime::parse_from_str(raw_datetime, DATETIME_FORMAT).map_err(|_| {
        FarmsightError::Validation(format!("Invalid datetime format: {raw_datetime}"))
    })?;
    let event_datetime = parsed.format(DATETIME_FORMAT).to_string();

    // Canonical serialization (serde_json sorts object keys) so the duplicate
    // comparison is stable across payload key ordering on the wire.
    let event_data = serde_json::to_string(
        &event
            .event_data
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())),
    )
    .map_err(|e| FarmsightError::Internal(format!("event payload serialization: {e}")))?;

    let event_name = event.event_name.unwrap_or_default();
    let event_type = event.event_type.unwrap_or_default();
    let event_level = event.event_level.unwrap_or_default();
    let event_container_alias = event.event_container_alias.unwrap_or_default();
    let event_container_id = event.event_container_id.unwrap_or_default();
    let event_container_type = event.event_container_type.unwrap_or_default();

    db.connection()
        .call(move |conn| {
            let duplicates: i64 = conn.query_row(
                "SELECT COUNT(*) FROM events
                 WHERE event_container_id = ?1
                 AND event_data = ?2
                 AND event_datetime = ?3",
                params![event_container_id, event_data, event_datetime],
                |row| row.get(0),
            )?;

            if duplicates > 0 {
                debug!(container = %event_container_id, "duplicate event skipped");
                return Ok(WriteOutcome::unchanged("Event already exists"));
            }

            conn.execute(
                "INSERT INTO events (
                    event_name,
                    event_type,
                    event_level,
                    event_container_alias,
                    event_container_id,
                    event_container_type,
                    event_data,
                    event_datetime
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    event_name,
                    event_type,
                    event_level,
                    event_container_alias,
                    event_container_id,
                    event_container_type,
                    event_data,
                    event_datetime,
                ],
            )?;
            Ok(WriteOutcome::created("Event inserted successfully"))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmsight_core::WriteStatus;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("events_test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_event() -> NewEvent {
        NewEvent {
            event_name: Some("reward".to_string()),
            event_type: Some("farmer".to_string()),
            event_level: Some("info".to_string()),
            event_container_alias: Some("node-a-alias".to_string()),
            event_container_id: Some("node-a".to_string()),
            event_container_type: Some("farmer".to_string()),
            event_data: Some(serde_json::json!({"height": 100, "amount": "0.1"})),
            event_datetime: Some("2026-05-01 12:00:00".to_string()),
        }
    }

    async fn count_events(db: &Database) -> i64 {
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                let n = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
                Ok(n)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_event_creates_row() {
        let (db, _dir) = setup_db().await;
        let outcome = insert_event(&db, make_event()).await.unwrap();
        assert_eq!(outcome.status, WriteStatus::Created);
        assert_eq!(outcome.message, "Event inserted successfully");
        assert_eq!(count_events(&db).await, 1);
    }

    #[tokio::test]
    async fn duplicate_event_is_a_success_noop() {
        let (db, _dir) = setup_db().await;
        insert_event(&db, make_event()).await.unwrap();

        let outcome = insert_event(&db, make_event()).await.unwrap();
        assert_eq!(outcome.status, WriteStatus::Unchanged);
        assert_eq!(outcome.message, "Event already exists");
        assert_eq!(count_events(&db).await, 1);
    }

    #[tokio::test]
    async fn payload_key_order_does_not_defeat_duplicate_detection() {
        let (db, _dir) = setup_db().await;
        insert_event(&db, make_event()).await.unwrap();

        let mut reordered = make_event();
        reordered.event_data =
            Some(serde_json::json!({"amount": "0.1", "height": 100}));
        let outcome = insert_event(&db, reordered).await.unwrap();
        assert_eq!(outcome.status, WriteStatus::Unchanged);
        assert_eq!(count_events(&db).await, 1);
    }

    #[tokio::test]
    async fn different_payload_is_not_a_duplicate() {
        let (db, _dir) = setup_db().await;
        insert_event(&db, make_event()).await.unwrap();

        let mut other = make_event();
        other.event_data = Some(serde_json::json!({"height": 101}));
        let outcome = insert_event(&db, other).await.unwrap();
        assert_eq!(outcome.status, WriteStatus::Created);
        assert_eq!(count_events(&db).await, 2);
    }

    #[tokio::test]
    async fn missing_fields_are_named_in_order() {
        let (db, _dir) = setup_db().await;
        let mut event = make_event();
        event.event_type = None;
        event.event_container_id = Some(String::new()); // blank counts as missing
        let err = insert_event(&db, event).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing fields: event_type, event_container_id"
        );
        assert_eq!(count_events(&db).await, 0);
    }

    #[tokio::test]
    async fn invalid_datetime_is_rejected_with_value() {
        let (db, _dir) = setup_db().await;
        let mut event = make_event();
        event.event_datetime = Some("01/05/2026 12:00".to_string());
        let err = insert_event(&db, event).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Invalid datetime format: 01/05/2026 12:00"
        );
        assert_eq!(count_events(&db).await, 0);
    }

    #[tokio::test]
    async fn missing_payload_defaults_to_empty_object() {
        let (db, _dir) = setup_db().await;
        let mut event = make_event();
        event.event_data = None;
        insert_event(&db, event).await.unwrap();

        let stored: String = db
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                let s = conn.query_row("SELECT event_data FROM events", [], |row| row.get(0))?;
                Ok(s)
            })
            .await
            .unwrap();
        assert_eq!(stored, "{}");
    }
}
