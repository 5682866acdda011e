// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use farmsight_core::FarmsightError;

use crate::migrations;

/// Handle to the service's single SQLite connection.
///
/// Opening runs the embedded migrations, so a fresh database file comes up
/// with the full telemetry schema.
#[derive(Debug)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path` and run migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, FarmsightError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| FarmsightError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| FarmsightError::Storage {
                source: Box::new(e),
            })?;

        // The setup closure mixes pragma (rusqlite) and migration
        // (FarmsightError) failures, so it carries the workspace error type.
        let sql_err = |e: rusqlite::Error| FarmsightError::Storage {
            source: Box::new(e),
        };
        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL").map_err(sql_err)?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(sql_err)?;
            conn.pragma_update(None, "foreign_keys", "ON").map_err(sql_err)?;
            conn.pragma_update(None, "busy_timeout", 5000).map_err(sql_err)?;
            migrations::run_migrations(conn)
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(inner) => inner,
            other => FarmsightError::Internal(format!("database worker error: {other}")),
        })?;

        tracing::debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(&self) -> Result<(), FarmsightError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        tracing::debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> FarmsightError {
    FarmsightError::Storage {
        source: Box::new(e),
    }
}
