// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Farmsight telemetry service.

use thiserror::Error;

/// The primary error type used across the Farmsight workspace.
///
/// `Validation` carries the human-readable message surfaced to clients as a
/// 400 response; everything else maps to a 500 at the gateway boundary.
#[derive(Debug, Error)]
pub enum FarmsightError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request validation failures detected before touching storage.
    #[error("{0}")]
    Validation(String),

    /// Storage backend errors (database open, query failure, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FarmsightError {
    /// True when the error belongs to the 400 validation tier.
    pub fn is_validation(&self) -> bool {
        matches!(self, FarmsightError::Validation(_))
    }
}
