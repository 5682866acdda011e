// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Farmsight telemetry API.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, a fixed entity schema registry for
//! the generic reader, and typed write operations for events, containers,
//! farmers, farms, and plotting sectors.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod schema;

pub use database::Database;
pub use queries::reader::{ReadQuery, SortOrder};
