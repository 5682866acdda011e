// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Farmsight telemetry service.
//!
//! Provides the error type and the request/outcome/page types shared by the
//! storage and gateway crates.

pub mod error;
pub mod types;

pub use error::FarmsightError;
pub use types::{
    ContainerUpsert, EntityPage, FarmUpsert, FarmerUpsert, NewEvent, SectorEvent, WriteOutcome,
    WriteStatus,
};
