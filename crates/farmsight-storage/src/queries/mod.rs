// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the telemetry entities.

pub mod containers;
pub mod events;
pub mod farmers;
pub mod farms;
pub mod reader;
pub mod sectors;
