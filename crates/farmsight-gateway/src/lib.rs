// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Farmsight telemetry API.
//!
//! A thin axum layer over `farmsight-storage`: one ping route, one generic
//! insert route dispatching on entity kind, and one generic paged reader.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, router, start_server};
