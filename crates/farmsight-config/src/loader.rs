// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./farmsight.toml` > `~/.config/farmsight/farmsight.toml`
//! > `/etc/farmsight/farmsight.toml` with environment variable overrides via the
//! `FARMSIGHT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FarmsightConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/farmsight/farmsight.toml` (system-wide)
/// 3. `~/.config/farmsight/farmsight.toml` (user XDG config)
/// 4. `./farmsight.toml` (local directory)
/// 5. `FARMSIGHT_*` environment variables
pub fn load_config() -> Result<FarmsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FarmsightConfig::default()))
        .merge(Toml::file("/etc/farmsight/farmsight.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("farmsight/farmsight.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("farmsight.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FarmsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FarmsightConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FarmsightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FarmsightConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `FARMSIGHT_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("FARMSIGHT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: FARMSIGHT_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
