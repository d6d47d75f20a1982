// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./trivet.toml` > `~/.config/trivet/trivet.toml` > `/etc/trivet/trivet.toml`
//! with environment variable overrides via `TRIVET_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TrivetConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/trivet/trivet.toml` (system-wide)
/// 3. `~/.config/trivet/trivet.toml` (user XDG config)
/// 4. `./trivet.toml` (local directory)
/// 5. `TRIVET_*` environment variables
pub fn load_config() -> Result<TrivetConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrivetConfig::default()))
        .merge(Toml::file("/etc/trivet/trivet.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("trivet/trivet.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("trivet.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TrivetConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrivetConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TrivetConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrivetConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `TRIVET_OPENTDB_BATCH_SIZE`
/// must map to `opentdb.batch_size`, not `opentdb.batch.size`.
fn env_provider() -> Env {
    Env::prefixed("TRIVET_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TRIVET_OPENTDB_TOKEN_SOFT_CAP -> "opentdb_token_soft_cap"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("opentdb_", "opentdb.", 1);
        mapped.into()
    })
}
