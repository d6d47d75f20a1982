// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Trivet quiz engine.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and Elm-style diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use trivet_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Bot name: {}", config.bot.name);
//! ```

use std::path::PathBuf;

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BotConfig, OpenTdbConfig, TrivetConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Merges TOML files and env vars via the loader, then runs semantic
/// validation. Figment failures are bridged into miette diagnostics with
/// spans resolved against whichever config files exist on disk.
pub fn load_and_validate() -> Result<TrivetConfig, Vec<ConfigError>> {
    loader::load_config()
        .map_err(|err| diagnostic::figment_to_config_errors(err, &toml_source_files()))
        .and_then(validated)
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<TrivetConfig, Vec<ConfigError>> {
    let inline = vec![("<inline>".to_string(), toml_content.to_string())];
    loader::load_config_from_str(toml_content)
        .map_err(|err| diagnostic::figment_to_config_errors(err, &inline))
        .and_then(validated)
}

fn validated(config: TrivetConfig) -> Result<TrivetConfig, Vec<ConfigError>> {
    validation::validate_config(&config)?;
    Ok(config)
}

/// Read whichever config files from the XDG hierarchy exist, for error
/// span resolution. Order mirrors the loader's merge order.
fn toml_source_files() -> Vec<(String, String)> {
    let mut candidates = vec![PathBuf::from("/etc/trivet/trivet.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("trivet/trivet.toml"));
    }
    candidates.push(
        std::env::current_dir()
            .map(|d| d.join("trivet.toml"))
            .unwrap_or_else(|_| PathBuf::from("trivet.toml")),
    );

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
