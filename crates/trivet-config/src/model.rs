// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Trivet quiz engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Trivet configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrivetConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Open Trivia Database provider settings.
    #[serde(default)]
    pub opentdb: OpenTdbConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "trivet".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Open Trivia Database provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenTdbConfig {
    /// Base URL of the provider API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of candidate questions requested per fetch. Requesting more
    /// than one raises the chance of an unseen hit in a single round trip.
    #[serde(default = "default_batch_size")]
    pub batch_size: u8,

    /// Served-question threshold for proactive token resets: once more than
    /// this many questions have been served, the session token is reset and
    /// the seen-set cleared, bounding provider-side per-token state.
    #[serde(default = "default_token_soft_cap")]
    pub token_soft_cap: u32,

    /// Probability of overriding a recognized category (and, independently,
    /// a recognized difficulty) with a random supported value.
    #[serde(default = "default_variety_probability")]
    pub variety_probability: f64,

    /// Per-request timeout in seconds. Expiry surfaces as a
    /// provider-unreachable failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for OpenTdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            batch_size: default_batch_size(),
            token_soft_cap: default_token_soft_cap(),
            variety_probability: default_variety_probability(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://opentdb.com".to_string()
}

fn default_batch_size() -> u8 {
    10
}

fn default_token_soft_cap() -> u32 {
    100
}

fn default_variety_probability() -> f64 {
    0.10
}

fn default_request_timeout_secs() -> u64 {
    5
}
