// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as probability ranges and batch size bounds.

use crate::diagnostic::ConfigError;
use crate::model::TrivetConfig;

/// The provider rejects batch requests for more than 50 questions.
const MAX_BATCH_SIZE: u8 = 50;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TrivetConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bot.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "bot.name must not be empty".to_string(),
        });
    }

    if config.opentdb.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "opentdb.base_url must not be empty".to_string(),
        });
    }

    if config.opentdb.batch_size < 1 || config.opentdb.batch_size > MAX_BATCH_SIZE {
        errors.push(ConfigError::Validation {
            message: format!(
                "opentdb.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                config.opentdb.batch_size
            ),
        });
    }

    if config.opentdb.token_soft_cap < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "opentdb.token_soft_cap must be at least 1, got {}",
                config.opentdb.token_soft_cap
            ),
        });
    }

    if !(0.0..=1.0).contains(&config.opentdb.variety_probability) {
        errors.push(ConfigError::Validation {
            message: format!(
                "opentdb.variety_probability must be within [0.0, 1.0], got {}",
                config.opentdb.variety_probability
            ),
        });
    }

    if config.opentdb.request_timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "opentdb.request_timeout_secs must be at least 1, got {}",
                config.opentdb.request_timeout_secs
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = TrivetConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_base_url_fails_validation() {
        let mut config = TrivetConfig::default();
        config.opentdb.base_url = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))));
    }

    #[test]
    fn out_of_range_probability_fails_validation() {
        let mut config = TrivetConfig::default();
        config.opentdb.variety_probability = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("variety_probability"))));
    }

    #[test]
    fn oversized_batch_fails_validation() {
        let mut config = TrivetConfig::default();
        config.opentdb.batch_size = 51;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("batch_size"))));
    }

    #[test]
    fn zero_batch_fails_validation() {
        let mut config = TrivetConfig::default();
        config.opentdb.batch_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = TrivetConfig::default();
        config.opentdb.batch_size = 0;
        config.opentdb.variety_probability = -0.1;
        config.opentdb.token_soft_cap = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = TrivetConfig::default();
        config.opentdb.batch_size = 50;
        config.opentdb.variety_probability = 0.0;
        config.opentdb.token_soft_cap = 1;
        assert!(validate_config(&config).is_ok());
    }
}
