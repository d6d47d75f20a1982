// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Trivet quiz engine.

use thiserror::Error;

/// The primary error type used across the Trivet question-sourcing core.
///
/// Provider-facing variants are non-fatal: the caller may always retry the
/// request later. The core never panics the host process; every provider
/// interaction failure is caught at the boundary and converted here.
#[derive(Debug, Error)]
pub enum TrivetError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failure, timeout, non-success HTTP status, or an
    /// unhandled provider error response code.
    #[error("provider unreachable: {message}")]
    ProviderUnreachable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider has no unseen question left for the requested filters,
    /// even after a token reset and retry.
    #[error("provider exhausted: no unseen question available for the requested filters")]
    ProviderExhausted,

    /// The provider response was missing required fields or was not
    /// parseable as JSON.
    #[error("malformed provider response: {message}")]
    MalformedResponse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrivetError {
    /// Wrap a transport-level error as [`TrivetError::ProviderUnreachable`].
    pub fn unreachable(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TrivetError::ProviderUnreachable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a decode-level error as [`TrivetError::MalformedResponse`].
    pub fn malformed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TrivetError::MalformedResponse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_variants_construct() {
        let _config = TrivetError::Config("test".into());
        let _unreachable = TrivetError::ProviderUnreachable {
            message: "test".into(),
            source: None,
        };
        let _exhausted = TrivetError::ProviderExhausted;
        let _malformed = TrivetError::MalformedResponse {
            message: "test".into(),
            source: None,
        };
        let _internal = TrivetError::Internal("test".into());
    }

    #[test]
    fn unreachable_carries_source() {
        let err = TrivetError::unreachable("connect refused", std::io::Error::other("boom"));
        match err {
            TrivetError::ProviderUnreachable { message, source } => {
                assert_eq!(message, "connect refused");
                assert!(source.is_some());
            }
            other => panic!("expected ProviderUnreachable, got {other:?}"),
        }
    }

    #[test]
    fn display_messages_are_stable() {
        let err = TrivetError::ProviderExhausted;
        assert!(err.to_string().contains("provider exhausted"));

        let err = TrivetError::MalformedResponse {
            message: "missing `results`".into(),
            source: None,
        };
        assert!(err.to_string().contains("missing `results`"));
    }
}
