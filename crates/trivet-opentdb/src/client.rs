// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Open Trivia Database API.
//!
//! Provides [`OpenTdbClient`] which handles request construction, the
//! question-batch endpoint (`api.php`), and the token-management endpoint
//! (`api_token.php`). Transport failures, timeouts, and non-success HTTP
//! statuses map to [`TrivetError::ProviderUnreachable`]; undecodable bodies
//! map to [`TrivetError::MalformedResponse`].

use std::time::Duration;

use tracing::debug;
use trivet_core::{Difficulty, TrivetError};

use crate::types::{BatchResponse, TokenResponse, RESPONSE_SUCCESS};

/// HTTP client for provider communication.
///
/// Holds a single shared connection pool, built once and reused across all
/// calls for the lifetime of the source.
#[derive(Debug, Clone)]
pub struct OpenTdbClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenTdbClient {
    /// Creates a new provider client.
    ///
    /// # Arguments
    /// * `base_url` - Provider base URL (no trailing slash)
    /// * `timeout` - Per-request timeout; expiry surfaces as `ProviderUnreachable`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TrivetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrivetError::ProviderUnreachable {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetches a batch of multiple-choice candidate questions.
    ///
    /// Category, difficulty, and token are applied server-side when present.
    /// The returned body still carries the provider `response_code`; the
    /// caller decides how to treat non-success codes.
    pub async fn fetch_batch(
        &self,
        amount: u8,
        category_id: Option<u16>,
        difficulty: Option<Difficulty>,
        token: Option<&str>,
    ) -> Result<BatchResponse, TrivetError> {
        let mut query: Vec<(&str, String)> = vec![
            ("amount", amount.to_string()),
            ("type", "multiple".to_string()),
        ];
        if let Some(id) = category_id {
            query.push(("category", id.to_string()));
        }
        if let Some(d) = difficulty {
            query.push(("difficulty", d.to_string()));
        }
        if let Some(t) = token {
            query.push(("token", t.to_string()));
        }

        let url = format!("{}/api.php", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| TrivetError::ProviderUnreachable {
                message: format!("question request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, amount, ?category_id, "batch response received");

        if !status.is_success() {
            return Err(TrivetError::ProviderUnreachable {
                message: format!("provider returned HTTP {status}"),
                source: None,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TrivetError::ProviderUnreachable {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })?;

        serde_json::from_str(&body).map_err(|e| TrivetError::MalformedResponse {
            message: format!("failed to parse batch response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Requests a fresh session token from the provider.
    pub async fn request_token(&self) -> Result<String, TrivetError> {
        let response = self
            .token_command(&[("command", "request")])
            .await?;

        match response.token {
            Some(token) if response.response_code == RESPONSE_SUCCESS => {
                debug!("session token issued");
                Ok(token)
            }
            _ => Err(TrivetError::MalformedResponse {
                message: format!(
                    "token request answered with code {} and no token",
                    response.response_code
                ),
                source: None,
            }),
        }
    }

    /// Resets an existing session token, emptying its served-question pool.
    ///
    /// The provider keeps the token value stable across resets; the returned
    /// string is the token to keep using.
    pub async fn reset_token(&self, token: &str) -> Result<String, TrivetError> {
        let response = self
            .token_command(&[("command", "reset"), ("token", token)])
            .await?;

        if response.response_code != RESPONSE_SUCCESS {
            return Err(TrivetError::ProviderUnreachable {
                message: format!(
                    "token reset answered with code {}",
                    response.response_code
                ),
                source: None,
            });
        }

        debug!("session token reset");
        Ok(response.token.unwrap_or_else(|| token.to_string()))
    }

    async fn token_command(
        &self,
        query: &[(&str, &str)],
    ) -> Result<TokenResponse, TrivetError> {
        let url = format!("{}/api_token.php", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| TrivetError::ProviderUnreachable {
                message: format!("token request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrivetError::ProviderUnreachable {
                message: format!("provider returned HTTP {status}"),
                source: None,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TrivetError::ProviderUnreachable {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })?;

        serde_json::from_str(&body).map_err(|e| TrivetError::MalformedResponse {
            message: format!("failed to parse token response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
