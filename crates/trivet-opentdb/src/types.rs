// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Open Trivia Database JSON API.
//!
//! Response bodies carry a numeric `response_code`: 0 means success, 4 means
//! the session token's question pool is exhausted for the current filters,
//! and everything else is a provider-side error.

use serde::Deserialize;

/// The token's question pool for the current filters has been served in full.
pub const RESPONSE_TOKEN_EXHAUSTED: u8 = 4;

/// Request succeeded and `results` is populated.
pub const RESPONSE_SUCCESS: u8 = 0;

/// A raw question as delivered by the provider, HTML-entity encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiQuestion {
    pub category: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// Response body of the question-batch endpoint (`api.php`).
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<ApiQuestion>,
}

/// Response body of the token-management endpoint (`api_token.php`).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub response_code: u8,
    #[serde(default)]
    pub token: Option<String>,
}
