// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The question-source trait the chat layer programs against.

use async_trait::async_trait;

use crate::error::TrivetError;
use crate::types::{FormattedQuestion, HealthStatus};

/// A source of previously-undelivered trivia questions.
///
/// Implementations own the provider session lifecycle (token acquisition and
/// reset), duplicate avoidance within the session scope, and graceful
/// degradation to typed failures. The caller owns everything user-facing:
/// rendering the question, building the answer UI, persistence, and scoring.
#[async_trait]
pub trait QuestionSource: Send + Sync + 'static {
    /// Returns the human-readable name of this source.
    fn name(&self) -> &str;

    /// Returns the semantic version of this source implementation.
    fn version(&self) -> semver::Version;

    /// Delivers one question not previously served in the current session
    /// scope, matching the requested category and difficulty.
    ///
    /// Unrecognized `category` or `difficulty` strings mean "no filter";
    /// the provider then picks freely. The call terminates with a success
    /// or one typed failure within a bounded number of provider round
    /// trips.
    async fn next_question(
        &self,
        category: &str,
        difficulty: &str,
    ) -> Result<FormattedQuestion, TrivetError>;

    /// Performs a health check against the provider.
    async fn health_check(&self) -> Result<HealthStatus, TrivetError>;

    /// Gracefully shuts down the source, releasing the shared connection
    /// resource. Called exactly once during orderly process shutdown.
    async fn shutdown(&self) -> Result<(), TrivetError>;
}
