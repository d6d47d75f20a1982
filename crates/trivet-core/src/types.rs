// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the question-sourcing engine and its callers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Question difficulty as defined by the provider taxonomy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulty levels, in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// A normalized provider question, immutable once produced.
///
/// All text fields have had HTML entities decoded. The `category` is the
/// provider's own taxonomy label, distinct from the bot-facing category keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Human-readable question prompt.
    pub text: String,
    /// The single correct answer.
    pub correct_answer: String,
    /// The incorrect answers (typically 3).
    pub incorrect_answers: Vec<String>,
    /// Provider-defined category label.
    pub category: String,
    /// Difficulty level.
    pub difficulty: Difficulty,
}

/// The question shape handed to the caller, ready for rendering.
///
/// Invariant: `options` contains `answer` exactly once (case-sensitive) and
/// has length `incorrect_answers.len() + 1`, in randomized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedQuestion {
    /// The question prompt.
    pub question: String,
    /// The correct answer.
    pub answer: String,
    /// All answer options in randomized order.
    pub options: Vec<String>,
    /// Provider category label, for display only.
    pub quiz_type: String,
    /// Difficulty level.
    pub difficulty: Difficulty,
}

/// Composite dedup key for a delivered question.
///
/// Built from question text, category, and difficulty so duplicates are
/// detected without relying on any provider-issued identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    question: String,
    category: String,
    difficulty: Difficulty,
}

impl Fingerprint {
    /// Compute the fingerprint of a normalized question record.
    pub fn of(record: &QuestionRecord) -> Self {
        Self {
            question: record.text.clone(),
            category: record.category.clone(),
            difficulty: record.difficulty,
        }
    }
}

/// Health status reported by source health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Source is fully operational.
    Healthy,
    /// Source is operational but experiencing issues.
    Degraded(String),
    /// Source is not operational.
    Unhealthy(String),
}
