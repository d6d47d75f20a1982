// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure normalization and formatting of provider questions.
//!
//! The provider HTML-entity encodes all text (`&amp;`, `&#039;`, `&quot;`,
//! ...). Normalization decodes every text field and parses the difficulty;
//! formatting builds the shuffled options sequence. Both are side-effect
//! free and testable independently of the stateful fetch logic.

use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use trivet_core::{Difficulty, FormattedQuestion, QuestionRecord, TrivetError};

use crate::types::ApiQuestion;

/// Decode HTML entities in a provider text field.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Normalize a raw provider question into a decoded [`QuestionRecord`].
///
/// Fails with [`TrivetError::MalformedResponse`] when the difficulty label
/// is outside the provider taxonomy or the answer set is empty.
pub fn normalize(raw: ApiQuestion) -> Result<QuestionRecord, TrivetError> {
    let difficulty = Difficulty::from_str(&raw.difficulty).map_err(|_| {
        TrivetError::MalformedResponse {
            message: format!("unknown difficulty label `{}`", raw.difficulty),
            source: None,
        }
    })?;

    if raw.incorrect_answers.is_empty() {
        return Err(TrivetError::MalformedResponse {
            message: "question has no incorrect answers".into(),
            source: None,
        });
    }

    Ok(QuestionRecord {
        text: decode_entities(&raw.question),
        correct_answer: decode_entities(&raw.correct_answer),
        incorrect_answers: raw
            .incorrect_answers
            .iter()
            .map(|a| decode_entities(a))
            .collect(),
        category: decode_entities(&raw.category),
        difficulty,
    })
}

/// Build the caller-facing question from a normalized record.
///
/// The options sequence contains all incorrect answers plus the correct
/// answer in an order produced by one full-strength Fisher-Yates shuffle,
/// so no position is biased toward the original correct-answer placement.
pub fn format_question<R: Rng + ?Sized>(
    record: &QuestionRecord,
    rng: &mut R,
) -> FormattedQuestion {
    let mut options: Vec<String> = record
        .incorrect_answers
        .iter()
        .cloned()
        .chain(std::iter::once(record.correct_answer.clone()))
        .collect();
    options.shuffle(rng);

    FormattedQuestion {
        question: record.text.clone(),
        answer: record.correct_answer.clone(),
        options,
        quiz_type: record.category.clone(),
        difficulty: record.difficulty,
    }
}
