// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trivet ask` command implementation.
//!
//! Builds the OpenTDB question source, fetches one question with the
//! requested filters, prints it, and releases the source.

use tracing::info;
use trivet_config::TrivetConfig;
use trivet_core::{QuestionSource, TrivetError};
use trivet_opentdb::OpenTdbSource;

/// Runs the `trivet ask` command.
pub async fn run_ask(
    config: TrivetConfig,
    category: &str,
    difficulty: &str,
) -> Result<(), TrivetError> {
    let source = OpenTdbSource::new(&config.opentdb)?;
    info!(
        source = source.name(),
        category, difficulty, "fetching question"
    );

    let question = source.next_question(category, difficulty).await?;

    println!("[{} / {}]", question.quiz_type, question.difficulty);
    println!("{}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    println!();
    println!("answer: {}", question.answer);

    source.shutdown().await?;
    Ok(())
}
