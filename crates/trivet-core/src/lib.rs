// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Trivet quiz engine.
//!
//! This crate provides the error taxonomy, the domain types exchanged with
//! the chat layer, and the [`QuestionSource`] trait that question providers
//! implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TrivetError;
pub use traits::QuestionSource;
pub use types::{Difficulty, Fingerprint, FormattedQuestion, HealthStatus, QuestionRecord};
