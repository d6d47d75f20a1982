// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Open Trivia Database question source for the Trivet quiz engine.
//!
//! Implements the [`trivet_core::QuestionSource`] trait against the OpenTDB
//! HTTP API: session-token lifecycle, client-side duplicate avoidance,
//! variety perturbation of repeated filter choices, HTML-entity
//! normalization, and bounded retry on pool exhaustion.

pub mod categories;
pub mod client;
pub mod format;
pub mod source;
pub mod types;

pub use categories::{category_id, supported_keys, CATEGORY_TABLE};
pub use client::OpenTdbClient;
pub use format::{decode_entities, format_question, normalize};
pub use source::OpenTdbSource;
