// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for pluggable question sources.

pub mod source;

pub use source::QuestionSource;
