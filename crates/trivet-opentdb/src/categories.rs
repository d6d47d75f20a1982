// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed mapping from bot category keys to Open Trivia Database category ids.
//!
//! Categories outside this table pass through as "no category filter" -- the
//! provider then picks from all categories.

use rand::seq::SliceRandom;
use rand::Rng;

/// Bot category key -> provider category id.
pub const CATEGORY_TABLE: [(&str, u16); 6] = [
    ("general", 9),        // General Knowledge
    ("science", 17),       // Science & Nature
    ("history", 23),       // History
    ("geography", 22),     // Geography
    ("sports", 21),        // Sports
    ("entertainment", 11), // Entertainment: Film
];

/// Look up the provider id for a bot category key.
///
/// Returns `None` for unrecognized keys, which callers treat as
/// "no category filter".
pub fn category_id(key: &str) -> Option<u16> {
    CATEGORY_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, id)| *id)
}

/// All supported bot category keys.
pub fn supported_keys() -> impl Iterator<Item = &'static str> {
    CATEGORY_TABLE.iter().map(|(name, _)| *name)
}

/// Pick a uniformly random provider category id from the supported table.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    CATEGORY_TABLE.choose(rng).map(|(_, id)| *id).unwrap_or(9)
}

/// Pick a uniformly random provider category id different from `current`.
///
/// Used for the single category-switch retry when every candidate in a
/// batch has already been seen.
pub fn random_id_excluding<R: Rng + ?Sized>(rng: &mut R, current: Option<u16>) -> u16 {
    let candidates: Vec<u16> = CATEGORY_TABLE
        .iter()
        .map(|(_, id)| *id)
        .filter(|id| Some(*id) != current)
        .collect();
    candidates.choose(rng).copied().unwrap_or(9)
}
