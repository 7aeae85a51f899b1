//! Deterministic daily seed and per-action draw derivation.
//! Seed: char-code sum of the canonical day string, e.g. "Wed Nov 19 2025" -> 998.

use chrono::{Local, NaiveDate};

use crate::constants::{DAY_STRING_FORMAT, SINE_HASH_SCALE};

/// Local calendar date, the crate's only clock access. Hosts pass the result
/// (or any other date) into the engine explicitly, which keeps every other
/// function replayable.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Day-level string representation shared by seeding, the daily lock, and
/// share text: `"Wed Nov 19 2025"`. English abbreviations, zero-padded day,
/// no time component, so every client derives the same string for a given
/// local calendar day.
#[must_use]
pub fn canonical_day_string(date: NaiveDate) -> String {
    date.format(DAY_STRING_FORMAT).to_string()
}

/// Sum of the character codes of `text`, wrapping on overflow.
#[must_use]
pub fn char_sum(text: &str) -> u32 {
    text.chars().map(|c| c as u32).fold(0, u32::wrapping_add)
}

/// Seed for an already-formatted day string.
#[must_use]
pub fn day_string_seed(day: &str) -> u32 {
    char_sum(day)
}

/// Daily seed for a calendar date. Identical for all players on the same
/// day; never incorporates time-of-day or machine randomness.
#[must_use]
pub fn daily_seed(date: NaiveDate) -> u32 {
    day_string_seed(&canonical_day_string(date))
}

/// Deterministic per-action draw in `[0, 1)`.
///
/// Combines the daily seed with the action name's character codes and the
/// occurrence index, then extracts the fraction of `|sin(combined) * 10000|`.
/// This is a reproducibility hash, not a cryptographic one; the exact
/// mapping is a compatibility contract (every client must reproduce the
/// same draw for the same triple), so the transform must not change.
#[must_use]
pub fn action_seed(action: &str, occurrence: u32, daily_seed: u32) -> f64 {
    let combined = daily_seed
        .wrapping_add(char_sum(action))
        .wrapping_add(occurrence);
    (f64::from(combined).sin() * SINE_HASH_SCALE).abs().fract()
}
