// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Three-letter English month abbreviations.

const ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Looks up the month number (1-12) for a three-letter abbreviation.
///
/// Matching ignores surrounding whitespace and letter case. Full month
/// names are not accepted.
#[must_use]
pub fn month_from_abbreviation(abbreviation: &str) -> Option<u8> {
    let trimmed: &str = abbreviation.trim();
    ABBREVIATIONS
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(trimmed))
        .and_then(|index| u8::try_from(index + 1).ok())
}

/// Returns the abbreviation for a month number, falling back to `"Jan"`
/// for anything outside 1-12.
#[must_use]
pub fn abbreviation_for_month(month: u8) -> &'static str {
    usize::from(month)
        .checked_sub(1)
        .and_then(|index| ABBREVIATIONS.get(index))
        .copied()
        .unwrap_or(ABBREVIATIONS[0])
}
