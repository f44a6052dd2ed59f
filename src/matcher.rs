//! Sequence alignment of patterns against phone feature sequences
//!
//! A pattern is aligned position by position with a window of the word's
//! feature sequence. Where the window sits depends on the [`Mode`]: at the
//! start of the word, at its end, or anywhere inside it.

use std::fmt;
use std::str::FromStr;

use crate::feature::{FeatureVector, compare};
use crate::pattern::{Pattern, PositionConstraint};

/// Where in the word the pattern must align
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    StartsWith,
    EndsWith,
    #[default]
    Contains,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::StartsWith, Mode::EndsWith, Mode::Contains];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::StartsWith => "STARTS_WITH",
            Mode::EndsWith => "ENDS_WITH",
            Mode::Contains => "CONTAINS",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized mode name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid mode {:?}: choose from STARTS_WITH, ENDS_WITH, CONTAINS",
            self.0
        )
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    /// Accepts the canonical names case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Check one position of the pattern against one phone
///
/// Every constrained feature must compare true. A feature the phone does not
/// carry fails the check.
fn position_matches(position: &PositionConstraint, phone: &FeatureVector) -> bool {
    position.iter().all(|(name, expected)| {
        phone
            .get(name)
            .is_some_and(|actual| compare(expected, actual))
    })
}

/// Align a pattern with the front of a word sequence
///
/// Both sides are walked in lockstep, so reversed iterators align the
/// pattern's last position with the word's last phone.
pub fn aligned_match<'a, 'p, W, P>(word: W, pattern: P) -> bool
where
    W: ExactSizeIterator<Item = &'a FeatureVector>,
    P: ExactSizeIterator<Item = &'p PositionConstraint>,
{
    if word.len() < pattern.len() {
        return false;
    }

    pattern
        .zip(word)
        .filter(|(position, _)| !position.is_wildcard())
        .all(|(position, phone)| position_matches(position, phone))
}

/// Whether a word's feature sequence matches the pattern under a mode
///
/// The pattern is only read; matching never reorders or mutates it.
pub fn matches(sequence: &[&FeatureVector], pattern: &Pattern, mode: Mode) -> bool {
    let positions = pattern.positions();
    if positions.is_empty() {
        return true;
    }
    if sequence.len() < positions.len() {
        return false;
    }

    match mode {
        Mode::StartsWith => aligned_match(sequence.iter().copied(), positions.iter()),
        Mode::EndsWith => aligned_match(sequence.iter().rev().copied(), positions.iter().rev()),
        Mode::Contains => sequence
            .windows(positions.len())
            .any(|window| aligned_match(window.iter().copied(), positions.iter())),
    }
}
