//! Rejection reasons for card numbers.
//!
//! The public `validate` entry point collapses all of these to `false`;
//! `check` keeps them apart for diagnostics.

use serde::Serialize;
use thiserror::Error;

/// Why a card number was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "details")]
pub enum CardError {
    /// The input holds something other than ASCII digits, spaces or hyphens.
    #[error("disallowed character {character:?} at byte {position}")]
    RejectedCharacters { character: char, position: usize },

    /// The Luhn sum is not divisible by 10.
    #[error("Luhn checksum failed")]
    ChecksumFailed,

    /// No network accepts this prefix and length combination.
    #[error("no known card network accepts a {length}-digit number with this prefix")]
    UnrecognizedNetwork { length: usize },
}
