//! Input normalization
//!
//! Strips spaces and hyphens from a raw card number, rejecting anything else
//! that is not an ASCII digit.

use std::borrow::Cow;

use memchr::memchr2;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CardError;

/// First character that is neither an ASCII digit, a space nor a hyphen.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9 \-]").unwrap());

/// Result of normalizing a raw input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<'a> {
    /// The input was the empty string. Callers treat this as valid.
    Empty,
    /// The input reduced to a (possibly zero-length) run of digits.
    Digits(NormalizedDigits<'a>),
}

/// Decimal digits of a card number with separators removed, in input order.
///
/// Borrows from the input when it carried no separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDigits<'a>(Cow<'a, str>);

impl<'a> NormalizedDigits<'a> {
    /// Wrap a string that is already known to be digits only.
    ///
    /// Returns `None` if any character is not an ASCII digit.
    pub fn new(digits: &'a str) -> Option<Self> {
        digits
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then_some(Self(Cow::Borrowed(digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric digit values, left to right.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = u32> + '_ {
        self.0.bytes().map(|b| u32::from(b - b'0'))
    }
}

/// Normalize a raw card number.
///
/// The empty string short-circuits to [`Normalized::Empty`]. Any character
/// other than `0-9`, space or `-` is rejected. Otherwise separators are
/// stripped; no length bound is applied here, so `"--"` yields zero digits.
pub fn normalize(input: &str) -> Result<Normalized<'_>, CardError> {
    if input.is_empty() {
        return Ok(Normalized::Empty);
    }

    if let Some(found) = DISALLOWED.find(input) {
        return Err(CardError::RejectedCharacters {
            character: found.as_str().chars().next().unwrap_or_default(),
            position: found.start(),
        });
    }

    let digits = if memchr2(b' ', b'-', input.as_bytes()).is_none() {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(
            input
                .bytes()
                .filter(u8::is_ascii_digit)
                .map(char::from)
                .collect(),
        )
    };

    Ok(Normalized::Digits(NormalizedDigits(digits)))
}
