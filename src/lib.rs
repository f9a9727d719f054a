//! Native credit card number validation
//!
//! A number is valid when it is empty, or when it holds only digits, spaces
//! and hyphens, passes the Luhn checksum, and matches the prefix and length
//! signature of a known card network.
//!
//! With the `python` feature the crate also builds as a Python extension
//! module; the batch entry point releases the GIL and validates in parallel.

mod error;
mod networks;
mod normalize;
mod validators;

#[cfg(feature = "python")]
mod python;

pub use error::CardError;
pub use networks::{
    first_match, matches_known_network, matching_networks, networks, Network, NetworkSpec,
};
pub use normalize::{normalize, Normalized, NormalizedDigits};
pub use validators::{
    check, detect_network, luhn, luhn_valid, validate, validate_batch, Verdict,
};
