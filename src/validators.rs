//! Validation functions for card numbers
//!
//! Fast implementations of the Luhn checksum and the full
//! normalize → checksum → network pipeline.

use rayon::prelude::*;
use tracing::trace;

use crate::error::CardError;
use crate::networks::{first_match, Network};
use crate::normalize::{normalize, Normalized, NormalizedDigits};

/// Outcome of a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Empty input. Accepted; "required" semantics belong to the caller.
    Empty,
    /// Passed the checksum and matched this network (first in table order).
    Recognized(Network),
}

impl Verdict {
    pub fn network(self) -> Option<Network> {
        match self {
            Verdict::Empty => None,
            Verdict::Recognized(network) => Some(network),
        }
    }
}

/// Luhn checksum over already-normalized digits.
///
/// Zero digits sum to 0 and therefore pass.
pub fn luhn_valid(digits: &NormalizedDigits<'_>) -> bool {
    let sum: u64 = digits
        .values()
        .rev()
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .map(u64::from)
        .sum();

    sum % 10 == 0
}

/// Validate a raw card number using the Luhn algorithm only
///
/// Input without digits (`""`, `"--"`) sums to zero and returns true.
pub fn luhn(number: &str) -> bool {
    match normalize(number) {
        Ok(Normalized::Empty) => true,
        Ok(Normalized::Digits(digits)) => luhn_valid(&digits),
        Err(_) => false,
    }
}

/// Run the full pipeline and report why a number was rejected.
pub fn check(input: &str) -> Result<Verdict, CardError> {
    let digits = match normalize(input) {
        Ok(Normalized::Empty) => return Ok(Verdict::Empty),
        Ok(Normalized::Digits(digits)) => digits,
        Err(err) => {
            trace!(%err, input_len = input.len(), "card number rejected");
            return Err(err);
        }
    };

    if !luhn_valid(&digits) {
        trace!(digits = digits.len(), "card number failed Luhn checksum");
        return Err(CardError::ChecksumFailed);
    }

    match first_match(&digits) {
        Some(network) => Ok(Verdict::Recognized(network)),
        None => {
            trace!(digits = digits.len(), "card number matched no known network");
            Err(CardError::UnrecognizedNetwork {
                length: digits.len(),
            })
        }
    }
}

/// True for the empty string or a checksum-valid number of a known network.
pub fn validate(input: &str) -> bool {
    check(input).is_ok()
}

/// Network that accepted the number, if any.
pub fn detect_network(input: &str) -> Option<Network> {
    check(input).ok().and_then(Verdict::network)
}

/// Validate many numbers in parallel. Output order follows input order.
pub fn validate_batch<S>(inputs: &[S]) -> Vec<bool>
where
    S: AsRef<str> + Sync,
{
    inputs.par_iter().map(|s| validate(s.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn d(s: &str) -> NormalizedDigits<'_> {
        NormalizedDigits::new(s).unwrap()
    }

    #[test]
    fn test_luhn_valid() {
        assert!(luhn_valid(&d("4111111111111111"))); // Visa test
        assert!(luhn_valid(&d("5555555555554444"))); // Mastercard test
        assert!(luhn_valid(&d("378282246310005"))); // Amex test
        assert!(luhn_valid(&d(""))); // Zero digits sum to zero
        assert!(luhn("4111-1111-1111-1111")); // With dashes
        assert!(luhn("1234 5678 9012 8")); // No length gating
    }

    #[test]
    fn test_luhn_invalid() {
        assert!(!luhn_valid(&d("4111111111111112"))); // Wrong check digit
        assert!(!luhn_valid(&d("4532123456789010")));
        assert!(!luhn("4111 1111 1111 111x")); // Not numbers
        assert!(!luhn("abcd"));
    }

    #[test]
    fn test_luhn_without_digits() {
        assert!(luhn(""));
        assert!(luhn("--"));
        assert!(luhn("   "));
    }

    /// Collects formatted trace output for assertions.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn traced(input: &str) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _ = check(input);
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_rejections_log_length_not_number() {
        let out = traced("4111 x");
        assert!(out.contains("card number rejected"), "{out}");
        assert!(out.contains("input_len=6"), "{out}");

        let out = traced("4111-1111-1111-1112");
        assert!(out.contains("digits=16"), "{out}");
        assert!(!out.contains("4111"), "{out}");

        let out = traced("5900000000000000");
        assert!(out.contains("matched no known network"), "{out}");
        assert!(out.contains("digits=16"), "{out}");
    }

    #[test]
    fn test_empty_is_valid() {
        assert!(validate(""));
        assert_eq!(check(""), Ok(Verdict::Empty));
        assert_eq!(detect_network(""), None);
    }

    #[test]
    fn test_rejected_characters() {
        assert!(!validate("not a number"));
        assert!(matches!(
            check("not a number"),
            Err(CardError::RejectedCharacters { position: 0, .. })
        ));
        assert!(!validate("4111.1111.1111.1111"));
    }

    #[test]
    fn test_checksum_failed() {
        assert!(!validate("4111-1111-1111-1112"));
        assert_eq!(check("4111-1111-1111-1112"), Err(CardError::ChecksumFailed));
    }

    #[test]
    fn test_known_networks() {
        let cases = [
            ("4111 1111 1111 1111", Network::Visa),
            ("340000000000009", Network::AmericanExpress),
            ("3782-822463-10005", Network::AmericanExpress),
            ("30569309025904", Network::DinersClub),
            ("6011 1111 1111 1117", Network::Discover),
            ("6011000990139424", Network::Discover),
            ("3530111333300000", Network::Jcb),
            ("352800000000000007", Network::Laser),
            ("501800000009", Network::Maestro),
            ("5555555555554444", Network::DinersClubUs),
            ("6767000000000000", Network::Solo),
            ("6334000000000000007", Network::Solo),
            ("6222000000000000004", Network::Unionpay),
        ];
        for (number, network) in cases {
            assert!(validate(number), "{number}");
            assert_eq!(detect_network(number), Some(network), "{number}");
        }
    }

    #[test]
    fn test_luhn_valid_but_unrecognized() {
        // Passes Luhn, but no network claims prefix 59.
        assert!(luhn("5900000000000000"));
        assert!(!validate("5900000000000000"));
        assert_eq!(
            check("5900000000000000"),
            Err(CardError::UnrecognizedNetwork { length: 16 })
        );
        // Visa prefix, Luhn-valid, wrong length.
        assert!(luhn("4222222222222"));
        assert!(!validate("4222222222222"));
    }

    #[test]
    fn test_separators_only() {
        for input in ["-", "--", "  ", " - - "] {
            assert!(!validate(input), "{input:?}");
            assert_eq!(
                check(input),
                Err(CardError::UnrecognizedNetwork { length: 0 })
            );
        }
    }

    #[test]
    fn test_validate_batch() {
        let inputs = vec![
            "4111111111111111",
            "",
            "4111111111111112",
            "not a number",
            "340000000000009",
        ];
        assert_eq!(
            validate_batch(&inputs),
            vec![true, true, false, false, true]
        );

        let owned: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        assert_eq!(validate_batch(&owned), validate_batch(&inputs));
        assert!(validate_batch::<&str>(&[]).is_empty());
    }

    /// Append the digit that makes `body` Luhn-valid.
    fn with_check_digit(body: &str) -> String {
        (0..=9)
            .map(|c| format!("{body}{c}"))
            .find(|n| luhn_valid(&d(n)))
            .unwrap()
    }

    proptest! {
        /// Validation is a pure function of its input.
        #[test]
        fn validate_is_pure(input in "\\PC{0,24}") {
            prop_assert_eq!(check(&input), check(&input));
            prop_assert_eq!(validate(&input), validate(&input));
        }

        /// Grouping digits with spaces or hyphens never changes the outcome.
        #[test]
        fn separators_are_ignored(digits in "[0-9]{1,19}", hyphen in any::<bool>()) {
            let sep = if hyphen { "-" } else { " " };
            let grouped = digits
                .as_bytes()
                .chunks(4)
                .map(|chunk| std::str::from_utf8(chunk).unwrap())
                .collect::<Vec<_>>()
                .join(sep);
            prop_assert_eq!(check(&grouped), check(&digits));
        }

        /// Luhn catches every single-digit substitution.
        #[test]
        fn luhn_detects_single_digit_change(
            body in "[0-9]{1,18}",
            pos in any::<prop::sample::Index>(),
            bump in 1u8..10,
        ) {
            let valid = with_check_digit(&body);
            prop_assert!(luhn_valid(&d(&valid)));

            let mut bytes = valid.into_bytes();
            let i = pos.index(bytes.len());
            bytes[i] = b'0' + (bytes[i] - b'0' + bump) % 10;
            let tampered = String::from_utf8(bytes).unwrap();
            prop_assert!(!luhn_valid(&d(&tampered)));
        }
    }
}
