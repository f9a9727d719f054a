//! Python bindings, built with the `python` feature.

use pyo3::prelude::*;

use crate::validators;

/// cardcheck native extension module
#[pymodule]
fn cardcheck(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(validate_credit_card, m)?)?;
    m.add_function(wrap_pyfunction!(detect_card_network, m)?)?;
    m.add_function(wrap_pyfunction!(validate_credit_cards, m)?)?;
    m.add_function(wrap_pyfunction!(validate_luhn, m)?)?;
    m.add_function(wrap_pyfunction!(is_native_available, m)?)?;
    Ok(())
}

/// Validate a credit card number: characters, Luhn checksum and network
#[pyfunction]
fn validate_credit_card(number: &str) -> bool {
    validators::validate(number)
}

/// Name of the card network that accepts the number, or None
#[pyfunction]
fn detect_card_network(number: &str) -> Option<&'static str> {
    validators::detect_network(number).map(|network| network.name())
}

/// Validate many numbers in parallel with the GIL released
#[pyfunction]
fn validate_credit_cards(py: Python<'_>, numbers: Vec<String>) -> Vec<bool> {
    py.allow_threads(|| validators::validate_batch(&numbers))
}

/// Validate credit card number using Luhn algorithm
#[pyfunction]
fn validate_luhn(number: &str) -> bool {
    validators::luhn(number)
}

/// Check if native extension is working
#[pyfunction]
fn is_native_available() -> bool {
    true
}
