//! Station (chainage) notation.
//!
//! Alignment reports write stations as `H+RR.rr`: a count of hundreds, a `+`
//! separator and the remainder. `641+44.67` is the absolute chainage
//! `64144.67`. Values below one hundred are written as plain decimals.
//!
//! [`parse`] never fails and yields `0.0` for malformed text; [`try_parse`]
//! is the fallible form for callers that must tell "zero" from "unparsable".
//!
//! # Example
//!
//! ```
//! use geotable_core::station;
//!
//! assert_eq!(station::format(station::parse("642+07.29")), "642+07.29");
//! assert_eq!(station::format(50.5), "50.50");
//! ```

use thiserror::Error;

/// Number of chainage units represented by the token left of the `+`.
const HUNDRED: f64 = 100.0;

/// Error returned by [`try_parse`] for text that is not a station.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StationError {
    #[error("station text is empty")]
    Empty,

    #[error("`{token}` is not a number in station `{text}`")]
    NotANumber { text: String, token: String },
}

/// Parse station text into an absolute chainage, falling back to `0.0`.
pub fn parse(text: &str) -> f64 {
    try_parse(text).unwrap_or(0.0)
}

/// Parse station text into an absolute chainage.
///
/// Text containing a `+` is split on the first `+`; the left token counts
/// hundreds and the right token is the remainder. Text without a `+` is read
/// as a plain decimal.
///
/// # Errors
///
/// Returns [`StationError`] when the text is empty or any token is not a
/// finite decimal number.
pub fn try_parse(text: &str) -> Result<f64, StationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StationError::Empty);
    }

    match text.split_once('+') {
        Some((hundreds, remainder)) => {
            let hundreds = number(text, hundreds)?;
            let remainder = number(text, remainder)?;
            Ok(hundreds * HUNDRED + remainder)
        }
        None => number(text, text),
    }
}

/// Format an absolute chainage in station notation.
///
/// Values of one hundred or more become `{hundreds}+{remainder}` with the
/// remainder zero-padded to `RR.rr`; smaller values keep two decimals.
pub fn format(value: f64) -> String {
    // Whole cents, so a remainder of 99.996 carries into the hundreds.
    let cents = (value * HUNDRED).round();
    let cents_per_hundred = HUNDRED * HUNDRED;
    if cents >= cents_per_hundred {
        let hundreds = (cents / cents_per_hundred).floor();
        let remainder = (cents - hundreds * cents_per_hundred) / HUNDRED;
        format!("{hundreds:.0}+{remainder:05.2}")
    } else {
        format!("{:.2}", cents / HUNDRED)
    }
}

fn number(text: &str, token: &str) -> Result<f64, StationError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| StationError::NotANumber {
            text: text.to_string(),
            token: token.trim().to_string(),
        })
}
