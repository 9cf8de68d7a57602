//! Splits free-form text into `(number, unit)` segments.
//!
//! `"1h 5min"` becomes `[(1.0, "h"), (5.0, "min")]`. Text between segments is
//! skipped, and unit tokens are lowercased so `"KG"` and `"kg"` are the same
//! unit.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// A numeral, optional whitespace, then a run of letters, quotes or parens.
///
/// Quotes cover feet/inches (`6'0"`), parens cover food units like `egg(l)`.
static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(-?[0-9.]+)\s*([A-Za-z"'()]+)"#).expect("segment pattern is valid")
});

/// One numeric value followed by its unit token
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub value: f64,
    pub unit: String,
}

/// Split `input` into its numeral/unit segments, in order of appearance.
///
/// Fails with [`Error::NoMatch`] when no segment is found, or when a matched
/// numeral is not a number (e.g. `"1.2.3kg"`).
pub fn split_units(input: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();

    for caps in SEGMENT_RE.captures_iter(input) {
        let value = caps[1].parse::<f64>().map_err(|_| Error::NoMatch {
            input: input.to_string(),
        })?;
        segments.push(Segment {
            value,
            unit: caps[2].trim().to_lowercase(),
        });
    }

    if segments.is_empty() {
        return Err(Error::NoMatch {
            input: input.to_string(),
        });
    }

    Ok(segments)
}
