//! Picks the quantity type of an untyped string.
//!
//! Parsers are tried in a fixed priority order and the first success wins:
//!
//! 1. **Mass**
//! 2. **Length**: claims a bare `m` as meters, so `"5m"` is never 5 minutes
//! 3. **Energy**
//! 4. **Duration**: claims `H:MM`, so `"01:05"` is 65 minutes, not a clock time
//! 5. **Time**
//! 6. **Sex**
//! 7. **Activity**: the loosest grammar (any leading numeral), so it goes last
//!
//! Persisted data depends on this order. Changing it changes how existing
//! files load.

use crate::quantity::{Activity, Duration, Energy, Length, Mass, Quantity, QuantityKind, Sex, Time};
use crate::{Error, Result};

type Parser = fn(&str) -> Result<Quantity>;

/// The resolver's priority list
pub const RESOLUTION_ORDER: [(QuantityKind, Parser); 7] = [
    (QuantityKind::Mass, parse_mass),
    (QuantityKind::Length, parse_length),
    (QuantityKind::Energy, parse_energy),
    (QuantityKind::Duration, parse_duration),
    (QuantityKind::Time, parse_time),
    (QuantityKind::Sex, parse_sex),
    (QuantityKind::Activity, parse_activity),
];

fn parse_mass(s: &str) -> Result<Quantity> {
    s.parse::<Mass>().map(Quantity::Mass)
}

fn parse_length(s: &str) -> Result<Quantity> {
    s.parse::<Length>().map(Quantity::Length)
}

fn parse_energy(s: &str) -> Result<Quantity> {
    s.parse::<Energy>().map(Quantity::Energy)
}

fn parse_duration(s: &str) -> Result<Quantity> {
    s.parse::<Duration>().map(Quantity::Duration)
}

fn parse_time(s: &str) -> Result<Quantity> {
    s.parse::<Time>().map(Quantity::Time)
}

fn parse_sex(s: &str) -> Result<Quantity> {
    s.parse::<Sex>().map(Quantity::Sex)
}

fn parse_activity(s: &str) -> Result<Quantity> {
    s.parse::<Activity>().map(Quantity::Activity)
}

/// Resolve `input` to the first quantity type whose grammar accepts it.
///
/// Fails with [`Error::UnrecognizedQuantity`] when every type rejects it.
pub fn resolve(input: &str) -> Result<Quantity> {
    for (kind, parse) in RESOLUTION_ORDER.iter() {
        match parse(input) {
            Ok(quantity) => {
                tracing::debug!("Resolved {:?} as {}", input, kind);
                return Ok(quantity);
            }
            Err(e) => tracing::trace!("{:?} is not a {}: {}", input, kind, e),
        }
    }

    Err(Error::UnrecognizedQuantity {
        input: input.to_string(),
    })
}
