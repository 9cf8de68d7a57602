//! Strongly-typed physical quantities.
//!
//! Each type holds exactly one canonical scalar (seconds, meters, kilograms,
//! joules, ...). Unit-specific accessors are derived from it on demand. Values
//! are parsed from free-form text with [`std::str::FromStr`] and rendered back
//! with [`std::fmt::Display`]; the rendered string is what gets persisted.

mod activity;
mod duration;
mod energy;
mod length;
mod mass;
mod sex;
mod time;

pub use activity::{Activity, ActivityBand};
pub use duration::Duration;
pub use energy::Energy;
pub use length::Length;
pub use mass::Mass;
pub use sex::Sex;
pub use time::Time;

use crate::tokenizer::split_units;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names each quantity type, for diagnostics and type checks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    Mass,
    Length,
    Energy,
    Duration,
    Time,
    Sex,
    Activity,
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuantityKind::Mass => "mass",
            QuantityKind::Length => "length",
            QuantityKind::Energy => "energy",
            QuantityKind::Duration => "duration",
            QuantityKind::Time => "time",
            QuantityKind::Sex => "sex",
            QuantityKind::Activity => "activity",
        };
        f.write_str(name)
    }
}

/// A value of any quantity type, as produced by the resolver
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Quantity {
    Mass(Mass),
    Length(Length),
    Energy(Energy),
    Duration(Duration),
    Time(Time),
    Sex(Sex),
    Activity(Activity),
}

impl Quantity {
    pub fn kind(&self) -> QuantityKind {
        match self {
            Quantity::Mass(_) => QuantityKind::Mass,
            Quantity::Length(_) => QuantityKind::Length,
            Quantity::Energy(_) => QuantityKind::Energy,
            Quantity::Duration(_) => QuantityKind::Duration,
            Quantity::Time(_) => QuantityKind::Time,
            Quantity::Sex(_) => QuantityKind::Sex,
            Quantity::Activity(_) => QuantityKind::Activity,
        }
    }

    pub fn as_mass(&self) -> Option<Mass> {
        match self {
            Quantity::Mass(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_length(&self) -> Option<Length> {
        match self {
            Quantity::Length(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_energy(&self) -> Option<Energy> {
        match self {
            Quantity::Energy(e) => Some(*e),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Quantity::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<Time> {
        match self {
            Quantity::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_sex(&self) -> Option<Sex> {
        match self {
            Quantity::Sex(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_activity(&self) -> Option<Activity> {
        match self {
            Quantity::Activity(a) => Some(*a),
            _ => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Mass(v) => v.fmt(f),
            Quantity::Length(v) => v.fmt(f),
            Quantity::Energy(v) => v.fmt(f),
            Quantity::Duration(v) => v.fmt(f),
            Quantity::Time(v) => v.fmt(f),
            Quantity::Sex(v) => v.fmt(f),
            Quantity::Activity(v) => v.fmt(f),
        }
    }
}

impl std::str::FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::resolver::resolve(s)
    }
}

impl TryFrom<String> for Quantity {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> String {
        q.to_string()
    }
}

/// Sum the segments of `input`, converting each with `convert`.
///
/// `convert` maps a value in the segment's unit to the canonical unit, or
/// returns `None` for a unit the type does not know.
pub(crate) fn sum_segments<F>(input: &str, kind: QuantityKind, convert: F) -> Result<f64>
where
    F: Fn(f64, &str) -> Option<f64>,
{
    let segments = split_units(input).map_err(|_| Error::invalid(input, kind))?;

    segments.iter().try_fold(0.0, |total, segment| {
        convert(segment.value, &segment.unit)
            .map(|v| total + v)
            .ok_or_else(|| Error::invalid_unit(input, kind, &segment.unit))
    })
}

/// Render `value` rounded to `digits` decimals, dropping a zero fraction.
///
/// `112.0` renders as `"112"`, `112.55` with one digit as `"112.5"`.
pub(crate) fn round_str(value: f64, digits: usize) -> String {
    let rounded = if value == value.trunc() {
        format!("{:.0}", value)
    } else {
        format!("{:.*}", digits, value)
    };
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };

    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Serde via the formatter string, parsed back through `FromStr`.
macro_rules! string_serde {
    ($ty:ty) => {
        impl TryFrom<String> for $ty {
            type Error = $crate::Error;

            fn try_from(s: String) -> $crate::Result<Self> {
                s.parse()
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> String {
                v.to_string()
            }
        }
    };
}

/// Same-type arithmetic over the canonical scalar.
macro_rules! scalar_ops {
    ($ty:ident, $field:ident) => {
        impl std::ops::Add for $ty {
            type Output = $ty;

            fn add(self, rhs: $ty) -> $ty {
                $ty {
                    $field: self.$field + rhs.$field,
                }
            }
        }

        impl std::ops::Sub for $ty {
            type Output = $ty;

            fn sub(self, rhs: $ty) -> $ty {
                $ty {
                    $field: self.$field - rhs.$field,
                }
            }
        }

        impl std::ops::Neg for $ty {
            type Output = $ty;

            fn neg(self) -> $ty {
                $ty {
                    $field: -self.$field,
                }
            }
        }

        impl std::ops::Mul<f64> for $ty {
            type Output = $ty;

            fn mul(self, factor: f64) -> $ty {
                $ty {
                    $field: self.$field * factor,
                }
            }
        }

        impl std::ops::Div<f64> for $ty {
            type Output = $ty;

            fn div(self, divisor: f64) -> $ty {
                $ty {
                    $field: self.$field / divisor,
                }
            }
        }

        /// Same-type division is a plain ratio
        impl std::ops::Div for $ty {
            type Output = f64;

            fn div(self, rhs: $ty) -> f64 {
                self.$field / rhs.$field
            }
        }

        impl std::iter::Sum for $ty {
            fn sum<I: Iterator<Item = $ty>>(iter: I) -> $ty {
                iter.fold($ty { $field: 0.0 }, |acc, v| acc + v)
            }
        }
    };
}

pub(crate) use scalar_ops;
pub(crate) use string_serde;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_str_drops_zero_fraction() {
        assert_eq!(round_str(112.0, 1), "112");
        assert_eq!(round_str(1.8, 2), "1.8");
        assert_eq!(round_str(1.83, 2), "1.83");
        assert_eq!(round_str(1.999, 2), "2");
    }

    #[test]
    fn test_round_str_rounds_to_digits() {
        assert_eq!(round_str(112.55, 1), "112.5");
        assert_eq!(round_str(112.56, 1), "112.6");
        assert_eq!(round_str(1.555_5, 2), "1.56");
        assert_eq!(round_str(-0.04, 1), "0");
    }

    #[test]
    fn test_round_str_keeps_large_whole_values() {
        assert_eq!(round_str(1e20, 1), "100000000000000000000");
        assert_eq!(round_str(-1e20, 2), "-100000000000000000000");
        assert_eq!(round_str(-0.0, 1), "0");
    }

    #[test]
    fn test_sum_segments_reports_unknown_unit() {
        let err = sum_segments("5 furlongs", QuantityKind::Length, |v, unit| {
            (unit == "m").then_some(v)
        })
        .unwrap_err();

        match err {
            Error::InvalidFormat { input, kind, unit } => {
                assert_eq!(input, "5 furlongs");
                assert_eq!(kind, QuantityKind::Length);
                assert_eq!(unit.as_deref(), Some("furlongs"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sum_segments_without_segments() {
        let err = sum_segments("tall", QuantityKind::Length, |v, _| Some(v)).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { unit: None, .. }));
    }

    #[test]
    fn test_quantity_display_delegates() {
        let q = Quantity::Mass(Mass::from_kilograms(0.5));
        assert_eq!(q.to_string(), "500g");
        assert_eq!(q.kind(), QuantityKind::Mass);
        assert_eq!(q.as_mass(), Some(Mass::from_kilograms(0.5)));
        assert_eq!(q.as_length(), None);
    }

    #[test]
    fn test_quantity_serde_goes_through_resolver() {
        let q: Quantity = serde_json::from_str("\"183cm\"").unwrap();
        assert_eq!(q.kind(), QuantityKind::Length);
        assert_eq!(serde_json::to_string(&q).unwrap(), "\"1.83m\"");
    }
}
