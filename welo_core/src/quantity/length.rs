use super::{round_str, scalar_ops, string_serde, sum_segments, QuantityKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const M_PER_FOOT: f64 = 0.3048;
pub const M_PER_INCH: f64 = 0.0254;

/// A length, stored in meters
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Length {
    meters: f64,
}

impl Length {
    pub fn from_meters(meters: f64) -> Self {
        Self { meters }
    }

    pub fn from_centimeters(centimeters: f64) -> Self {
        Self {
            meters: centimeters / 100.0,
        }
    }

    pub fn meters(&self) -> f64 {
        self.meters
    }

    pub fn centimeters(&self) -> f64 {
        self.meters * 100.0
    }
}

// A bare "m" is meters here even though Duration reads it as minutes.
fn to_meters(value: f64, unit: &str) -> Option<f64> {
    match unit {
        "cm" => Some(value / 100.0),
        "m" => Some(value),
        "ft" | "'" => Some(value * M_PER_FOOT),
        "in" | "\"" => Some(value * M_PER_INCH),
        _ => None,
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let meters = sum_segments(s.trim(), QuantityKind::Length, to_meters)?;
        Ok(Self { meters })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.meters < 1.0 {
            write!(f, "{:.0}cm", self.centimeters().trunc() + 0.0)
        } else {
            write!(f, "{}m", round_str(self.meters, 2))
        }
    }
}

scalar_ops!(Length, meters);
string_serde!(Length);
