use super::{round_str, scalar_ops, string_serde, sum_segments, QuantityKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const KG_PER_LB: f64 = 0.453592;
/// A medium egg, the default egg size
pub const KG_PER_EGG_M: f64 = 0.058;
pub const KG_PER_EGG_L: f64 = 0.063;

/// A mass, stored in kilograms
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mass {
    kilograms: f64,
}

impl Mass {
    pub fn from_kilograms(kilograms: f64) -> Self {
        Self { kilograms }
    }

    pub fn from_grams(grams: f64) -> Self {
        Self {
            kilograms: grams / 1000.0,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn kilograms(&self) -> f64 {
        self.kilograms
    }

    pub fn grams(&self) -> f64 {
        self.kilograms * 1000.0
    }
}

fn to_kilograms(value: f64, unit: &str) -> Option<f64> {
    match unit {
        "g" => Some(value / 1000.0),
        "kg" => Some(value),
        "lb" | "lbs" => Some(value * KG_PER_LB),
        "egg" | "egg(m)" => Some(value * KG_PER_EGG_M),
        "egg(l)" => Some(value * KG_PER_EGG_L),
        _ => None,
    }
}

impl FromStr for Mass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let kilograms = sum_segments(s.trim(), QuantityKind::Mass, to_kilograms)?;
        Ok(Self { kilograms })
    }
}

impl fmt::Display for Mass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kilograms < 1.0 {
            write!(f, "{}g", round_str(self.grams(), 1))
        } else {
            write!(f, "{}kg", round_str(self.kilograms, 1))
        }
    }
}

scalar_ops!(Mass, kilograms);
string_serde!(Mass);
