use super::{scalar_ops, string_serde, sum_segments, QuantityKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const J_PER_CAL: f64 = 4.184;
pub const J_PER_KCAL: f64 = 4184.0;
/// Slightly above 1/4184, so whole-kcal values never truncate downwards
pub const KCAL_PER_J: f64 = 0.000239006;

/// An amount of energy, stored in joules
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Energy {
    joules: f64,
}

impl Energy {
    pub fn from_joules(joules: f64) -> Self {
        Self { joules }
    }

    pub fn from_kcal(kcal: f64) -> Self {
        Self {
            joules: kcal * J_PER_KCAL,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn joules(&self) -> f64 {
        self.joules
    }

    pub fn kilojoules(&self) -> f64 {
        self.joules / 1000.0
    }

    pub fn kcal(&self) -> f64 {
        self.joules * KCAL_PER_J
    }
}

fn to_joules(value: f64, unit: &str) -> Option<f64> {
    match unit {
        "cal" => Some(value * J_PER_CAL),
        "kcal" => Some(value * J_PER_KCAL),
        "j" => Some(value),
        "kj" => Some(value * 1000.0),
        _ => None,
    }
}

impl FromStr for Energy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let joules = sum_segments(s.trim(), QuantityKind::Energy, to_joules)?;
        Ok(Self { joules })
    }
}

impl fmt::Display for Energy {
    /// Whole kilocalories, truncated
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}kcal", self.kcal().trunc() + 0.0)
    }
}

scalar_ops!(Energy, joules);
string_serde!(Energy);
