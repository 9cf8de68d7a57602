use super::{round_str, string_serde, QuantityKind};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Leading numeral; anything after it is descriptive text
static LEADING_NUMERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9.]+)").expect("numeral pattern is valid"));

/// Physical activity level (PAL), a multiplier on the basal metabolic rate
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Activity {
    factor: f64,
}

/// Descriptive band of an activity factor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityBand {
    ExtremelyInactive,
    Sedentary,
    ModeratelyActive,
    VigorouslyActive,
    ExtremelyActive,
}

impl ActivityBand {
    pub fn for_factor(factor: f64) -> Self {
        if factor < 1.4 {
            ActivityBand::ExtremelyInactive
        } else if factor < 1.7 {
            ActivityBand::Sedentary
        } else if factor < 2.0 {
            ActivityBand::ModeratelyActive
        } else if factor < 2.4 {
            ActivityBand::VigorouslyActive
        } else {
            ActivityBand::ExtremelyActive
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityBand::ExtremelyInactive => "extremely inactive",
            ActivityBand::Sedentary => "sedentary",
            ActivityBand::ModeratelyActive => "moderately active",
            ActivityBand::VigorouslyActive => "vigorously active",
            ActivityBand::ExtremelyActive => "extremely active",
        }
    }
}

impl Activity {
    pub fn from_factor(factor: f64) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn band(&self) -> ActivityBand {
        ActivityBand::for_factor(self.factor)
    }
}

impl FromStr for Activity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        LEADING_NUMERAL_RE
            .captures(s)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .map(|factor| Self { factor })
            .ok_or_else(|| Error::invalid(s, QuantityKind::Activity))
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            round_str(self.factor, 2),
            self.band().description()
        )
    }
}

string_serde!(Activity);
