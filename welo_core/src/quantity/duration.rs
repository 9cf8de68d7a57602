use super::{scalar_ops, string_serde, sum_segments, QuantityKind};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clock-style `H:MM`, read as hours and minutes
static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+):([0-9]+)$").expect("clock pattern is valid"));

/// A span of time, stored in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Duration {
    seconds: f64,
}

impl Duration {
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn from_minutes(minutes: f64) -> Self {
        Self {
            seconds: minutes * 60.0,
        }
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn minutes(&self) -> f64 {
        self.seconds / 60.0
    }

    pub fn hours(&self) -> f64 {
        self.seconds / 60.0 / 60.0
    }

    /// Whole hours and the whole minutes left over
    pub fn hours_minutes(&self) -> (i64, i64) {
        let hours = self.hours() as i64;
        let minutes = self.minutes() as i64 - hours * 60;
        (hours, minutes)
    }

    fn parse_clock(s: &str) -> Option<Result<Self>> {
        let caps = CLOCK_RE.captures(s)?;
        let parsed = caps[1]
            .parse::<u32>()
            .and_then(|h| caps[2].parse::<u32>().map(|m| (h, m)));

        Some(match parsed {
            Ok((hours, minutes)) => Ok(Self {
                seconds: f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0,
            }),
            Err(_) => Err(Error::invalid(s, QuantityKind::Duration)),
        })
    }
}

fn to_seconds(value: f64, unit: &str) -> Option<f64> {
    match unit {
        "m" | "min" => Some(value * 60.0),
        "h" => Some(value * 60.0 * 60.0),
        _ => None,
    }
}

impl FromStr for Duration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(clock) = Self::parse_clock(s) {
            return clock;
        }

        let seconds = sum_segments(s, QuantityKind::Duration, to_seconds)?;
        Ok(Self { seconds })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hours_minutes() {
            (0, minutes) => write!(f, "{} min", minutes),
            (hours, 0) => write!(f, "{} h", hours),
            (hours, minutes) => write!(f, "{}h {}min", hours, minutes),
        }
    }
}

scalar_ops!(Duration, seconds);
string_serde!(Duration);
