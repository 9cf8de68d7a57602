//! Error types for the welo_core library.

use crate::quantity::QuantityKind;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for welo_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tokenizer found no numeral followed by a unit
    #[error("'{input}' contains no number with a unit")]
    NoMatch { input: String },

    /// A quantity grammar matched partially but the input is not valid for it
    #[error("'{input}' is not a valid {kind}{}", unit_suffix(.unit))]
    InvalidFormat {
        input: String,
        kind: QuantityKind,
        unit: Option<String>,
    },

    /// No quantity type accepted the input
    #[error("'{input}' does not match any quantity type")]
    UnrecognizedQuantity { input: String },

    /// A nutrition field resolved to the wrong kind of quantity
    #[error("Field '{field}' expects {expected}, got '{value}' ({found})")]
    FieldType {
        field: String,
        expected: QuantityKind,
        found: QuantityKind,
        value: String,
    },

    /// Invalid or incomplete nutrition information
    #[error("Nutrition error: {0}")]
    Nutrient(String),

    /// Invalid portion specification
    #[error("Portion error: {0}")]
    Portion(String),

    /// Food has no cached nutrition information
    #[error("No nutrition information for '{0}'")]
    UnknownFood(String),

    /// No meal matched the requested time
    #[error("No meal found{}", time_suffix(.0))]
    MealNotFound(Option<String>),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(input: &str, kind: QuantityKind) -> Self {
        Error::InvalidFormat {
            input: input.to_string(),
            kind,
            unit: None,
        }
    }

    pub(crate) fn invalid_unit(input: &str, kind: QuantityKind, unit: &str) -> Self {
        Error::InvalidFormat {
            input: input.to_string(),
            kind,
            unit: Some(unit.to_string()),
        }
    }
}

fn unit_suffix(unit: &Option<String>) -> String {
    match unit {
        Some(unit) => format!(" (unknown unit '{}')", unit),
        None => String::new(),
    }
}

fn time_suffix(time: &Option<String>) -> String {
    match time {
        Some(time) => format!(" at {}", time),
        None => String::new(),
    }
}
