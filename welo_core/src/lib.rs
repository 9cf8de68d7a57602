#![forbid(unsafe_code)]

//! Core model and logic for welo, a weight and meal logger.
//!
//! This crate provides:
//! - Typed physical quantities parsed from free-form text
//! - The resolver that picks a quantity type for untyped input
//! - Nutrition facts and portion arithmetic
//! - Health metrics (BMI, BMR, energy expenditure)
//! - The JSON data file and journal operations on it

pub mod config;
pub mod error;
pub mod health;
pub mod journal;
pub mod logging;
pub mod nutrition;
pub mod quantity;
pub mod records;
pub mod resolver;
pub mod store;
pub mod tokenizer;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use health::{BmiCategory, EnergyBalance};
pub use journal::{MealItem, MealRequest, WeightReport};
pub use nutrition::{Nutrient, NutritionFacts};
pub use quantity::{
    Activity, Duration, Energy, Length, Mass, Quantity, QuantityKind, Sex, Time,
};
pub use records::{DataFile, FoodItem, Meal, Profile, WeightEntry};
pub use resolver::resolve;
