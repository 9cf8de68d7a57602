//! Persisted records of the welo data file.
//!
//! Every quantity is stored as its formatted string (`"81.3kg"`,
//! `"16.05.2024 12:30"`), never as a raw number.

use crate::nutrition::NutritionFacts;
use crate::quantity::{Activity, Length, Mass, Sex, Time};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Profile
// ============================================================================

/// What the user told us about themselves
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// Most recently logged weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Mass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<Mass>,
}

// ============================================================================
// Weight and Meal Entries
// ============================================================================

/// A single weight measurement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub time: Time,
    pub weight: Mass,
}

/// A food as eaten: how much of it, and what that amount contains
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub amount: Mass,
    #[serde(rename = "nutriInfo")]
    pub nutrition: NutritionFacts,
}

impl FoodItem {
    /// The same food, `factor` times as much
    pub fn scaled(&self, factor: f64) -> FoodItem {
        FoodItem {
            name: self.name.clone(),
            amount: self.amount * factor,
            nutrition: self.nutrition * factor,
        }
    }
}

/// A logged meal
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub time: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub food: Vec<FoodItem>,
}

impl Meal {
    pub fn total_weight(&self) -> Mass {
        self.food.iter().map(|item| item.amount).sum()
    }

    pub fn total_nutrition(&self) -> NutritionFacts {
        self.food.iter().map(|item| &item.nutrition).sum()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("meal")
    }
}

// ============================================================================
// Data File
// ============================================================================

/// Everything stored in one welo data file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(rename = "config", default)]
    pub profile: Profile,
    #[serde(default)]
    pub weight: Vec<WeightEntry>,
    #[serde(default)]
    pub meals: Vec<Meal>,
    /// Nutrition facts per 100 g, keyed by lowercase food name
    #[serde(rename = "nutriInfoCache", default)]
    pub food_cache: BTreeMap<String, NutritionFacts>,
}

/// Normalized key for the food cache
pub fn food_key(name: &str) -> String {
    name.trim().to_lowercase()
}
