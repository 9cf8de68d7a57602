//! Weight and meal journal operations on a loaded [`DataFile`].
//!
//! Nothing here touches the file system; callers load, apply and save.

use crate::nutrition::{portion_factor, NutritionFacts};
use crate::quantity::{Mass, Time};
use crate::records::{food_key, DataFile, FoodItem, Meal, WeightEntry};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// `leftovers` or `leftovers(<time>)`
static LEFTOVERS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^leftovers(?:\((.*?)\))?$").expect("leftovers pattern is valid")
});

// ============================================================================
// Weight
// ============================================================================

/// Distance to the goal weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GoalProgress {
    Remaining { goal: Mass, remaining: Mass },
    Reached { goal: Mass },
}

/// What changed after logging a weight
#[derive(Clone, Debug, PartialEq)]
pub struct WeightReport {
    pub entry: WeightEntry,
    pub previous: Option<WeightEntry>,
    /// New weight minus the previous one
    pub change: Option<Mass>,
    pub new_lowest: bool,
    pub bmi: Option<f64>,
    pub goal: Option<GoalProgress>,
}

/// Append a weight entry and update the profile's current weight.
pub fn log_weight(data: &mut DataFile, weight: Mass, time: Time) -> WeightReport {
    let previous = data.weight.last().cloned();
    let entry = WeightEntry { time, weight };

    data.weight.push(entry.clone());
    data.profile.weight = Some(weight);

    let new_lowest = previous.is_some() && data.weight.iter().all(|e| e.weight >= weight);

    let goal = data.profile.goal_weight.map(|goal| {
        let remaining = weight - goal;
        if remaining.kilograms() > 0.0 {
            GoalProgress::Remaining { goal, remaining }
        } else {
            GoalProgress::Reached { goal }
        }
    });

    tracing::info!("Logged weight {} at {}", weight, time);

    WeightReport {
        change: previous.as_ref().map(|p| weight - p.weight),
        previous,
        entry,
        new_lowest,
        bmi: data.profile.bmi(),
        goal,
    }
}

// ============================================================================
// Meals
// ============================================================================

/// One `AMOUNT FOOD` pair of a meal request.
///
/// For leftovers the amount is a portion of the referenced meal: a factor
/// (`0.5`) or a mass (`200g`).
#[derive(Clone, Debug, PartialEq)]
pub struct MealItem {
    pub amount: String,
    pub food: String,
}

impl MealItem {
    pub fn new(amount: impl Into<String>, food: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            food: food.into(),
        }
    }

    /// The time inside `leftovers(<time>)`, `Some(None)` for bare `leftovers`
    fn leftovers(&self) -> Option<Option<&str>> {
        LEFTOVERS_RE
            .captures(self.food.trim())
            .map(|caps| caps.get(1).map(|m| m.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MealRequest {
    pub name: Option<String>,
    pub time: Time,
    pub items: Vec<MealItem>,
    /// Scale the whole meal: a factor or a mass relative to its total weight
    pub portion: Option<String>,
    /// Build the meal without appending it
    pub dry: bool,
}

/// Build a meal from cached nutrition facts and append it unless `dry`.
pub fn eat(data: &mut DataFile, request: &MealRequest) -> Result<Meal> {
    let portion = match &request.portion {
        Some(portion) => {
            let total = request
                .items
                .iter()
                .filter(|item| item.leftovers().is_none())
                .map(|item| item.amount.parse::<Mass>())
                .sum::<Result<Mass>>()?;
            portion_factor(portion, total)?
        }
        None => 1.0,
    };

    let mut food = Vec::new();
    for item in &request.items {
        match item.leftovers() {
            Some(time) => {
                let time = time.map(parse_meal_time).transpose()?;
                let leftover = &data.meals[find_meal(data, time.as_ref())?];
                let factor = portion * portion_factor(&item.amount, leftover.total_weight())?;
                tracing::debug!("Adding leftovers of {} x{}", leftover.time, factor);
                food.extend(leftover.food.iter().map(|f| f.scaled(factor)));
            }
            None => food.push(food_item(data, item, portion)?),
        }
    }

    let meal = Meal {
        time: request.time,
        name: request.name.clone(),
        food,
    };

    if request.dry {
        tracing::debug!("Dry run, not logging meal at {}", meal.time);
    } else {
        data.meals.push(meal.clone());
        tracing::info!("Logged {} at {}", meal.display_name(), meal.time);
    }
    Ok(meal)
}

fn food_item(data: &DataFile, item: &MealItem, portion: f64) -> Result<FoodItem> {
    let name = food_key(&item.food);
    let per_100g = data
        .food_cache
        .get(&name)
        .ok_or_else(|| Error::UnknownFood(name.clone()))?;

    let amount: Mass = item.amount.parse()?;
    let factor = amount.grams() / 100.0 * portion;

    Ok(FoodItem {
        name,
        amount: amount * portion,
        nutrition: *per_100g * factor,
    })
}

fn parse_meal_time(s: &str) -> Result<Time> {
    s.parse()
        .map_err(|_| Error::MealNotFound(Some(s.to_string())))
}

/// Index of the meal logged at `time`, or of the last meal when `None`.
pub fn find_meal(data: &DataFile, time: Option<&Time>) -> Result<usize> {
    match time {
        None => data
            .meals
            .len()
            .checked_sub(1)
            .ok_or(Error::MealNotFound(None)),
        Some(time) => data
            .meals
            .iter()
            .position(|meal| meal.time == *time)
            .ok_or_else(|| Error::MealNotFound(Some(time.to_string()))),
    }
}

/// Remove and return the meal at `time` (the last one when `None`).
pub fn undo_meal(data: &mut DataFile, time: Option<&Time>) -> Result<Meal> {
    let index = find_meal(data, time)?;
    let meal = data.meals.remove(index);
    tracing::info!("Removed {} at {}", meal.display_name(), meal.time);
    Ok(meal)
}

/// Scale the meal at `time` by `portion`; returns the meal before resizing.
pub fn resize_meal(data: &mut DataFile, portion: &str, time: Option<&Time>) -> Result<Meal> {
    let index = find_meal(data, time)?;
    let meal = &mut data.meals[index];
    let factor = portion_factor(portion, meal.total_weight())?;

    let before = meal.clone();
    meal.food = before.food.iter().map(|item| item.scaled(factor)).collect();

    tracing::info!("Resized {} at {} by {}", meal.display_name(), meal.time, factor);
    Ok(before)
}

/// Meals strictly inside the 24 hours after `start`, oldest first.
pub fn meals_in_day(data: &DataFile, start: Time) -> Vec<&Meal> {
    let end = start + chrono::Duration::hours(24);
    let mut meals: Vec<&Meal> = data
        .meals
        .iter()
        .filter(|meal| meal.time.in_period(start, end))
        .collect();
    meals.sort_by_key(|meal| meal.time);
    meals
}

pub fn meal_weight(meal: &Meal) -> Mass {
    meal.total_weight()
}

pub fn meal_totals(meal: &Meal) -> NutritionFacts {
    meal.total_nutrition()
}

pub fn day_totals<'a, I>(meals: I) -> NutritionFacts
where
    I: IntoIterator<Item = &'a Meal>,
{
    meals.into_iter().map(Meal::total_nutrition).sum()
}

/// `"1d 3h 12m"`, leaving out zero days and hours
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let days = elapsed.num_days();
    let hours = elapsed.num_hours() - days * 24;
    let minutes = elapsed.num_minutes() - elapsed.num_hours() * 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}d ", days));
    }
    if hours > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    out.push_str(&format!("{}m", minutes));
    out
}
