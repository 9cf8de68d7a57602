//! Nutrition facts, portions and food lookup.
//!
//! Facts are stored per 100 g of a food. A logged food item scales them by
//! its amount, and totals are a fold over items starting from
//! [`NutritionFacts::default`].

use crate::quantity::{Energy, Mass, Quantity, QuantityKind};
use crate::{resolver, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sodium content of table salt, by mass
pub const SODIUM_PER_SALT: f64 = 0.4;

/// Maximum number of suggestions returned by [`closest_matches`]
const MAX_MATCHES: usize = 5;

/// Nutrition facts of a food (per 100 g) or of a logged amount
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    pub energy: Energy,
    pub fat: Mass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat_fat: Option<Mass>,
    pub carbs: Mass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<Mass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<Mass>,
    pub protein: Mass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<Mass>,
}

/// One named field of [`NutritionFacts`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Energy,
    Fat,
    SatFat,
    Carbs,
    Sugar,
    Fiber,
    Protein,
    Sodium,
}

impl Nutrient {
    /// Display and persistence order
    pub const ALL: [Nutrient; 8] = [
        Nutrient::Energy,
        Nutrient::Fat,
        Nutrient::SatFat,
        Nutrient::Carbs,
        Nutrient::Sugar,
        Nutrient::Fiber,
        Nutrient::Protein,
        Nutrient::Sodium,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Nutrient::Energy => "energy",
            Nutrient::Fat => "fat",
            Nutrient::SatFat => "satFat",
            Nutrient::Carbs => "carbs",
            Nutrient::Sugar => "sugar",
            Nutrient::Fiber => "fiber",
            Nutrient::Protein => "protein",
            Nutrient::Sodium => "sodium",
        }
    }

    /// Look up a field by key, case-insensitively
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|n| n.key().to_lowercase() == key)
    }

    pub fn kind(&self) -> QuantityKind {
        match self {
            Nutrient::Energy => QuantityKind::Energy,
            _ => QuantityKind::Mass,
        }
    }

    fn is_required(&self) -> bool {
        matches!(
            self,
            Nutrient::Energy | Nutrient::Fat | Nutrient::Carbs | Nutrient::Protein
        )
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl NutritionFacts {
    /// Build per-100 g facts from `key=value` style pairs.
    ///
    /// Each value is resolved and must have the field's kind. Values are
    /// given for `reference` grams of the food and normalized to 100 g. A
    /// `salt` entry fills in sodium when no sodium is given.
    pub fn from_fields<I, K, V>(fields: I, reference: Mass) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if reference.grams() <= 0.0 {
            return Err(Error::Nutrient(format!(
                "reference amount must be positive, got {}",
                reference
            )));
        }
        let factor = 100.0 / reference.grams();

        let mut facts = NutritionFacts::default();
        let mut present = Vec::new();
        let mut salt = None;

        for (key, value) in fields {
            let (key, value) = (key.as_ref(), value.as_ref());

            if key.trim().eq_ignore_ascii_case("salt") {
                salt = Some(mass_field("salt", value)?);
                continue;
            }

            let nutrient = Nutrient::from_key(key)
                .ok_or_else(|| Error::Nutrient(format!("unknown field '{}'", key)))?;
            let quantity = resolver::resolve(value)?;
            if quantity.kind() != nutrient.kind() {
                return Err(Error::FieldType {
                    field: nutrient.key().to_string(),
                    expected: nutrient.kind(),
                    found: quantity.kind(),
                    value: value.to_string(),
                });
            }

            facts.set(nutrient, quantity);
            present.push(nutrient);
        }

        if !present.contains(&Nutrient::Sodium) {
            if let Some(salt) = salt {
                facts.sodium = Some(salt * SODIUM_PER_SALT);
                present.push(Nutrient::Sodium);
            }
        }

        if let Some(missing) = Nutrient::ALL
            .iter()
            .find(|n| n.is_required() && !present.contains(*n))
        {
            return Err(Error::Nutrient(format!("missing required field '{}'", missing)));
        }

        Ok(facts * factor)
    }

    fn set(&mut self, nutrient: Nutrient, quantity: Quantity) {
        match (nutrient, quantity) {
            (Nutrient::Energy, Quantity::Energy(e)) => self.energy = e,
            (Nutrient::Fat, Quantity::Mass(m)) => self.fat = m,
            (Nutrient::SatFat, Quantity::Mass(m)) => self.sat_fat = Some(m),
            (Nutrient::Carbs, Quantity::Mass(m)) => self.carbs = m,
            (Nutrient::Sugar, Quantity::Mass(m)) => self.sugar = Some(m),
            (Nutrient::Fiber, Quantity::Mass(m)) => self.fiber = Some(m),
            (Nutrient::Protein, Quantity::Mass(m)) => self.protein = m,
            (Nutrient::Sodium, Quantity::Mass(m)) => self.sodium = Some(m),
            (nutrient, quantity) => {
                tracing::warn!("Ignoring {} for field {}", quantity.kind(), nutrient)
            }
        }
    }

    pub fn get(&self, nutrient: Nutrient) -> Option<Quantity> {
        match nutrient {
            Nutrient::Energy => Some(Quantity::Energy(self.energy)),
            Nutrient::Fat => Some(Quantity::Mass(self.fat)),
            Nutrient::SatFat => self.sat_fat.map(Quantity::Mass),
            Nutrient::Carbs => Some(Quantity::Mass(self.carbs)),
            Nutrient::Sugar => self.sugar.map(Quantity::Mass),
            Nutrient::Fiber => self.fiber.map(Quantity::Mass),
            Nutrient::Protein => Some(Quantity::Mass(self.protein)),
            Nutrient::Sodium => self.sodium.map(Quantity::Mass),
        }
    }

    /// Present fields in display order
    pub fn entries(&self) -> Vec<(Nutrient, Quantity)> {
        Nutrient::ALL
            .into_iter()
            .filter_map(|n| self.get(n).map(|q| (n, q)))
            .collect()
    }
}

fn mass_field(key: &str, value: &str) -> Result<Mass> {
    let quantity = resolver::resolve(value)?;
    quantity.as_mass().ok_or_else(|| Error::FieldType {
        field: key.to_string(),
        expected: QuantityKind::Mass,
        found: quantity.kind(),
        value: value.to_string(),
    })
}

fn add_optional(a: Option<Mass>, b: Option<Mass>) -> Option<Mass> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (a, None) => a,
        (None, b) => b,
    }
}

impl std::ops::Add for NutritionFacts {
    type Output = NutritionFacts;

    fn add(self, rhs: NutritionFacts) -> NutritionFacts {
        NutritionFacts {
            energy: self.energy + rhs.energy,
            fat: self.fat + rhs.fat,
            sat_fat: add_optional(self.sat_fat, rhs.sat_fat),
            carbs: self.carbs + rhs.carbs,
            sugar: add_optional(self.sugar, rhs.sugar),
            fiber: add_optional(self.fiber, rhs.fiber),
            protein: self.protein + rhs.protein,
            sodium: add_optional(self.sodium, rhs.sodium),
        }
    }
}

impl std::ops::Mul<f64> for NutritionFacts {
    type Output = NutritionFacts;

    fn mul(self, factor: f64) -> NutritionFacts {
        NutritionFacts {
            energy: self.energy * factor,
            fat: self.fat * factor,
            sat_fat: self.sat_fat.map(|m| m * factor),
            carbs: self.carbs * factor,
            sugar: self.sugar.map(|m| m * factor),
            fiber: self.fiber.map(|m| m * factor),
            protein: self.protein * factor,
            sodium: self.sodium.map(|m| m * factor),
        }
    }
}

impl std::iter::Sum for NutritionFacts {
    fn sum<I: Iterator<Item = NutritionFacts>>(iter: I) -> NutritionFacts {
        iter.fold(NutritionFacts::default(), |acc, facts| acc + facts)
    }
}

impl<'a> std::iter::Sum<&'a NutritionFacts> for NutritionFacts {
    fn sum<I: Iterator<Item = &'a NutritionFacts>>(iter: I) -> NutritionFacts {
        iter.copied().sum()
    }
}

/// Turn a portion specification into a factor on `total`.
///
/// A plain number is the factor itself, anything else is parsed as a mass
/// and divided by `total`. A negative factor means "all but that much":
/// for a 1000 g meal, `-0.2` and `-200g` both give `0.8`.
pub fn portion_factor(portion: &str, total: Mass) -> Result<f64> {
    let portion = portion.trim();

    let factor = match portion.parse::<f64>() {
        Ok(factor) => factor,
        Err(_) => {
            let amount: Mass = portion.parse()?;
            if total.kilograms() == 0.0 {
                return Err(Error::Portion(format!(
                    "cannot take {} of something weighing nothing",
                    amount
                )));
            }
            amount / total
        }
    };

    if factor < 0.0 {
        Ok(1.0 + factor)
    } else {
        Ok(factor)
    }
}

/// Length of the longest piece of `query` that appears in `name`
pub fn match_score(query: &str, name: &str) -> usize {
    let query: Vec<char> = query.trim().to_lowercase().chars().collect();
    let name = name.trim().to_lowercase();

    for len in (1..=query.len()).rev() {
        for start in 0..=query.len() - len {
            let piece: String = query[start..start + len].iter().collect();
            if name.contains(&piece) {
                return len;
            }
        }
    }
    0
}

/// Up to five names that share a long enough piece with `query`, best first
pub fn closest_matches<'a, I>(query: &str, names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.trim().to_lowercase();
    let min_score = std::cmp::max(2, query.chars().count() / 2);

    let mut scored: Vec<(usize, &str)> = names
        .into_iter()
        .map(|name| (match_score(&query, name), name))
        .filter(|(score, _)| *score >= min_score)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_MATCHES)
        .map(|(_, name)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mozzarella() -> NutritionFacts {
        NutritionFacts::from_fields(
            [
                ("energy", "238 kcal"),
                ("protein", "17 g"),
                ("carbs", "2 g"),
                ("fat", "18 g"),
                ("fiber", "0 g"),
            ],
            Mass::from_grams(100.0),
        )
        .unwrap()
    }

    #[test]
    fn test_from_fields_per_100g() {
        let facts = mozzarella();
        assert_eq!(facts.energy.to_string(), "238kcal");
        assert_eq!(facts.protein.to_string(), "17g");
        assert_eq!(facts.fiber, Some(Mass::zero()));
        assert_eq!(facts.sugar, None);
    }

    #[test]
    fn test_from_fields_normalizes_reference() {
        let facts = NutritionFacts::from_fields(
            [
                ("energy", "60 kcal"),
                ("fat", "1g"),
                ("carbs", "10g"),
                ("protein", "2g"),
            ],
            Mass::from_grams(25.0),
        )
        .unwrap();

        assert_eq!(facts.energy.to_string(), "240kcal");
        assert_eq!(facts.carbs.to_string(), "40g");
    }

    #[test]
    fn test_from_fields_salt_fills_sodium() {
        let facts = NutritionFacts::from_fields(
            [
                ("energy", "100 kcal"),
                ("fat", "1g"),
                ("carbs", "1g"),
                ("protein", "1g"),
                ("Salt", "2.5g"),
            ],
            Mass::from_grams(100.0),
        )
        .unwrap();
        assert_eq!(facts.sodium.unwrap().to_string(), "1g");
    }

    #[test]
    fn test_from_fields_explicit_sodium_wins_over_salt() {
        let facts = NutritionFacts::from_fields(
            [
                ("energy", "100 kcal"),
                ("fat", "1g"),
                ("carbs", "1g"),
                ("protein", "1g"),
                ("salt", "2.5g"),
                ("sodium", "0.3g"),
            ],
            Mass::from_grams(100.0),
        )
        .unwrap();
        assert_eq!(facts.sodium.unwrap().to_string(), "0.3g");
    }

    #[test]
    fn test_from_fields_rejects_wrong_kind() {
        let err = NutritionFacts::from_fields(
            [("energy", "17 g")],
            Mass::from_grams(100.0),
        )
        .unwrap_err();

        match err {
            Error::FieldType {
                field,
                expected,
                found,
                ..
            } => {
                assert_eq!(field, "energy");
                assert_eq!(expected, QuantityKind::Energy);
                assert_eq!(found, QuantityKind::Mass);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_fields_requires_core_fields() {
        let err = NutritionFacts::from_fields(
            [("energy", "100 kcal"), ("fat", "1g"), ("carbs", "1g")],
            Mass::from_grams(100.0),
        )
        .unwrap_err();
        assert!(err.to_string().contains("protein"));
    }

    #[test]
    fn test_from_fields_unknown_field() {
        let err = NutritionFacts::from_fields(
            [("cholesterol", "46 mg")],
            Mass::from_grams(100.0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Nutrient(_)));
    }

    #[test]
    fn test_scale_and_accumulate() {
        let per_100g = mozzarella();
        let portion = per_100g * 1.25;
        assert_eq!(portion.energy.to_string(), "297kcal");

        let total: NutritionFacts = [per_100g, portion].iter().sum();
        assert_eq!(total.energy.to_string(), "535kcal");
        assert_eq!(total.fat.to_string(), "40.5g");
        assert_eq!(total.sugar, None);
        assert_eq!(total.fiber, Some(Mass::zero()));
    }

    #[test]
    fn test_sum_keeps_optional_fields_present_in_any_item() {
        let with_sugar = NutritionFacts {
            sugar: Some(Mass::from_grams(5.0)),
            ..NutritionFacts::default()
        };
        let total: NutritionFacts = [NutritionFacts::default(), with_sugar, with_sugar]
            .into_iter()
            .sum();
        assert_eq!(total.sugar, Some(Mass::from_grams(10.0)));
    }

    #[test]
    fn test_entries_in_display_order() {
        let keys: Vec<_> = mozzarella()
            .entries()
            .into_iter()
            .map(|(n, _)| n.key())
            .collect();
        assert_eq!(keys, vec!["energy", "fat", "carbs", "fiber", "protein"]);
    }

    #[test]
    fn test_serde_layout() {
        let json = serde_json::to_value(mozzarella()).unwrap();
        assert_eq!(json["energy"], "238kcal");
        assert_eq!(json["fiber"], "0g");
        assert!(json.get("satFat").is_none());

        let parsed: NutritionFacts = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.energy.to_string(), "238kcal");
    }

    #[test]
    fn test_portion_factor() {
        let total = Mass::from_grams(1000.0);
        assert_eq!(portion_factor("0.2", total).unwrap(), 0.2);
        assert_eq!(portion_factor("-0.2", total).unwrap(), 0.8);
        assert!((portion_factor("200g", total).unwrap() - 0.2).abs() < 1e-9);
        assert!((portion_factor("-200g", total).unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_portion_factor_errors() {
        assert!(portion_factor("half", Mass::from_grams(100.0)).is_err());
        assert!(matches!(
            portion_factor("200g", Mass::zero()),
            Err(Error::Portion(_))
        ));
    }

    #[test]
    fn test_match_score() {
        assert_eq!(match_score("mozzarella", "Galbani Mozzarella"), 10);
        assert_eq!(match_score("mozarella", "mozzarella"), 7);
        assert_eq!(match_score("xyz", "mozzarella"), 0);
    }

    #[test]
    fn test_closest_matches() {
        let names = ["apple", "mozzarella", "mozzarella light", "oat milk", "tomato"];
        let matches = closest_matches("mozarella", names);
        assert_eq!(matches, vec!["mozzarella", "mozzarella light"]);

        assert!(closest_matches("q", names).is_empty());
    }
}
