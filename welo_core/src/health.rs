//! Body metrics derived from the profile: BMI, basal metabolic rate and total
//! energy expenditure.

use crate::quantity::{round_str, Activity, Energy, Length, Mass, Sex};
use crate::records::Profile;
use chrono::{Local, NaiveDate};
use std::fmt;

/// Body mass index, kg / m²
pub fn bmi(weight: Mass, height: Length) -> f64 {
    weight.kilograms() / (height.meters() * height.meters())
}

/// Weight class of a BMI value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiCategory {
    VerySeverelyUnderweight,
    SeverelyUnderweight,
    Underweight,
    Normal,
    Overweight,
    ModeratelyObese,
    SeverelyObese,
    VerySeverelyObese,
    MorbidlyObese,
    SuperObese,
    HyperObese,
}

impl BmiCategory {
    /// Upper bounds (exclusive) of each category, lightest first
    const BANDS: [(f64, BmiCategory); 10] = [
        (15.0, BmiCategory::VerySeverelyUnderweight),
        (16.0, BmiCategory::SeverelyUnderweight),
        (18.5, BmiCategory::Underweight),
        (25.0, BmiCategory::Normal),
        (30.0, BmiCategory::Overweight),
        (35.0, BmiCategory::ModeratelyObese),
        (40.0, BmiCategory::SeverelyObese),
        (45.0, BmiCategory::VerySeverelyObese),
        (50.0, BmiCategory::MorbidlyObese),
        (60.0, BmiCategory::SuperObese),
    ];

    pub fn for_bmi(bmi: f64) -> Self {
        Self::BANDS
            .iter()
            .find(|(bound, _)| bmi < *bound)
            .map(|(_, category)| *category)
            .unwrap_or(BmiCategory::HyperObese)
    }

    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::VerySeverelyUnderweight => "very severely underweight",
            BmiCategory::SeverelyUnderweight => "severely underweight",
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::ModeratelyObese => "moderately obese",
            BmiCategory::SeverelyObese => "severely obese",
            BmiCategory::VerySeverelyObese => "very severely obese",
            BmiCategory::MorbidlyObese => "morbidly obese",
            BmiCategory::SuperObese => "super obese",
            BmiCategory::HyperObese => "hyper obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// `"24.28 (normal)"`
pub fn format_bmi(bmi: f64) -> String {
    format!("{} ({})", round_str(bmi, 2), BmiCategory::for_bmi(bmi))
}

/// Mifflin-St Jeor equation, rounded to whole kcal.
pub fn basal_metabolic_rate(weight: Mass, height: Length, age: i32, sex: Sex) -> Energy {
    let base = 10.0 * weight.kilograms() + 6.25 * height.centimeters() - 5.0 * f64::from(age);
    let kcal = match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    };
    Energy::from_kcal(kcal.round_ties_even())
}

/// BMR in whole kcal scaled by the physical activity level, rounded to whole
/// kcal. Ties go to the even value.
pub fn total_energy_expenditure(bmr: Energy, activity: Activity) -> Energy {
    let bmr_kcal = bmr.kcal().round_ties_even();
    Energy::from_kcal((activity.factor() * bmr_kcal).round_ties_even())
}

/// Expenditure against intake, in whole kcal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyBalance {
    Deficit(i64),
    Surplus(i64),
}

impl EnergyBalance {
    pub fn new(expenditure: Energy, intake: Energy) -> Self {
        let difference = (expenditure.kcal() - intake.kcal()).round_ties_even() as i64;
        if difference > 0 {
            EnergyBalance::Deficit(difference)
        } else {
            EnergyBalance::Surplus(-difference)
        }
    }
}

impl fmt::Display for EnergyBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyBalance::Deficit(kcal) => write!(f, "a calorie deficit of {} kcal", kcal),
            EnergyBalance::Surplus(kcal) => write!(f, "a calorie surplus of {} kcal", kcal),
        }
    }
}

impl Profile {
    pub fn bmi(&self) -> Option<f64> {
        Some(bmi(self.weight?, self.height?))
    }

    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.birthday.map(|b| b.age_on(today))
    }

    pub fn bmr_on(&self, today: NaiveDate) -> Option<Energy> {
        Some(basal_metabolic_rate(
            self.weight?,
            self.height?,
            self.age_on(today)?,
            self.sex?,
        ))
    }

    pub fn bmr(&self) -> Option<Energy> {
        self.bmr_on(today())
    }

    pub fn total_energy_expenditure_on(&self, today: NaiveDate) -> Option<Energy> {
        Some(total_energy_expenditure(self.bmr_on(today)?, self.activity?))
    }

    pub fn total_energy_expenditure(&self) -> Option<Energy> {
        self.total_energy_expenditure_on(today())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            height: Some(Length::from_centimeters(180.0)),
            activity: Some(Activity::from_factor(1.5)),
            birthday: Some("01.01.1990".parse().unwrap()),
            sex: Some(Sex::Male),
            weight: Some(Mass::from_kilograms(80.0)),
            goal_weight: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bmi() {
        let value = bmi(Mass::from_kilograms(81.0), Length::from_meters(1.8));
        assert!((value - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_bands() {
        assert_eq!(BmiCategory::for_bmi(14.9), BmiCategory::VerySeverelyUnderweight);
        assert_eq!(BmiCategory::for_bmi(15.0), BmiCategory::SeverelyUnderweight);
        assert_eq!(BmiCategory::for_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::for_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::for_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::for_bmi(59.9), BmiCategory::SuperObese);
        assert_eq!(BmiCategory::for_bmi(60.0), BmiCategory::HyperObese);
    }

    #[test]
    fn test_format_bmi() {
        assert_eq!(format_bmi(24.281), "24.28 (normal)");
        assert_eq!(format_bmi(31.0), "31 (moderately obese)");
    }

    #[test]
    fn test_basal_metabolic_rate() {
        let weight = Mass::from_kilograms(80.0);
        let height = Length::from_centimeters(180.0);
        // 800 + 1125 - 150
        assert_eq!(basal_metabolic_rate(weight, height, 30, Sex::Male).kcal().round(), 1780.0);
        assert_eq!(basal_metabolic_rate(weight, height, 30, Sex::Female).kcal().round(), 1614.0);
    }

    #[test]
    fn test_total_energy_expenditure_half_kcal_rounds_to_even() {
        // 1.25 * 1786 = 2232.5
        let tee = total_energy_expenditure(Energy::from_kcal(1786.0), Activity::from_factor(1.25));
        assert_eq!(tee.kcal().round(), 2232.0);
        assert_eq!(tee.to_string(), "2232kcal");
    }

    #[test]
    fn test_total_energy_expenditure() {
        let tee = total_energy_expenditure(Energy::from_kcal(1780.0), Activity::from_factor(1.5));
        assert_eq!(tee.kcal().round(), 2670.0);
    }

    #[test]
    fn test_energy_balance() {
        let tee = Energy::from_kcal(2500.0);
        assert_eq!(
            EnergyBalance::new(tee, Energy::from_kcal(2000.0)),
            EnergyBalance::Deficit(500)
        );
        assert_eq!(
            EnergyBalance::new(tee, Energy::from_kcal(2700.0)),
            EnergyBalance::Surplus(200)
        );
        assert_eq!(EnergyBalance::new(tee, tee), EnergyBalance::Surplus(0));
        assert_eq!(
            EnergyBalance::Deficit(500).to_string(),
            "a calorie deficit of 500 kcal"
        );
    }

    #[test]
    fn test_profile_metrics() {
        let p = profile();
        let today = date(2020, 1, 1);

        assert_eq!(p.age_on(today), Some(30));
        assert_eq!(p.bmr_on(today).map(|e| e.kcal().round()), Some(1780.0));
        assert_eq!(
            p.total_energy_expenditure_on(today).map(|e| e.kcal().round()),
            Some(2670.0)
        );
        assert!((p.bmi().unwrap() - 24.691).abs() < 1e-3);
    }

    #[test]
    fn test_profile_metrics_missing_inputs() {
        let today = date(2020, 1, 1);

        let mut p = profile();
        p.sex = None;
        assert_eq!(p.bmr_on(today), None);
        assert_eq!(p.total_energy_expenditure_on(today), None);
        assert!(p.bmi().is_some());

        let mut p = profile();
        p.activity = None;
        assert!(p.bmr_on(today).is_some());
        assert_eq!(p.total_energy_expenditure_on(today), None);

        assert_eq!(Profile::default().bmi(), None);
    }
}
