use serde::{Deserialize, Serialize};
use std::fmt;

use super::profile::{ActivityLevel, Gender, Profile};

pub const KG_PER_LB: f64 = 0.453592;
pub const CM_PER_INCH: f64 = 2.54;

// Share of total calories per macro, and Atwater energy factors.
const PROTEIN_SHARE: f64 = 0.30;
const FAT_SHARE: f64 = 0.30;
const CARB_SHARE: f64 = 0.40;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_CARB: f64 = 4.0;

pub const SODIUM_LIMIT_MG: i32 = 2300;
pub const SATURATED_FAT_LIMIT_G: i32 = 20;
pub const SUGAR_LIMIT_FEMALE_G: i32 = 25;
pub const SUGAR_LIMIT_DEFAULT_G: i32 = 36;

/// Daily targets derived from a [`Profile`]. Never stored; recompute from
/// the profile whenever it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub calories: i32,
    pub protein_g: i32,
    pub fat_g: i32,
    pub carbs_g: i32,
    pub sodium_mg: i32,
    pub sugar_g: i32,
    pub saturated_fat_g: i32,
}

impl fmt::Display for NutritionTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Calories:      {} kcal", self.calories)?;
        writeln!(f, "Protein:       {} g", self.protein_g)?;
        writeln!(f, "Fat:           {} g", self.fat_g)?;
        writeln!(f, "Carbohydrate:  {} g", self.carbs_g)?;
        writeln!(f, "Sodium:        < {} mg", self.sodium_mg)?;
        writeln!(f, "Sugar:         < {} g", self.sugar_g)?;
        write!(f, "Saturated fat: < {} g", self.saturated_fat_g)
    }
}

pub fn pounds_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Mifflin-St Jeor. An unspecified gender yields 0 rather than an error.
pub fn basal_metabolic_rate(gender: Gender, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
        // TODO: revisit with product; unspecified currently gets no BMR at all.
        Gender::Unspecified => 0.0,
    }
}

pub fn total_daily_energy_expenditure(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

pub fn sugar_limit_g(gender: Gender) -> i32 {
    match gender {
        Gender::Female => SUGAR_LIMIT_FEMALE_G,
        Gender::Male | Gender::Unspecified => SUGAR_LIMIT_DEFAULT_G,
    }
}

// Half-up, like Math.round in the browser; f64::round sends -0.5 to -1.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Calculates daily calorie and macro targets for a validated profile.
///
/// Pure and deterministic. Does no range checking: callers must only pass
/// profiles that have passed [`Profile::validate`].
pub fn calculate_nutrition_targets(profile: &Profile) -> NutritionTargets {
    let weight_kg = pounds_to_kg(profile.weight_lbs);
    let height_cm = inches_to_cm(profile.height_in);
    let bmr = basal_metabolic_rate(profile.gender, weight_kg, height_cm, profile.age);
    let tdee = total_daily_energy_expenditure(bmr, profile.activity_level);
    let calories = round_half_up(tdee + profile.goal.calorie_offset());

    // Grams are rounded independently; no remainder is redistributed.
    let kcal = f64::from(calories);
    NutritionTargets {
        calories,
        protein_g: round_half_up(kcal * PROTEIN_SHARE / KCAL_PER_G_PROTEIN),
        fat_g: round_half_up(kcal * FAT_SHARE / KCAL_PER_G_FAT),
        carbs_g: round_half_up(kcal * CARB_SHARE / KCAL_PER_G_CARB),
        sodium_mg: SODIUM_LIMIT_MG,
        sugar_g: sugar_limit_g(profile.gender),
        saturated_fat_g: SATURATED_FAT_LIMIT_G,
    }
}
