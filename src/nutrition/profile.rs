use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::ops::RangeInclusive;

pub const AGE_RANGE_YEARS: RangeInclusive<u32> = 13..=120;
pub const WEIGHT_RANGE_LBS: RangeInclusive<f64> = 30.0..=1400.0;
pub const HEIGHT_RANGE_IN: RangeInclusive<f64> = 24.0..=108.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    /// Nothing selected, or a value this crate does not know.
    Unspecified,
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "",
        }
    }
}

impl From<String> for Gender {
    fn from(raw: String) -> Self {
        Gender::parse(&raw)
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Extra,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::Extra,
    ];

    /// Unknown levels fall back to sedentary.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "extra" => ActivityLevel::Extra,
            other => {
                tracing::debug!(activity = other, "unrecognized activity level, using sedentary");
                ActivityLevel::Sedentary
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Extra => "extra",
        }
    }

    /// TDEE = BMR x multiplier.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Extra => 1.9,
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(raw: String) -> Self {
        ActivityLevel::parse(&raw)
    }
}

impl From<ActivityLevel> for String {
    fn from(level: ActivityLevel) -> Self {
        level.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Lose, Goal::Maintain, Goal::Gain];

    /// Unknown goals fall back to maintain.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "lose" => Goal::Lose,
            "maintain" => Goal::Maintain,
            "gain" => Goal::Gain,
            other => {
                tracing::debug!(goal = other, "unrecognized goal, using maintain");
                Goal::Maintain
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    /// Flat kcal adjustment applied on top of TDEE.
    pub fn calorie_offset(self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 250.0,
        }
    }
}

impl From<String> for Goal {
    fn from(raw: String) -> Self {
        Goal::parse(&raw)
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        goal.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidAge,
    InvalidWeight,
    InvalidHeight,
    MissingGender,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidAge => write!(
                f,
                "Please enter a valid age between {} and {}",
                AGE_RANGE_YEARS.start(),
                AGE_RANGE_YEARS.end()
            ),
            ValidationError::InvalidWeight => write!(
                f,
                "Please enter a valid weight between {} and {} lbs",
                WEIGHT_RANGE_LBS.start(),
                WEIGHT_RANGE_LBS.end()
            ),
            ValidationError::InvalidHeight => write!(
                f,
                "Please enter a valid height between {} and {} inches",
                HEIGHT_RANGE_IN.start(),
                HEIGHT_RANGE_IN.end()
            ),
            ValidationError::MissingGender => f.write_str("Please select your gender"),
        }
    }
}

impl Error for ValidationError {}

/// The single stored body profile. Field names on disk follow the page's
/// `mealMateProfile` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub gender: Gender,
    pub age: u32,
    #[serde(rename = "weight", alias = "weightLbs")]
    pub weight_lbs: f64,
    #[serde(rename = "height", alias = "heightIn")]
    pub height_in: f64,
    #[serde(rename = "activity", alias = "activityLevel")]
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl Profile {
    /// Range checks, in the same order the form reports them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !AGE_RANGE_YEARS.contains(&self.age) {
            return Err(ValidationError::InvalidAge);
        }
        if !WEIGHT_RANGE_LBS.contains(&self.weight_lbs) {
            return Err(ValidationError::InvalidWeight);
        }
        if !HEIGHT_RANGE_IN.contains(&self.height_in) {
            return Err(ValidationError::InvalidHeight);
        }
        if self.gender == Gender::Unspecified {
            return Err(ValidationError::MissingGender);
        }
        Ok(())
    }
}

/// Raw profile form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub gender: String,
    pub age: String,
    pub weight: String,
    pub height: String,
    pub activity: String,
    pub goal: String,
}

impl ProfileForm {
    /// Each field is parsed and range-checked before the next one is looked
    /// at, so the reported error is always the first bad field.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Profile, ValidationError> {
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|age| AGE_RANGE_YEARS.contains(age))
            .ok_or(ValidationError::InvalidAge)?;
        let weight_lbs =
            parse_measure(&self.weight, &WEIGHT_RANGE_LBS).ok_or(ValidationError::InvalidWeight)?;
        let height_in =
            parse_measure(&self.height, &HEIGHT_RANGE_IN).ok_or(ValidationError::InvalidHeight)?;
        let gender = match Gender::parse(&self.gender) {
            Gender::Unspecified => return Err(ValidationError::MissingGender),
            known => known,
        };

        Ok(Profile {
            gender,
            age,
            weight_lbs,
            height_in,
            activity_level: ActivityLevel::parse(&self.activity),
            goal: Goal::parse(&self.goal),
            last_updated: now,
        })
    }
}

fn parse_measure(raw: &str, range: &RangeInclusive<f64>) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && range.contains(value))
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            gender: profile.gender.as_str().to_string(),
            age: profile.age.to_string(),
            weight: profile.weight_lbs.to_string(),
            height: profile.height_in.to_string(),
            activity: profile.activity_level.as_str().to_string(),
            goal: profile.goal.as_str().to_string(),
        }
    }
}
