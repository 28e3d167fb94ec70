use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::legacy::deserialize_string_list;

pub const AUTOCOMPLETE_PATH: &str = "api/autocomplete";
pub const RECIPE_SEARCH_PATH: &str = "api/recipes-with-ingredients";

/// Number of ingredients shown on a recipe card.
pub const KEY_INGREDIENT_COUNT: usize = 5;

#[derive(Debug, Serialize, Clone)]
pub struct RecipeSearchRequest<'a> {
    pub ingredients: &'a [String],
}

/// A field the server usually sends as a number but that may arrive as free
/// text. Text is kept verbatim and only ever displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Amount(f64),
    Text(String),
}

impl Default for DisplayValue {
    fn default() -> Self {
        DisplayValue::Text(String::new())
    }
}

impl DisplayValue {
    pub fn amount(&self) -> Option<f64> {
        match self {
            DisplayValue::Amount(value) => Some(*value),
            DisplayValue::Text(_) => None,
        }
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Number(number) => match number.as_f64() {
                Some(amount) => DisplayValue::Amount(amount),
                None => DisplayValue::Text(number.to_string()),
            },
            Value::String(text) => DisplayValue::Text(text),
            Value::Null => DisplayValue::default(),
            other => DisplayValue::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(DisplayValue::from_value(Value::deserialize(deserializer)?))
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Amount(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            DisplayValue::Amount(value) => write!(f, "{}", value),
            DisplayValue::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeNutrition {
    #[serde(default)]
    pub calories: DisplayValue,
    #[serde(default)]
    pub total_fat: DisplayValue,
    #[serde(default)]
    pub saturated_fat: DisplayValue,
    #[serde(default)]
    pub sodium: DisplayValue,
    #[serde(default)]
    pub carbohydrate: DisplayValue,
    #[serde(default)]
    pub sugar: DisplayValue,
    #[serde(default)]
    pub protein: DisplayValue,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: DisplayValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub servings: DisplayValue,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub nutrition: RecipeNutrition,
}

impl Recipe {
    pub fn key_ingredients(&self) -> &[String] {
        let end = self.ingredients.len().min(KEY_INGREDIENT_COUNT);
        &self.ingredients[..end]
    }

    pub fn instruction_steps(&self) -> &[String] {
        &self.instructions
    }

    /// Where a click on this recipe's card navigates to.
    pub fn detail_path(&self) -> String {
        format!("/recipe/{}", self.id)
    }
}
