pub mod connection;
pub mod endpoints;

use async_trait::async_trait;

pub use connection::{ApiConnectionError, RecipeApiClient};
pub use endpoints::{DisplayValue, Recipe, RecipeNutrition};

/// Anything that can answer an autocomplete query.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ApiConnectionError>;
}

/// Anything that can find recipes using a list of normalized ingredients.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn recipes_with_ingredients(
        &self,
        ingredients: &[String],
    ) -> Result<Vec<Recipe>, ApiConnectionError>;
}
