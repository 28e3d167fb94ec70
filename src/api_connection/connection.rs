use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use super::endpoints::{Recipe, RecipeSearchRequest, AUTOCOMPLETE_PATH, RECIPE_SEARCH_PATH};
use super::{RecipeSource, SuggestionSource};

#[derive(Debug)]
pub enum ApiConnectionError {
    InvalidBaseUrl(String),
    NetworkError(reqwest::Error),
    SerializationError(serde_json::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl fmt::Display for ApiConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiConnectionError::InvalidBaseUrl(detail) => {
                write!(f, "Invalid base URL: {}", detail)
            }
            ApiConnectionError::NetworkError(err) => write!(f, "Network error: {}", err),
            ApiConnectionError::SerializationError(err) => {
                write!(f, "Serialization error: {}", err)
            }
            ApiConnectionError::ApiError { status, error_body } => {
                write!(f, "API error {}: {}", status, error_body)
            }
        }
    }
}

impl Error for ApiConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiConnectionError::NetworkError(err) => Some(err),
            ApiConnectionError::SerializationError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiConnectionError {
    fn from(err: reqwest::Error) -> Self {
        ApiConnectionError::NetworkError(err)
    }
}

impl From<serde_json::Error> for ApiConnectionError {
    fn from(err: serde_json::Error) -> Self {
        ApiConnectionError::SerializationError(err)
    }
}

/// HTTP client for the recipe server's autocomplete and search endpoints.
#[derive(Debug, Clone)]
pub struct RecipeApiClient {
    client: Client,
    base_url: Url,
}

impl RecipeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiConnectionError> {
        // Url::join drops the last path segment unless it ends with a slash.
        let with_slash = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&with_slash)
            .map_err(|e| ApiConnectionError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiConnectionError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiConnectionError::InvalidBaseUrl(format!("{}: {}", path, e)))
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, ApiConnectionError> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ApiConnectionError::ApiError { status, error_body });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_suggestions(&self, query: &str) -> Result<Vec<String>, ApiConnectionError> {
        let url = self.endpoint(AUTOCOMPLETE_PATH)?;
        tracing::debug!(%url, query, "requesting suggestions");
        let response = self.client.get(url).query(&[("q", query)]).send().await?;
        let payload = Self::read_json(response).await?;

        // Entries that are not strings are dropped rather than failing the list.
        let suggestions = match payload {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
            other => {
                tracing::warn!(payload = %other, "autocomplete response is not an array");
                Vec::new()
            }
        };
        Ok(suggestions)
    }

    pub async fn fetch_recipes(&self, ingredients: &[String]) -> Result<Vec<Recipe>, ApiConnectionError> {
        let url = self.endpoint(RECIPE_SEARCH_PATH)?;
        tracing::debug!(%url, count = ingredients.len(), "searching recipes");
        let response = self
            .client
            .post(url)
            .json(&RecipeSearchRequest { ingredients })
            .send()
            .await?;
        let payload = Self::read_json(response).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

#[async_trait]
impl SuggestionSource for RecipeApiClient {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, ApiConnectionError> {
        self.fetch_suggestions(query).await
    }
}

#[async_trait]
impl RecipeSource for RecipeApiClient {
    async fn recipes_with_ingredients(
        &self,
        ingredients: &[String],
    ) -> Result<Vec<Recipe>, ApiConnectionError> {
        self.fetch_recipes(ingredients).await
    }
}
