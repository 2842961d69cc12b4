//! Outbound recipe lookups.
//!
//! Responses are passed through untouched as JSON values; the only local
//! concern is turning transport and status failures into `ProviderError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use ladle_types::api::RecipeId;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Ingredients query parameter is required")]
    MissingIngredients,
    #[error("recipe provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("recipe provider returned {0}")]
    Status(StatusCode),
}

#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Candidate recipes using the given comma-separated ingredients.
    async fn search_by_ingredients(
        &self,
        ingredients: &str,
        max_results: u32,
    ) -> Result<Value, ProviderError>;

    /// Full information for one recipe.
    async fn recipe_details(&self, recipe_id: RecipeId) -> Result<Value, ProviderError>;
}

/// Spoonacular REST client.
pub struct SpoonacularClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    /// Every request made by this client is bounded by `timeout`; hitting it
    /// surfaces as `ProviderError::Request`.
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Recipe provider {} returned {}: {}", path, status, body);
            return Err(ProviderError::Status(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RecipeProvider for SpoonacularClient {
    async fn search_by_ingredients(
        &self,
        ingredients: &str,
        max_results: u32,
    ) -> Result<Value, ProviderError> {
        let number = max_results.to_string();
        self.get_json(
            "/recipes/findByIngredients",
            &[("ingredients", ingredients), ("number", &number)],
        )
        .await
    }

    async fn recipe_details(&self, recipe_id: RecipeId) -> Result<Value, ProviderError> {
        self.get_json(&format!("/recipes/{}/information", recipe_id), &[])
            .await
    }
}
