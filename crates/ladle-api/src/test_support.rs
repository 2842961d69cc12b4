use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use ladle_db::Database;
use ladle_types::api::RecipeId;

use crate::provider::{ProviderError, RecipeProvider};

/// In-memory database with one registered user.
pub fn db_with_user() -> (Arc<Database>, Uuid) {
    let db = Database::open_in_memory().unwrap();
    let user_id = Uuid::new_v4();
    db.create_user(&user_id.to_string(), "tester", "not-a-real-hash").unwrap();
    (Arc::new(db), user_id)
}

/// Provider stub. Details are `{"id": <id>}`; searches echo their inputs.
#[derive(Default)]
pub struct FakeProvider {
    delays: HashMap<RecipeId, Duration>,
    failing: HashSet<RecipeId>,
}

impl FakeProvider {
    pub fn with_delay(mut self, recipe_id: RecipeId, delay: Duration) -> Self {
        self.delays.insert(recipe_id, delay);
        self
    }

    pub fn failing(mut self, recipe_id: RecipeId) -> Self {
        self.failing.insert(recipe_id);
        self
    }
}

#[async_trait]
impl RecipeProvider for FakeProvider {
    async fn search_by_ingredients(
        &self,
        ingredients: &str,
        max_results: u32,
    ) -> Result<Value, ProviderError> {
        if ingredients == "broken" {
            return Err(ProviderError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(json!([{ "ingredients": ingredients, "number": max_results }]))
    }

    async fn recipe_details(&self, recipe_id: RecipeId) -> Result<Value, ProviderError> {
        if let Some(delay) = self.delays.get(&recipe_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&recipe_id) {
            return Err(ProviderError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(json!({ "id": recipe_id }))
    }
}
