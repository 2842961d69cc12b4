use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Spoonacular identifies recipes with plain integers.
pub type RecipeId = i64;

// -- JWT Claims --

/// Bearer token payload. The wire names (`userId`, `exp`) are part of the
/// public contract, so clients decoding the token see the same shape the
/// server signs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub exp: usize,
}

// -- Auth --

/// Missing and `null` fields both come through as `None` so the auth service
/// can report them as invalid input instead of axum rejecting the body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

// -- Recipes --

#[derive(Debug, Default, Deserialize)]
pub struct RecipeSearchQuery {
    pub ingredients: Option<String>,
    /// Upper bound on candidates returned by the provider.
    pub number: Option<u32>,
}

// -- Favorites --

#[derive(Debug, Serialize, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(rename = "recipeId")]
    pub recipe_id: RecipeId,
}

// -- Shared --

/// Body used by every non-data response, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
