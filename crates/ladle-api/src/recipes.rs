use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde_json::Value;

use ladle_types::api::RecipeSearchQuery;

use crate::error::ApiError;
use crate::provider::ProviderError;
use crate::state::AppState;

/// GET /recipes?ingredients=...[&number=N]
///
/// The provider's candidate list is returned as-is.
pub async fn search_recipes(
    State(state): State<AppState>,
    query: Result<Query<RecipeSearchQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;

    let ingredients = query
        .ingredients
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ProviderError::MissingIngredients)?;

    let max_results = query
        .number
        .map_or(state.search_max_results, |n| n.min(state.search_max_results).max(1));

    let candidates = state
        .provider
        .search_by_ingredients(ingredients, max_results)
        .await?;

    Ok(Json(candidates))
}
