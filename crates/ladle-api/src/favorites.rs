use std::sync::Arc;

use anyhow::anyhow;
use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::info;
use uuid::Uuid;

use ladle_db::{Database, FavoriteInsert};
use ladle_types::api::{AddFavoriteRequest, MessageResponse, RecipeId};

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::provider::{ProviderError, RecipeProvider};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("Recipe is already in favorites")]
    AlreadyFavorited,
    #[error("No favorite recipes found")]
    NotFound,
    #[error("recipe detail lookup failed: {0}")]
    Upstream(#[source] ProviderError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Successful outcomes of `FavoritesService::add_favorite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAdded {
    ListCreated,
    Appended,
}

pub struct FavoritesService {
    db: Arc<Database>,
    provider: Arc<dyn RecipeProvider>,
}

impl FavoritesService {
    pub fn new(db: Arc<Database>, provider: Arc<dyn RecipeProvider>) -> Self {
        Self { db, provider }
    }

    pub async fn add_favorite(
        &self,
        user_id: Uuid,
        recipe_id: RecipeId,
    ) -> Result<FavoriteAdded, FavoritesError> {
        let db = Arc::clone(&self.db);
        let outcome = tokio::task::spawn_blocking(move || {
            db.add_favorite(&user_id.to_string(), recipe_id)
        })
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

        match outcome {
            FavoriteInsert::ListCreated => {
                info!("Created favorites list for {} with recipe {}", user_id, recipe_id);
                Ok(FavoriteAdded::ListCreated)
            }
            FavoriteInsert::Appended => Ok(FavoriteAdded::Appended),
            FavoriteInsert::AlreadyPresent => Err(FavoritesError::AlreadyFavorited),
        }
    }

    /// Recipe ids in the order they were added. A user who never added a
    /// favorite has no list, which is `NotFound` rather than empty.
    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<RecipeId>, FavoritesError> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.get_favorites(&user_id.to_string()))
            .await
            .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??
            .ok_or(FavoritesError::NotFound)
    }

    /// Fetch details for every favorite concurrently. The result keeps the
    /// list's order; a single failed lookup fails the whole call and aborts
    /// the lookups still in flight.
    pub async fn list_favorite_details(&self, user_id: Uuid) -> Result<Vec<Value>, FavoritesError> {
        let ids = self.list_favorites(user_id).await?;

        let mut lookups = JoinSet::new();
        for (index, recipe_id) in ids.iter().copied().enumerate() {
            let provider = Arc::clone(&self.provider);
            lookups.spawn(async move { (index, provider.recipe_details(recipe_id).await) });
        }

        let mut slots: Vec<Option<Value>> = vec![None; ids.len()];
        while let Some(joined) = lookups.join_next().await {
            let (index, result) = joined.map_err(|e| anyhow!("detail lookup task failed: {}", e))?;
            slots[index] = Some(result.map_err(FavoritesError::Upstream)?);
        }

        let details = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| anyhow!("detail lookup finished without a result"))?;

        Ok(details)
    }
}

/// POST /favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let added = state
        .favorites
        .add_favorite(identity.user_id, req.recipe_id)
        .await?;

    let (status, message) = match added {
        FavoriteAdded::ListCreated => (StatusCode::CREATED, "Favorite list created and recipe added"),
        FavoriteAdded::Appended => (StatusCode::OK, "Recipe added to favorites"),
    };

    Ok((status, Json(MessageResponse::new(message))))
}

/// GET /favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<RecipeId>>, ApiError> {
    Ok(Json(state.favorites.list_favorites(identity.user_id).await?))
}

/// GET /favorites/details
pub async fn list_favorite_details(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.favorites.list_favorite_details(identity.user_id).await?))
}
