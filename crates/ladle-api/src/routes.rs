use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{auth, favorites, recipes};

/// All HTTP routes. Favorites require a bearer token; everything else is
/// public.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/recipes", get(recipes::search_recipes))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route(
            "/favorites",
            post(favorites::add_favorite).get(favorites::list_favorites),
        )
        .route("/favorites/details", get(favorites::list_favorite_details))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
