use std::sync::Arc;

use crate::auth::AuthService;
use crate::favorites::FavoritesService;
use crate::provider::RecipeProvider;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub auth: AuthService,
    pub favorites: FavoritesService,
    pub provider: Arc<dyn RecipeProvider>,
    /// Default and ceiling for the `number` parameter of a recipe search.
    pub search_max_results: u32,
}
