mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ladle_api::auth::AuthService;
use ladle_api::favorites::FavoritesService;
use ladle_api::provider::{RecipeProvider, SpoonacularClient};
use ladle_api::routes;
use ladle_api::state::{AppState, AppStateInner};

use crate::config::Config;

/// Used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "ladle=debug,ladle_api=debug,ladle_db=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(ladle_db::Database::open(&config.db_path)?);

    let provider: Arc<dyn RecipeProvider> = Arc::new(SpoonacularClient::new(
        &config.spoonacular_base_url,
        config.spoonacular_api_key.clone(),
        config.upstream_timeout,
    )?);

    // Shared state
    let app_state: AppState = Arc::new(AppStateInner {
        auth: AuthService::new(db.clone(), &config.jwt_secret),
        favorites: FavoritesService::new(db, provider.clone()),
        provider,
        search_max_results: config.search_max_results,
    });

    let app = routes::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Ladle server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable ({}), waiting for Ctrl+C", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_filter_parses() {
        let filter = tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        for target in ["ladle", "ladle_api", "ladle_db", "tower_http"] {
            assert!(rendered.contains(target), "{target} missing from {rendered}");
        }
    }
}
