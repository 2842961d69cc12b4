use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use ladle_types::api::MessageResponse;

use crate::auth::AuthError;
use crate::favorites::FavoritesError;
use crate::provider::ProviderError;

/// Everything a handler can fail with. Client errors carry their message to
/// the caller; server-side failures are logged here and answered with an
/// opaque message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Favorites(#[from] FavoritesError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::InvalidBody(rejection) => {
                debug!("Rejected request body: {}", rejection);
                (StatusCode::BAD_REQUEST, "Invalid request body".into())
            }
            ApiError::InvalidQuery(rejection) => {
                debug!("Rejected query string: {}", rejection);
                (StatusCode::BAD_REQUEST, "Invalid query parameters".into())
            }

            ApiError::Auth(e @ (AuthError::InvalidInput | AuthError::UsernameTaken)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Auth(e @ (AuthError::InvalidCredentials | AuthError::Unauthorized)) => {
                (StatusCode::UNAUTHORIZED, e.to_string())
            }
            ApiError::Auth(e @ AuthError::Forbidden) => (StatusCode::FORBIDDEN, e.to_string()),
            ApiError::Auth(AuthError::Internal(e)) => {
                error!("Auth failure: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
            }

            ApiError::Favorites(e @ FavoritesError::AlreadyFavorited) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Favorites(e @ FavoritesError::NotFound) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Favorites(FavoritesError::Upstream(e)) => {
                error!("Error fetching detailed favorite recipes: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error fetching detailed favorite recipes".into(),
                )
            }
            ApiError::Favorites(FavoritesError::Internal(e)) => {
                error!("Favorites failure: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
            }

            ApiError::Provider(e @ ProviderError::MissingIngredients) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Provider(e) => {
                error!("Error fetching recipes: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(MessageResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn status_of(err: impl Into<ApiError>) -> (StatusCode, String) {
        err.into().status_and_message()
    }

    #[test]
    fn auth_errors_map_to_client_statuses() {
        assert_eq!(status_of(AuthError::InvalidInput).0, StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AuthError::UsernameTaken).0, StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AuthError::InvalidCredentials).0, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::Unauthorized).0, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::Forbidden).0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn favorites_errors_map_to_client_statuses() {
        assert_eq!(status_of(FavoritesError::AlreadyFavorited).0, StatusCode::BAD_REQUEST);
        assert_eq!(status_of(FavoritesError::NotFound).0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let (status, message) = status_of(AuthError::Internal(anyhow!("disk I/O error at /var/db")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Server error");

        let upstream = ProviderError::Status(StatusCode::PAYMENT_REQUIRED);
        let (status, message) = status_of(FavoritesError::Upstream(upstream));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("402"));

        let (status, message) = status_of(ProviderError::Status(StatusCode::UNAUTHORIZED));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal Server Error");
    }

    #[test]
    fn missing_ingredients_is_bad_request() {
        let (status, message) = status_of(ProviderError::MissingIngredients);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Ingredients query parameter is required");
    }
}
