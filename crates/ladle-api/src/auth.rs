use std::sync::Arc;

use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use ladle_db::{Database, UserInsert};
use ladle_types::api::{Claims, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

use crate::error::ApiError;
use crate::middleware::Identity;
use crate::state::AppState;

/// Tokens expire one hour after issue. There is no revocation list.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username and password are required")]
    InvalidInput,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized - Token Required")]
    Unauthorized,
    #[error("Forbidden - Invalid Token")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Registration, credential checks and bearer tokens.
pub struct AuthService {
    db: Arc<Database>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(db: Arc<Database>, jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means expired; no grace window.
        validation.leeway = 0;

        Self {
            db,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Hash the password with Argon2id and store the user. Returns the new
    /// user's id.
    pub async fn register(&self, username: &str, password: &str) -> Result<Uuid, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput);
        }

        let db = Arc::clone(&self.db);
        let username = username.to_string();
        let password = password.to_string();

        // Hashing is deliberately slow; keep it off the async workers.
        let (user_id, outcome) = tokio::task::spawn_blocking(move || -> Result<_, AuthError> {
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| anyhow!("password hashing failed: {}", e))?
                .to_string();

            let user_id = Uuid::new_v4();
            let outcome = db.create_user(&user_id.to_string(), &username, &password_hash)?;
            Ok((user_id, outcome))
        })
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

        match outcome {
            UserInsert::Created => {
                info!("Registered user {}", user_id);
                Ok(user_id)
            }
            UserInsert::UsernameTaken => Err(AuthError::UsernameTaken),
        }
    }

    /// Verify the credentials and issue a token for the user.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let db = Arc::clone(&self.db);
        let username = username.to_string();
        let password = password.to_string();

        let user_id = tokio::task::spawn_blocking(move || -> Result<Uuid, AuthError> {
            let user = db
                .get_user_by_username(&username)?
                .ok_or(AuthError::InvalidCredentials)?;

            let parsed_hash = PasswordHash::new(&user.password)
                .map_err(|e| anyhow!("stored hash for {} is unreadable: {}", user.id, e))?;

            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .map_err(|_| AuthError::InvalidCredentials)?;

            Ok(user.id.parse::<Uuid>().map_err(|e| anyhow!("stored user id is not a UUID: {}", e))?)
        })
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))??;

        self.issue_token(user_id, chrono::Utc::now().timestamp())
    }

    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// `None` means the caller presented no credentials at all. Anything
    /// presented that does not verify, including an expired token, is
    /// `Forbidden`.
    pub fn authenticate(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = token.ok_or(AuthError::Unauthorized)?;

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                AuthError::Forbidden
            })?;

        Ok(Identity {
            user_id: token_data.claims.user_id,
        })
    }

    fn issue_token(&self, user_id: Uuid, issued_at: i64) -> Result<String, AuthError> {
        let exp = usize::try_from(issued_at + TOKEN_LIFETIME_SECS)
            .map_err(|_| anyhow!("token expiry out of range"))?;

        let claims = Claims { user_id, exp };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("token signing failed: {}", e))?;

        Ok(token)
    }
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    state
        .auth
        .register(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let token = state
        .auth
        .login(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(LoginResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (AuthService, Arc<Database>) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        (AuthService::new(Arc::clone(&db), "test-secret"), db)
    }

    #[tokio::test]
    async fn register_rejects_empty_fields() {
        let (auth, db) = service();

        assert!(matches!(auth.register("", "pw").await, Err(AuthError::InvalidInput)));
        assert!(matches!(auth.register("   ", "pw").await, Err(AuthError::InvalidInput)));
        assert!(matches!(auth.register("alice", "").await, Err(AuthError::InvalidInput)));
        assert!(db.get_user_by_username("").unwrap().is_none());
        assert!(db.get_user_by_username("alice").unwrap().is_none());
    }

    #[tokio::test]
    async fn register_twice_is_username_taken() {
        let (auth, db) = service();

        auth.register("alice", "hunter2").await.unwrap();
        let second = auth.register("alice", "other").await;

        assert!(matches!(second, Err(AuthError::UsernameTaken)));
        assert!(db.get_user_by_username("alice").unwrap().is_some());
        assert!(auth.login("alice", "hunter2").await.is_ok());
        assert!(matches!(auth.login("alice", "other").await, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let (auth, db) = service();

        auth.register("alice", "hunter2").await.unwrap();
        let row = db.get_user_by_username("alice").unwrap().unwrap();

        assert_ne!(row.password, "hunter2");
        assert!(row.password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn login_token_authenticates_as_registered_user() {
        let (auth, _db) = service();

        let user_id = auth.register("alice", "hunter2").await.unwrap();
        let token = auth.login("alice", "hunter2").await.unwrap();
        let identity = auth.authenticate(Some(&token)).unwrap();

        assert_eq!(identity.user_id, user_id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let (auth, _db) = service();
        auth.register("alice", "hunter2").await.unwrap();

        assert!(matches!(auth.login("alice", "wrong").await, Err(AuthError::InvalidCredentials)));
        assert!(matches!(auth.login("bob", "hunter2").await, Err(AuthError::InvalidCredentials)));
        assert!(matches!(auth.login("", "").await, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn missing_token_is_unauthorized() {
        let (auth, _db) = service();
        assert!(matches!(auth.authenticate(None), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn garbage_token_is_forbidden() {
        let (auth, _db) = service();

        assert!(matches!(auth.authenticate(Some("")), Err(AuthError::Forbidden)));
        assert!(matches!(auth.authenticate(Some("not.a.jwt")), Err(AuthError::Forbidden)));
    }

    #[test]
    fn token_from_another_secret_is_forbidden() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let issuer = AuthService::new(Arc::clone(&db), "secret-a");
        let verifier = AuthService::new(db, "secret-b");

        let token = issuer.issue_token(Uuid::new_v4(), chrono::Utc::now().timestamp()).unwrap();

        assert!(matches!(verifier.authenticate(Some(&token)), Err(AuthError::Forbidden)));
    }

    #[test]
    fn token_is_valid_until_expiry_only() {
        let (auth, _db) = service();
        let user_id = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();

        // Issued almost an hour ago: still inside its lifetime.
        let fresh = auth.issue_token(user_id, now - TOKEN_LIFETIME_SECS + 60).unwrap();
        assert_eq!(auth.authenticate(Some(&fresh)).unwrap().user_id, user_id);

        // Issued just over an hour ago: expired.
        let stale = auth.issue_token(user_id, now - TOKEN_LIFETIME_SECS - 1).unwrap();
        assert!(matches!(auth.authenticate(Some(&stale)), Err(AuthError::Forbidden)));
    }

    #[test]
    fn token_payload_uses_wire_names() {
        let (auth, _db) = service();
        let user_id = Uuid::new_v4();

        let token = auth.issue_token(user_id, 1_000).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims["userId"], user_id.to_string());
        assert_eq!(data.claims["exp"], 1_000 + TOKEN_LIFETIME_SECS);
    }
}
