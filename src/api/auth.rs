//! Password hashing, JWT issuance/verification, and the identity extractor.
//!
//! Tokens are stateless HS256 JWTs carrying the user email and an expiry;
//! there is no server-side revocation.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequest, FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
    Form, Json,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use crate::db::{self, DbPool, LoginRequest, LoginResponse, User, UserResponse};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Issue a signed access token for a subject (the user email).
pub fn issue_token(subject: &str, secret: &str, ttl_minutes: i64) -> Result<String, ApiError> {
    let exp = chrono::Utc::now() + chrono::Duration::minutes(ttl_minutes);
    let claims = Claims {
        sub: subject.to_string(),
        exp: exp.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token: {}", e);
        ApiError::internal("Failed to issue token")
    })
}

/// Decode and validate a token (signature + expiry).
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
}

/// Resolve the caller's identity from a bearer token: validate the token,
/// then load the subject among the active staff users.
pub async fn resolve_identity(pool: &DbPool, secret: &str, token: &str) -> Result<User, ApiError> {
    let claims = decode_token(token, secret)?;

    let user = db::users::get_by_email(pool, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Could not validate credentials"));
    }
    Ok(user)
}

fn extract_bearer(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Auth middleware guarding the protected API routes.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?
        .to_string();

    resolve_identity(&state.db, &state.config.auth.jwt_secret, &token).await?;
    Ok(next.run(request).await)
}

/// Extractor for the current authenticated user
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?
            .to_string();
        resolve_identity(&state.db, &state.config.auth.jwt_secret, &token).await
    }
}

/// Accepts a JSON body or an OAuth2-style form-encoded body.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|_| ApiError::bad_request("Malformed form body"))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|_| ApiError::bad_request("Malformed JSON body"))?;
            Ok(Self(value))
        }
    }
}

/// Login endpoint: credentials in, `{access_token, token_type}` out.
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonOrForm(request): JsonOrForm<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = db::users::get_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }

    if !user.is_active {
        return Err(ApiError::bad_request("Inactive user"));
    }

    let token = issue_token(
        &user.email,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_minutes,
    )?;

    tracing::info!(user = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

/// Current-user endpoint
pub async fn me(user: User) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Seed the configured admin account when it does not exist yet.
pub async fn ensure_admin_user(pool: &DbPool, email: &str, password: &str) -> anyhow::Result<()> {
    if db::users::get_by_email(pool, email).await?.is_some() {
        return Ok(());
    }

    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;

    let user = db::users::new_user(
        db::CreateUserRequest {
            full_name: "Administrator".to_string(),
            email: email.to_string(),
            password: String::new(),
            phone: None,
            is_superuser: true,
            position: Some("admin".to_string()),
            department: None,
        },
        password_hash,
    );
    db::users::insert(pool, &user).await?;

    tracing::info!(email = %email, "Created admin user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::CreateUserRequest;
    use axum::http::StatusCode;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_state() -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();

        let mut config = Config::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config.auth.token_ttl_minutes = 30;
        Arc::new(AppState::new(config, pool))
    }

    async fn seed_user(state: &AppState, email: &str, password: &str, active: bool) {
        let mut user = db::users::new_user(
            CreateUserRequest {
                full_name: "Front Desk".to_string(),
                email: email.to_string(),
                password: String::new(),
                phone: None,
                is_superuser: false,
                position: None,
                department: None,
            },
            hash_password(password).unwrap(),
        );
        user.is_active = active;
        db::users::insert(&state.db, &user).await.unwrap();
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("hunter2hunter2", "not-a-hash"));
    }

    #[test]
    fn token_round_trip() {
        let token = issue_token("desk@hotel.test", "secret", 30).unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "desk@hotel.test");
    }

    #[test]
    fn token_rejects_wrong_secret_and_expiry() {
        let token = issue_token("desk@hotel.test", "secret", 30).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());

        // issued already expired (past the validation leeway)
        let stale = issue_token("desk@hotel.test", "secret", -10).unwrap();
        assert!(decode_token(&stale, "secret").is_err());
    }

    #[tokio::test]
    async fn login_issues_token_for_valid_credentials() {
        let state = test_state().await;
        seed_user(&state, "desk@hotel.test", "secret123", true).await;

        let response = login(
            State(state.clone()),
            JsonOrForm(LoginRequest {
                email: "desk@hotel.test".to_string(),
                password: "secret123".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.token_type, "bearer");
        assert!(!response.0.access_token.is_empty());

        let user = resolve_identity(&state.db, "test-secret", &response.0.access_token)
            .await
            .unwrap();
        assert_eq!(user.email, "desk@hotel.test");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let state = test_state().await;
        seed_user(&state, "desk@hotel.test", "secret123", true).await;

        let err = login(
            State(state),
            JsonOrForm(LoginRequest {
                email: "desk@hotel.test".to_string(),
                password: "wrong-password".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_rejects_inactive_user() {
        let state = test_state().await;
        seed_user(&state, "gone@hotel.test", "secret123", false).await;

        let err = login(
            State(state),
            JsonOrForm(LoginRequest {
                email: "gone@hotel.test".to_string(),
                password: "secret123".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn resolve_identity_rejects_garbage_and_deactivated() {
        let state = test_state().await;
        seed_user(&state, "desk@hotel.test", "secret123", true).await;

        assert!(resolve_identity(&state.db, "test-secret", "garbage")
            .await
            .is_err());

        // token for an unknown subject
        let token = issue_token("ghost@hotel.test", "test-secret", 30).unwrap();
        assert!(resolve_identity(&state.db, "test-secret", &token)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn admin_seeding_is_idempotent() {
        let state = test_state().await;
        ensure_admin_user(&state.db, "admin@hotel.test", "bootstrap-pw")
            .await
            .unwrap();
        ensure_admin_user(&state.db, "admin@hotel.test", "other-pw")
            .await
            .unwrap();

        let admin = db::users::get_by_email(&state.db, "admin@hotel.test")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_superuser);
        // the second call must not rotate the password
        assert!(verify_password("bootstrap-pw", &admin.password_hash));
    }
}
