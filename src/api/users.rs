//! Staff user endpoints. Responses never include the credential hash, and
//! deletion is a soft delete that only flips `is_active`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{self, CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::AppState;

use super::auth::hash_password;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_name, validate_password};
use super::Pagination;

fn validate_create_request(req: &CreateUserRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.full_name, "full_name") {
        errors.add("full_name", e);
    }
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&req.password) {
        errors.add("password", e);
    }

    errors.finish()
}

/// List users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let (offset, limit) = page.clamp();
    let users = db::users::list(&state.db, offset, limit).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = db::users::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserResponse::from(user)))
}

/// Create a staff user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_create_request(&req)?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal("Failed to process password")
    })?;

    let user = db::users::new_user(req, password_hash);
    db::users::insert(&state.db, &user).await.map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("A user with this email already exists")
        } else {
            ApiError::from(e)
        }
    })?;

    tracing::info!(email = %user.email, "User created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Partial update. A present `password` field is validated and re-hashed.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Some(ref email) = req.email {
        if let Err(e) = validate_email(email) {
            errors.add("email", e);
        }
    }
    if let Some(ref password) = req.password {
        if let Err(e) = validate_password(password) {
            errors.add("password", e);
        }
    }
    errors.finish()?;

    let password_hash = match req.password {
        Some(ref password) => Some(hash_password(password).map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::internal("Failed to process password")
        })?),
        None => None,
    };

    let updated = db::users::update(&state.db, &id, &req, password_hash)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                ApiError::conflict("A user with this email already exists")
            } else {
                ApiError::from(e)
            }
        })?;
    if updated == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    let user = db::users::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserResponse::from(user)))
}

/// Soft delete: the row stays for audit history, logins stop working
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deactivated = db::users::deactivate(&state.db, &id).await?;
    if deactivated == 0 {
        return Err(ApiError::not_found("User not found"));
    }
    tracing::info!(user_id = %id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
