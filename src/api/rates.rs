//! Seasonal rate endpoints. Rates are reference pricing per room type;
//! stays always snapshot the price they were sold at.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{self, CreateRateRequest, Rate, UpdateRateRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_name, validate_price, validate_room_type};
use super::Pagination;

fn validate_create_request(req: &CreateRateRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.name, "name") {
        errors.add("name", e);
    }
    if let Err(e) = validate_room_type(&req.room_type) {
        errors.add("room_type", e);
    }
    if let Err(e) = validate_price(req.price, "price") {
        errors.add("price", e);
    }
    if let (Some(from), Some(to)) = (req.valid_from, req.valid_to) {
        if to < from {
            errors.add("valid_to", "valid_to cannot be before valid_from");
        }
    }

    errors.finish()
}

fn validate_update_request(req: &UpdateRateRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref name) = req.name {
        if let Err(e) = validate_name(name, "name") {
            errors.add("name", e);
        }
    }
    if let Some(ref room_type) = req.room_type {
        if let Err(e) = validate_room_type(room_type) {
            errors.add("room_type", e);
        }
    }
    if let Some(price) = req.price {
        if let Err(e) = validate_price(price, "price") {
            errors.add("price", e);
        }
    }
    if let (Some(from), Some(to)) = (req.valid_from, req.valid_to) {
        if to < from {
            errors.add("valid_to", "valid_to cannot be before valid_from");
        }
    }

    errors.finish()
}

/// List rates
pub async fn list_rates(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Rate>>, ApiError> {
    let (offset, limit) = page.clamp();
    let rates = db::rates::list(&state.db, offset, limit).await?;
    Ok(Json(rates))
}

/// Get a rate by id
pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Rate>, ApiError> {
    let rate = db::rates::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Rate not found"))?;
    Ok(Json(rate))
}

/// Create a rate
pub async fn create_rate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRateRequest>,
) -> Result<(StatusCode, Json<Rate>), ApiError> {
    validate_create_request(&req)?;

    let rate = db::rates::new_rate(req);
    db::rates::insert(&state.db, &rate).await?;

    tracing::info!(name = %rate.name, room_type = %rate.room_type, "Rate created");
    Ok((StatusCode::CREATED, Json(rate)))
}

/// Partial update of a rate
pub async fn update_rate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRateRequest>,
) -> Result<Json<Rate>, ApiError> {
    validate_update_request(&req)?;

    let updated = db::rates::update(&state.db, &id, &req).await?;
    if updated == 0 {
        return Err(ApiError::not_found("Rate not found"));
    }

    let rate = db::rates::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Rate not found"))?;
    Ok(Json(rate))
}

/// Delete a rate
pub async fn delete_rate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = db::rates::delete(&state.db, &id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Rate not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
