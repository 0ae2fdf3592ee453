//! Stay endpoints: reservation CRUD and history lookups. Check-in and
//! check-out live on the room resource.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::{self, CreateStayRequest, Stay, StayStatus, UpdateStayRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_name, validate_price, validate_room_type};
use super::Pagination;

/// `serde(flatten)` does not mix with urlencoded numeric fields, so the
/// pagination fields are spelled out here instead of embedding `Pagination`.
#[derive(Debug, Default, Deserialize)]
pub struct StayFilter {
    pub room_number: Option<String>,
    #[serde(default)]
    pub offset: i64,
    pub limit: Option<i64>,
}

impl StayFilter {
    fn page(&self) -> Pagination {
        Pagination {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

fn validate_create_request(req: &CreateStayRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.guest_name, "guest_name") {
        errors.add("guest_name", e);
    }
    if let Err(e) = validate_room_type(&req.room_type) {
        errors.add("room_type", e);
    }
    if let Err(e) = validate_price(req.nightly_price, "nightly_price") {
        errors.add("nightly_price", e);
    }
    if let Some(ref status) = req.status {
        if StayStatus::parse(status).is_none() {
            errors.add("status", "Unknown stay status");
        }
    }

    errors.finish()
}

/// List stays, optionally filtered by room number
pub async fn list_stays(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StayFilter>,
) -> Result<Json<Vec<Stay>>, ApiError> {
    let stays = match filter.room_number {
        Some(ref number) => db::stays::list_by_room(&state.db, number).await?,
        None => {
            let (offset, limit) = filter.page().clamp();
            db::stays::list(&state.db, offset, limit).await?
        }
    };
    Ok(Json(stays))
}

/// Get a stay by id
pub async fn get_stay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Stay>, ApiError> {
    let stay = db::stays::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stay not found"))?;
    Ok(Json(stay))
}

/// Create a reservation record ahead of arrival
pub async fn create_stay(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateStayRequest>,
) -> Result<(StatusCode, Json<Stay>), ApiError> {
    validate_create_request(&req)?;

    let stay = db::stays::new_stay(req);
    db::stays::insert(&state.db, &stay).await?;

    tracing::info!(room = %stay.room_number, guest = %stay.guest_name, "Stay created");
    Ok((StatusCode::CREATED, Json(stay)))
}

/// Partial update of a stay record
pub async fn update_stay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStayRequest>,
) -> Result<Json<Stay>, ApiError> {
    if let Some(ref status) = req.status {
        if StayStatus::parse(status).is_none() {
            return Err(ApiError::validation_field("status", "Unknown stay status"));
        }
    }
    if let Some(price) = req.nightly_price {
        validate_price(price, "nightly_price")
            .map_err(|e| ApiError::validation_field("nightly_price", e))?;
    }

    let updated = db::stays::update(&state.db, &id, &req).await?;
    if updated == 0 {
        return Err(ApiError::not_found("Stay not found"));
    }

    let stay = db::stays::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stay not found"))?;
    Ok(Json(stay))
}

/// Delete a stay record. Open stays (no departure yet) cannot be deleted.
pub async fn delete_stay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let stay = db::stays::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stay not found"))?;

    if stay.status_enum() == StayStatus::CheckedIn && stay.departure_at.is_none() {
        return Err(ApiError::conflict(
            "Stay is in progress; check the guest out first",
        ));
    }

    db::stays::delete(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
