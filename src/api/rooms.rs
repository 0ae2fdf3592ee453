//! Room endpoints: inventory CRUD, the administrative status change, and the
//! check-in / check-out lifecycle operations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    self, CheckInRequest, CreateRoomRequest, Room, RoomStatus, Stay, UpdateRoomRequest,
    UpdateRoomStatusRequest,
};
use crate::frontdesk;
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_price, validate_room_number, validate_room_type};
use super::Pagination;

fn validate_create_request(req: &CreateRoomRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_room_number(&req.number) {
        errors.add("number", e);
    }
    if let Err(e) = validate_room_type(&req.room_type) {
        errors.add("room_type", e);
    }
    if let Err(e) = validate_price(req.nightly_price, "nightly_price") {
        errors.add("nightly_price", e);
    }
    if req.capacity < 1 {
        errors.add("capacity", "Capacity must be at least 1");
    }

    errors.finish()
}

fn validate_update_request(req: &UpdateRoomRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref room_type) = req.room_type {
        if let Err(e) = validate_room_type(room_type) {
            errors.add("room_type", e);
        }
    }
    if let Some(price) = req.nightly_price {
        if let Err(e) = validate_price(price, "nightly_price") {
            errors.add("nightly_price", e);
        }
    }
    if let Some(capacity) = req.capacity {
        if capacity < 1 {
            errors.add("capacity", "Capacity must be at least 1");
        }
    }

    errors.finish()
}

/// List rooms
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let (offset, limit) = page.clamp();
    let rooms = db::rooms::list(&state.db, offset, limit).await?;
    Ok(Json(rooms))
}

/// Get a room by id
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = db::rooms::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;
    Ok(Json(room))
}

/// Get a room by its door number
pub async fn get_room_by_number(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = db::rooms::get_by_number(&state.db, &number)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;
    Ok(Json(room))
}

/// Create a room; new rooms always start as `available`
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    validate_create_request(&req)?;

    let room = db::rooms::new_room(req);
    db::rooms::insert(&state.db, &room).await.map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict(format!("Room {} already exists", room.number))
        } else {
            ApiError::from(e)
        }
    })?;

    tracing::info!(number = %room.number, "Room created");
    Ok((StatusCode::CREATED, Json(room)))
}

/// Partial update; the number and the status are not editable here
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    validate_update_request(&req)?;

    let updated = db::rooms::update(&state.db, &id, &req).await?;
    if updated == 0 {
        return Err(ApiError::not_found("Room not found"));
    }

    let room = db::rooms::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;
    Ok(Json(room))
}

/// Administrative status change (e.g. cleaning -> available, -> maintenance).
/// Occupancy is driven by check-in and check-out, so `occupied` is rejected.
pub async fn update_room_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoomStatusRequest>,
) -> Result<Json<Room>, ApiError> {
    let status = RoomStatus::parse(&req.status).ok_or_else(|| {
        ApiError::validation_field(
            "status",
            "Status must be one of: available, occupied, cleaning, maintenance",
        )
    })?;
    if status == RoomStatus::Occupied {
        return Err(ApiError::bad_request(
            "Rooms become occupied through check-in, not a status change",
        ));
    }

    let room = db::rooms::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;
    if room.status_enum() == RoomStatus::Occupied {
        return Err(ApiError::conflict(format!(
            "Room {} is occupied; check the guest out first",
            room.number
        )));
    }

    db::rooms::set_status(&state.db, &id, status).await?;
    tracing::info!(number = %room.number, status = %status, "Room status changed");

    let room = db::rooms::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;
    Ok(Json(room))
}

/// Delete a room. Occupied rooms cannot be deleted.
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let room = db::rooms::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;
    if room.status_enum() == RoomStatus::Occupied {
        return Err(ApiError::conflict(format!(
            "Room {} is occupied and cannot be deleted",
            room.number
        )));
    }

    db::rooms::delete(&state.db, &id).await?;
    tracing::info!(number = %room.number, "Room deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Check a guest into a room
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<Stay>), ApiError> {
    if req.guest.full_name.trim().is_empty() {
        return Err(ApiError::validation_field(
            "guest.full_name",
            "Guest name is required",
        ));
    }

    let stay = frontdesk::check_in(&state.db, &id, req).await?;
    Ok((StatusCode::CREATED, Json(stay)))
}

/// Check the current guest out of a room
pub async fn check_out(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Stay>, ApiError> {
    let stay = frontdesk::check_out(&state.db, &id).await?;
    Ok(Json(stay))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::GuestInfo;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_state() -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        Arc::new(AppState::new(Config::default(), pool))
    }

    fn sample_room(number: &str) -> CreateRoomRequest {
        CreateRoomRequest {
            number: number.to_string(),
            room_type: "double".to_string(),
            nightly_price: 80.0,
            capacity: 2,
            description: None,
            private_bathroom: true,
            balcony: false,
            sea_view: false,
            pets_allowed: false,
            wifi: true,
            air_conditioning: true,
            television: true,
            minibar: false,
            safe_box: false,
            laundry_service: true,
            notes: None,
        }
    }

    fn walk_in() -> CheckInRequest {
        CheckInRequest {
            guest: GuestInfo {
                full_name: "Ana Torres".to_string(),
                email: None,
                phone: None,
                document_id: None,
            },
            check_out_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_bad_payload() {
        let state = test_state().await;
        let mut req = sample_room("101");
        req.room_type = "penthouse".to_string();
        req.nightly_price = -1.0;

        let err = create_room(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_number_returns_conflict() {
        let state = test_state().await;
        create_room(State(state.clone()), Json(sample_room("101")))
            .await
            .unwrap();
        let err = create_room(State(state), Json(sample_room("101")))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn status_endpoint_rejects_occupied_target() {
        let state = test_state().await;
        let (_, Json(room)) = create_room(State(state.clone()), Json(sample_room("102")))
            .await
            .unwrap();

        let err = update_room_status(
            State(state),
            Path(room.id),
            Json(UpdateRoomStatusRequest {
                status: "occupied".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn occupied_room_cannot_be_deleted_or_retagged() {
        let state = test_state().await;
        let (_, Json(room)) = create_room(State(state.clone()), Json(sample_room("103")))
            .await
            .unwrap();
        check_in(State(state.clone()), Path(room.id.clone()), Json(walk_in()))
            .await
            .unwrap();

        let err = delete_room(State(state.clone()), Path(room.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = update_room_status(
            State(state),
            Path(room.id),
            Json(UpdateRoomStatusRequest {
                status: "maintenance".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn check_in_then_out_through_handlers() {
        let state = test_state().await;
        let (_, Json(room)) = create_room(State(state.clone()), Json(sample_room("104")))
            .await
            .unwrap();

        let (status, Json(stay)) =
            check_in(State(state.clone()), Path(room.id.clone()), Json(walk_in()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(stay.room_number, "104");

        let Json(closed) = check_out(State(state.clone()), Path(room.id.clone()))
            .await
            .unwrap();
        assert_eq!(closed.id, stay.id);

        let Json(stored) = get_room(State(state), Path(room.id)).await.unwrap();
        assert_eq!(stored.status, "cleaning");
    }
}
