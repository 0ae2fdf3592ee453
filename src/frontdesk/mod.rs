//! Front-desk operations: check-in and check-out.
//!
//! These are the only multi-write operations in the system. Each runs inside
//! a single database transaction so the room-status flip and the stay
//! creation/closure land together or not at all. The status flip itself is a
//! compare-and-swap, which also closes the window between reading the room
//! and claiming it.

use chrono::{Days, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::{
    self, CheckInRequest, DbPool, Room, RoomStatus, Stay, StayStatus,
};

#[derive(Debug, Error)]
pub enum FrontDeskError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Room {0} is not available")]
    RoomNotAvailable(String),
    #[error("Room {0} is not occupied")]
    RoomNotOccupied(String),
    /// An occupied room must have exactly one open stay; hitting this means
    /// the data is inconsistent.
    #[error("No open stay found for room {0}")]
    NoOpenStay(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn build_stay(room: &Room, guest_id: &str, req: &CheckInRequest) -> Stay {
    let now = Utc::now();
    let check_in_date = now.date_naive();
    let check_out_date = req
        .check_out_date
        .unwrap_or_else(|| check_in_date + Days::new(1));
    let nights = db::stays::nights_between(check_in_date, check_out_date);

    Stay {
        id: Uuid::new_v4().to_string(),
        guest_id: Some(guest_id.to_string()),
        guest_name: req.guest.full_name.clone(),
        guest_email: req.guest.email.clone(),
        guest_phone: req.guest.phone.clone(),
        guest_document: req.guest.document_id.clone(),
        room_number: room.number.clone(),
        room_type: room.room_type.clone(),
        check_in_date: check_in_date.to_string(),
        check_out_date: check_out_date.to_string(),
        nightly_price: room.nightly_price,
        nights,
        total: room.nightly_price * nights as f64,
        status: StayStatus::CheckedIn.as_str().to_string(),
        departure_at: None,
        notes: req.notes.clone(),
        created_at: now.to_rfc3339(),
        updated_at: now.to_rfc3339(),
    }
}

/// Check a guest into a room.
///
/// Fails with `RoomNotFound` if the room does not exist and with
/// `RoomNotAvailable` unless its status is `available`. On success the guest
/// row, the stay row, and the occupied status are committed atomically and
/// the new stay is returned.
pub async fn check_in(
    pool: &DbPool,
    room_id: &str,
    req: CheckInRequest,
) -> Result<Stay, FrontDeskError> {
    let mut tx = pool.begin().await?;

    let room = db::rooms::get(&mut *tx, room_id)
        .await?
        .ok_or(FrontDeskError::RoomNotFound)?;

    let claimed = db::rooms::set_status_if(
        &mut *tx,
        room_id,
        RoomStatus::Available,
        RoomStatus::Occupied,
    )
    .await?;
    if claimed == 0 {
        return Err(FrontDeskError::RoomNotAvailable(room.number));
    }

    let guest = db::guests::new_guest(&req.guest);
    db::guests::insert(&mut *tx, &guest).await?;

    let stay = build_stay(&room, &guest.id, &req);
    db::stays::insert(&mut *tx, &stay).await?;

    tx.commit().await?;

    info!(room = %room.number, guest = %stay.guest_name, "Guest checked in");
    Ok(stay)
}

/// Check the current guest out of a room.
///
/// Fails with `RoomNotFound` if the room does not exist, `RoomNotOccupied`
/// unless its status is `occupied`, and `NoOpenStay` when no stay without a
/// departure timestamp exists for the room. On success the departure
/// timestamp and the cleaning status are committed atomically and the closed
/// stay is returned.
pub async fn check_out(pool: &DbPool, room_id: &str) -> Result<Stay, FrontDeskError> {
    let mut tx = pool.begin().await?;

    let room = db::rooms::get(&mut *tx, room_id)
        .await?
        .ok_or(FrontDeskError::RoomNotFound)?;

    let released = db::rooms::set_status_if(
        &mut *tx,
        room_id,
        RoomStatus::Occupied,
        RoomStatus::Cleaning,
    )
    .await?;
    if released == 0 {
        return Err(FrontDeskError::RoomNotOccupied(room.number));
    }

    let mut stay = db::stays::find_open(&mut *tx, &room.number)
        .await?
        .ok_or_else(|| FrontDeskError::NoOpenStay(room.number.clone()))?;

    let departure_at = Utc::now().to_rfc3339();
    db::stays::close(&mut *tx, &stay.id, &departure_at).await?;

    tx.commit().await?;

    stay.departure_at = Some(departure_at.clone());
    stay.status = StayStatus::CheckedOut.as_str().to_string();
    stay.updated_at = departure_at;

    info!(room = %room.number, guest = %stay.guest_name, "Guest checked out");
    Ok(stay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CreateRoomRequest, GuestInfo};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> DbPool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn make_room(pool: &DbPool, number: &str) -> Room {
        let room = db::rooms::new_room(CreateRoomRequest {
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
        });
        db::rooms::insert(pool, &room).await.unwrap();
        room
    }

    fn walk_in(name: &str) -> CheckInRequest {
        CheckInRequest {
            guest: GuestInfo {
                full_name: name.to_string(),
                email: Some("guest@example.com".to_string()),
                phone: None,
                document_id: Some("X1234567".to_string()),
            },
            check_out_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn check_in_occupies_room_and_opens_stay() {
        let pool = test_pool().await;
        let room = make_room(&pool, "101").await;

        let stay = check_in(&pool, &room.id, walk_in("Ana Torres")).await.unwrap();
        assert_eq!(stay.room_number, "101");
        assert_eq!(stay.status_enum(), StayStatus::CheckedIn);
        assert!(stay.departure_at.is_none());
        assert_eq!(stay.nightly_price, 80.0);

        let stored = db::rooms::get(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(stored.status_enum(), RoomStatus::Occupied);

        let open = db::stays::find_open(&pool, "101").await.unwrap();
        assert_eq!(open.unwrap().id, stay.id);
    }

    #[tokio::test]
    async fn check_in_rejects_unknown_room() {
        let pool = test_pool().await;
        let err = check_in(&pool, "no-such-room", walk_in("Ana Torres"))
            .await
            .unwrap_err();
        assert!(matches!(err, FrontDeskError::RoomNotFound));
    }

    #[tokio::test]
    async fn check_in_rejects_occupied_room() {
        let pool = test_pool().await;
        let room = make_room(&pool, "102").await;
        check_in(&pool, &room.id, walk_in("Ana Torres")).await.unwrap();

        let err = check_in(&pool, &room.id, walk_in("Luis Vega"))
            .await
            .unwrap_err();
        assert!(matches!(err, FrontDeskError::RoomNotAvailable(n) if n == "102"));

        // exactly one open stay
        let stays = db::stays::list_by_room(&pool, "102").await.unwrap();
        assert_eq!(stays.len(), 1);
    }

    #[tokio::test]
    async fn check_out_sets_departure_and_cleaning() {
        let pool = test_pool().await;
        let room = make_room(&pool, "103").await;
        let stay = check_in(&pool, &room.id, walk_in("Ana Torres")).await.unwrap();

        let closed = check_out(&pool, &room.id).await.unwrap();
        assert_eq!(closed.id, stay.id);
        assert!(closed.departure_at.is_some());
        assert_eq!(closed.status_enum(), StayStatus::CheckedOut);

        let stored_room = db::rooms::get(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(stored_room.status_enum(), RoomStatus::Cleaning);

        let stored_stay = db::stays::get(&pool, &stay.id).await.unwrap().unwrap();
        assert!(stored_stay.departure_at.is_some());
        assert!(db::stays::find_open(&pool, "103").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_check_out_conflicts() {
        let pool = test_pool().await;
        let room = make_room(&pool, "104").await;
        check_in(&pool, &room.id, walk_in("Ana Torres")).await.unwrap();

        check_out(&pool, &room.id).await.unwrap();
        let err = check_out(&pool, &room.id).await.unwrap_err();
        assert!(matches!(err, FrontDeskError::RoomNotOccupied(n) if n == "104"));
    }

    #[tokio::test]
    async fn check_out_without_open_stay_rolls_back() {
        let pool = test_pool().await;
        let room = make_room(&pool, "105").await;

        // force the inconsistent state: occupied with no stay row
        db::rooms::set_status(&pool, &room.id, RoomStatus::Occupied)
            .await
            .unwrap();

        let err = check_out(&pool, &room.id).await.unwrap_err();
        assert!(matches!(err, FrontDeskError::NoOpenStay(n) if n == "105"));

        // the aborted transaction must not have released the room
        let stored = db::rooms::get(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(stored.status_enum(), RoomStatus::Occupied);
    }

    #[tokio::test]
    async fn full_room_lifecycle() {
        let pool = test_pool().await;
        let room = make_room(&pool, "106").await;

        check_in(&pool, &room.id, walk_in("Ana Torres")).await.unwrap();
        check_out(&pool, &room.id).await.unwrap();

        // cleaning -> available is the manual administrative transition
        db::rooms::set_status(&pool, &room.id, RoomStatus::Available)
            .await
            .unwrap();

        // the room can host the next guest
        let stay = check_in(&pool, &room.id, walk_in("Luis Vega")).await.unwrap();
        assert_eq!(stay.guest_name, "Luis Vega");
    }
}
