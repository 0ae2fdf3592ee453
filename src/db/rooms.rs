//! Room queries. Every function takes an explicit executor so callers can
//! run against the pool or inside an open transaction.

use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::{CreateRoomRequest, Room, RoomStatus, UpdateRoomRequest};

pub fn new_room(req: CreateRoomRequest) -> Room {
    let now = chrono::Utc::now().to_rfc3339();
    Room {
        id: Uuid::new_v4().to_string(),
        number: req.number,
        room_type: req.room_type,
        nightly_price: req.nightly_price,
        status: RoomStatus::Available.as_str().to_string(),
        capacity: req.capacity,
        description: req.description,
        private_bathroom: req.private_bathroom,
        balcony: req.balcony,
        sea_view: req.sea_view,
        pets_allowed: req.pets_allowed,
        wifi: req.wifi,
        air_conditioning: req.air_conditioning,
        television: req.television,
        minibar: req.minibar,
        safe_box: req.safe_box,
        laundry_service: req.laundry_service,
        notes: req.notes,
        created_at: now.clone(),
        updated_at: now,
    }
}

pub async fn get<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<Option<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn get_by_number<'e>(
    ex: impl SqliteExecutor<'e>,
    number: &str,
) -> sqlx::Result<Option<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE number = ?")
        .bind(number)
        .fetch_optional(ex)
        .await
}

pub async fn list<'e>(
    ex: impl SqliteExecutor<'e>,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY created_at, id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, room: &Room) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO rooms (
            id, number, room_type, nightly_price, status, capacity, description,
            private_bathroom, balcony, sea_view, pets_allowed, wifi,
            air_conditioning, television, minibar, safe_box, laundry_service,
            notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&room.id)
    .bind(&room.number)
    .bind(&room.room_type)
    .bind(room.nightly_price)
    .bind(&room.status)
    .bind(room.capacity)
    .bind(&room.description)
    .bind(room.private_bathroom)
    .bind(room.balcony)
    .bind(room.sea_view)
    .bind(room.pets_allowed)
    .bind(room.wifi)
    .bind(room.air_conditioning)
    .bind(room.television)
    .bind(room.minibar)
    .bind(room.safe_box)
    .bind(room.laundry_service)
    .bind(&room.notes)
    .bind(&room.created_at)
    .bind(&room.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

/// Apply only the provided fields; absent fields keep their stored value.
pub async fn update<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    req: &UpdateRoomRequest,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE rooms SET
            room_type = COALESCE(?, room_type),
            nightly_price = COALESCE(?, nightly_price),
            capacity = COALESCE(?, capacity),
            description = COALESCE(?, description),
            private_bathroom = COALESCE(?, private_bathroom),
            balcony = COALESCE(?, balcony),
            sea_view = COALESCE(?, sea_view),
            pets_allowed = COALESCE(?, pets_allowed),
            wifi = COALESCE(?, wifi),
            air_conditioning = COALESCE(?, air_conditioning),
            television = COALESCE(?, television),
            minibar = COALESCE(?, minibar),
            safe_box = COALESCE(?, safe_box),
            laundry_service = COALESCE(?, laundry_service),
            notes = COALESCE(?, notes),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.room_type)
    .bind(req.nightly_price)
    .bind(req.capacity)
    .bind(&req.description)
    .bind(req.private_bathroom)
    .bind(req.balcony)
    .bind(req.sea_view)
    .bind(req.pets_allowed)
    .bind(req.wifi)
    .bind(req.air_conditioning)
    .bind(req.television)
    .bind(req.minibar)
    .bind(req.safe_box)
    .bind(req.laundry_service)
    .bind(&req.notes)
    .bind(&now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_status<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    status: RoomStatus,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query("UPDATE rooms SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(&now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Compare-and-swap on the status column. Returns 0 when the room is not in
/// `from`, so two concurrent check-ins cannot both claim the same room.
pub async fn set_status_if<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    from: RoomStatus,
    to: RoomStatus,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result =
        sqlx::query("UPDATE rooms SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(&now)
            .bind(id)
            .bind(from.as_str())
            .execute(ex)
            .await?;
    Ok(result.rows_affected())
}

pub async fn delete<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, CreateRoomRequest};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> db::DbPool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    fn sample_request(number: &str) -> CreateRoomRequest {
        CreateRoomRequest {
            number: number.to_string(),
            room_type: "double".to_string(),
            nightly_price: 75.0,
            capacity: 2,
            description: Some("Street side".to_string()),
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

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let pool = test_pool().await;
        let room = new_room(sample_request("101"));
        insert(&pool, &room).await.unwrap();

        let stored = get(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(stored.number, "101");
        assert_eq!(stored.room_type, "double");
        assert_eq!(stored.nightly_price, 75.0);
        assert_eq!(stored.status, "available");
        assert_eq!(stored.created_at, room.created_at);
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected() {
        let pool = test_pool().await;
        insert(&pool, &new_room(sample_request("101"))).await.unwrap();
        let err = insert(&pool, &new_room(sample_request("101")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("UNIQUE"));

        // the first room is unaffected
        let first = get_by_number(&pool, "101").await.unwrap().unwrap();
        assert_eq!(first.status, "available");
    }

    #[tokio::test]
    async fn update_touches_only_provided_fields() {
        let pool = test_pool().await;
        let room = new_room(sample_request("102"));
        insert(&pool, &room).await.unwrap();

        let req = UpdateRoomRequest {
            nightly_price: Some(90.0),
            ..Default::default()
        };
        assert_eq!(update(&pool, &room.id, &req).await.unwrap(), 1);

        let stored = get(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(stored.nightly_price, 90.0);
        assert_eq!(stored.room_type, "double");
        assert_eq!(stored.capacity, 2);
        assert_eq!(stored.description.as_deref(), Some("Street side"));
    }

    #[tokio::test]
    async fn status_cas_only_fires_from_expected_state() {
        let pool = test_pool().await;
        let room = new_room(sample_request("103"));
        insert(&pool, &room).await.unwrap();

        let claimed = set_status_if(&pool, &room.id, RoomStatus::Available, RoomStatus::Occupied)
            .await
            .unwrap();
        assert_eq!(claimed, 1);

        // second claim loses the race
        let claimed = set_status_if(&pool, &room.id, RoomStatus::Available, RoomStatus::Occupied)
            .await
            .unwrap();
        assert_eq!(claimed, 0);

        let stored = get(&pool, &room.id).await.unwrap().unwrap();
        assert_eq!(stored.status_enum(), RoomStatus::Occupied);
    }
}
