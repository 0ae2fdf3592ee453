//! Stay queries: reservation records plus the open-stay lookup used by
//! check-out.

use chrono::NaiveDate;
use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::{CreateStayRequest, Stay, StayStatus, UpdateStayRequest};

/// Nights between two dates, never less than one.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(1)
}

/// Build a reservation record. Nights and total are derived from the dates
/// and the nightly price snapshot.
pub fn new_stay(req: CreateStayRequest) -> Stay {
    let now = chrono::Utc::now().to_rfc3339();
    let nights = nights_between(req.check_in_date, req.check_out_date);
    let status = req
        .status
        .and_then(|s| StayStatus::parse(&s))
        .unwrap_or(StayStatus::Pending);
    Stay {
        id: Uuid::new_v4().to_string(),
        guest_id: None,
        guest_name: req.guest_name,
        guest_email: req.guest_email,
        guest_phone: req.guest_phone,
        guest_document: req.guest_document,
        room_number: req.room_number,
        room_type: req.room_type,
        check_in_date: req.check_in_date.to_string(),
        check_out_date: req.check_out_date.to_string(),
        nightly_price: req.nightly_price,
        nights,
        total: req.nightly_price * nights as f64,
        status: status.as_str().to_string(),
        departure_at: None,
        notes: req.notes,
        created_at: now.clone(),
        updated_at: now,
    }
}

pub async fn get<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<Option<Stay>> {
    sqlx::query_as::<_, Stay>("SELECT * FROM stays WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn list<'e>(
    ex: impl SqliteExecutor<'e>,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<Stay>> {
    sqlx::query_as::<_, Stay>("SELECT * FROM stays ORDER BY created_at, id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await
}

pub async fn list_by_room<'e>(
    ex: impl SqliteExecutor<'e>,
    room_number: &str,
) -> sqlx::Result<Vec<Stay>> {
    sqlx::query_as::<_, Stay>("SELECT * FROM stays WHERE room_number = ? ORDER BY created_at, id")
        .bind(room_number)
        .fetch_all(ex)
        .await
}

/// The stay for a room that has no departure timestamp yet. The room
/// lifecycle guarantees at most one of these per room.
pub async fn find_open<'e>(
    ex: impl SqliteExecutor<'e>,
    room_number: &str,
) -> sqlx::Result<Option<Stay>> {
    sqlx::query_as::<_, Stay>(
        "SELECT * FROM stays WHERE room_number = ? AND departure_at IS NULL ORDER BY created_at DESC",
    )
    .bind(room_number)
    .fetch_optional(ex)
    .await
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, stay: &Stay) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO stays (
            id, guest_id, guest_name, guest_email, guest_phone, guest_document,
            room_number, room_type, check_in_date, check_out_date,
            nightly_price, nights, total, status, departure_at, notes,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&stay.id)
    .bind(&stay.guest_id)
    .bind(&stay.guest_name)
    .bind(&stay.guest_email)
    .bind(&stay.guest_phone)
    .bind(&stay.guest_document)
    .bind(&stay.room_number)
    .bind(&stay.room_type)
    .bind(&stay.check_in_date)
    .bind(&stay.check_out_date)
    .bind(stay.nightly_price)
    .bind(stay.nights)
    .bind(stay.total)
    .bind(&stay.status)
    .bind(&stay.departure_at)
    .bind(&stay.notes)
    .bind(&stay.created_at)
    .bind(&stay.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    req: &UpdateStayRequest,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE stays SET
            guest_name = COALESCE(?, guest_name),
            guest_email = COALESCE(?, guest_email),
            guest_phone = COALESCE(?, guest_phone),
            guest_document = COALESCE(?, guest_document),
            check_in_date = COALESCE(?, check_in_date),
            check_out_date = COALESCE(?, check_out_date),
            nightly_price = COALESCE(?, nightly_price),
            nights = COALESCE(?, nights),
            total = COALESCE(?, total),
            status = COALESCE(?, status),
            notes = COALESCE(?, notes),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.guest_name)
    .bind(&req.guest_email)
    .bind(&req.guest_phone)
    .bind(&req.guest_document)
    .bind(req.check_in_date.map(|d| d.to_string()))
    .bind(req.check_out_date.map(|d| d.to_string()))
    .bind(req.nightly_price)
    .bind(req.nights)
    .bind(req.total)
    .bind(&req.status)
    .bind(&req.notes)
    .bind(&now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Stamp the departure and mark the stay checked out.
pub async fn close<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    departure_at: &str,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "UPDATE stays SET departure_at = ?, status = ?, updated_at = ? WHERE id = ?",
    )
    .bind(departure_at)
    .bind(StayStatus::CheckedOut.as_str())
    .bind(departure_at)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM stays WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nights_are_at_least_one() {
        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        assert_eq!(nights_between(d("2024-06-01"), d("2024-06-04")), 3);
        assert_eq!(nights_between(d("2024-06-01"), d("2024-06-01")), 1);
        assert_eq!(nights_between(d("2024-06-04"), d("2024-06-01")), 1);
    }

    #[test]
    fn reservation_totals_follow_nights() {
        let stay = new_stay(CreateStayRequest {
            guest_name: "Ana Torres".to_string(),
            guest_email: None,
            guest_phone: None,
            guest_document: None,
            room_number: "201".to_string(),
            room_type: "suite".to_string(),
            check_in_date: "2024-06-01".parse().unwrap(),
            check_out_date: "2024-06-05".parse().unwrap(),
            nightly_price: 120.0,
            status: None,
            notes: None,
        });
        assert_eq!(stay.nights, 4);
        assert_eq!(stay.total, 480.0);
        assert_eq!(stay.status, "pending");
        assert!(stay.departure_at.is_none());
    }
}
