//! Read-only aggregates for the dashboard endpoint.

use super::{DashboardReport, DbPool, RoomStatus};

async fn count_rooms(pool: &DbPool, status: RoomStatus) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE status = ?")
        .bind(status.as_str())
        .fetch_one(pool)
        .await
}

pub async fn dashboard(pool: &DbPool) -> sqlx::Result<DashboardReport> {
    let total_rooms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
        .fetch_one(pool)
        .await?;
    let available_rooms = count_rooms(pool, RoomStatus::Available).await?;
    let occupied_rooms = count_rooms(pool, RoomStatus::Occupied).await?;
    let cleaning_rooms = count_rooms(pool, RoomStatus::Cleaning).await?;
    let maintenance_rooms = count_rooms(pool, RoomStatus::Maintenance).await?;

    let open_stays: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM stays WHERE departure_at IS NULL AND status = ?")
            .bind("checked_in")
            .fetch_one(pool)
            .await?;

    let active_products: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE active = 1")
            .fetch_one(pool)
            .await?;

    // the fallback must be REAL, an integer 0 does not decode into f64
    let revenue_today: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(line_subtotal), 0.0) FROM order_lines WHERE date(created_at) = date('now')",
    )
    .fetch_one(pool)
    .await?;

    let occupancy_percent = if total_rooms > 0 {
        (occupied_rooms as f64 / total_rooms as f64 * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    };

    Ok(DashboardReport {
        total_rooms,
        occupied_rooms,
        cleaning_rooms,
        maintenance_rooms,
        available_rooms,
        occupancy_percent,
        open_stays,
        active_products,
        revenue_today,
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}
