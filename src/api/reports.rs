//! Reporting endpoints.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{self, DashboardReport};
use crate::AppState;

use super::error::ApiError;

/// Dashboard numbers: room counts by status, occupancy, open stays, and
/// today's consumption revenue.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardReport>, ApiError> {
    let report = db::reports::dashboard(&state.db).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{CheckInRequest, CreateRoomRequest, GuestInfo};
    use crate::frontdesk;
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

    async fn seed_room(state: &AppState, number: &str) -> String {
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
        db::rooms::insert(&state.db, &room).await.unwrap();
        room.id
    }

    #[tokio::test]
    async fn empty_hotel_reports_zeroes() {
        let state = test_state().await;
        let Json(report) = dashboard(State(state)).await.unwrap();
        assert_eq!(report.total_rooms, 0);
        assert_eq!(report.occupancy_percent, 0.0);
        assert_eq!(report.revenue_today, 0.0);
    }

    #[tokio::test]
    async fn revenue_today_sums_order_lines() {
        let state = test_state().await;
        seed_room(&state, "101").await;

        let cola = db::products::new_product(db::CreateProductRequest {
            name: "Cola".to_string(),
            description: None,
            category: "drinks".to_string(),
            price: 2.5,
            stock: None,
            active: true,
            barcode: None,
            supplier: None,
            notes: None,
        });
        db::products::insert(&state.db, &cola).await.unwrap();

        let order = db::orders::new_order(db::CreateOrderRequest {
            stay_id: None,
            room_number: "101".to_string(),
            notes: None,
        });
        db::orders::insert(&state.db, &order).await.unwrap();
        db::orders::insert_line(&state.db, &db::orders::new_line(&order.id, &cola, 3, None))
            .await
            .unwrap();
        db::orders::recompute_totals(&state.db, &order.id).await.unwrap();

        let Json(report) = dashboard(State(state)).await.unwrap();
        assert_eq!(report.revenue_today, 7.5);
    }

    #[tokio::test]
    async fn unknown_status_rows_do_not_count_as_available() {
        let state = test_state().await;
        seed_room(&state, "101").await;
        let odd = seed_room(&state, "102").await;

        // a row with a status outside the known lifecycle
        sqlx::query("UPDATE rooms SET status = 'fumigation' WHERE id = ?")
            .bind(&odd)
            .execute(&state.db)
            .await
            .unwrap();

        let Json(report) = dashboard(State(state)).await.unwrap();
        assert_eq!(report.total_rooms, 2);
        assert_eq!(report.available_rooms, 1);
        assert_eq!(report.occupied_rooms, 0);
    }

    #[tokio::test]
    async fn occupancy_tracks_check_ins() {
        let state = test_state().await;
        let occupied = seed_room(&state, "101").await;
        seed_room(&state, "102").await;

        frontdesk::check_in(
            &state.db,
            &occupied,
            CheckInRequest {
                guest: GuestInfo {
                    full_name: "Ana Torres".to_string(),
                    email: None,
                    phone: None,
                    document_id: None,
                },
                check_out_date: None,
                notes: None,
            },
        )
        .await
        .unwrap();

        let Json(report) = dashboard(State(state)).await.unwrap();
        assert_eq!(report.total_rooms, 2);
        assert_eq!(report.occupied_rooms, 1);
        assert_eq!(report.available_rooms, 1);
        assert_eq!(report.open_stays, 1);
        assert_eq!(report.occupancy_percent, 50.0);
    }
}
