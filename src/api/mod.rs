pub mod auth;
mod error;
mod orders;
mod products;
mod rates;
mod reports;
mod rooms;
mod stays;
mod users;
mod validation;

pub use error::{ApiError, ErrorCode, ErrorResponse};

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Common offset/limit query parameters for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: i64,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Clamp to sane bounds: non-negative offset, 1..=200 rows per page.
    pub fn clamp(&self) -> (i64, i64) {
        let offset = self.offset.max(0);
        let limit = self.limit.unwrap_or(50).clamp(1, 200);
        (offset, limit)
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (login is public, /me requires a token)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    // Protected API routes
    let api_routes = Router::new()
        // Rooms and the front-desk lifecycle
        .route("/rooms", get(rooms::list_rooms))
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/number/:number", get(rooms::get_room_by_number))
        .route("/rooms/:id", get(rooms::get_room))
        .route("/rooms/:id", put(rooms::update_room))
        .route("/rooms/:id", delete(rooms::delete_room))
        .route("/rooms/:id/status", put(rooms::update_room_status))
        .route("/rooms/:id/check-in", post(rooms::check_in))
        .route("/rooms/:id/check-out", post(rooms::check_out))
        // Stays
        .route("/stays", get(stays::list_stays))
        .route("/stays", post(stays::create_stay))
        .route("/stays/:id", get(stays::get_stay))
        .route("/stays/:id", put(stays::update_stay))
        .route("/stays/:id", delete(stays::delete_stay))
        // Product catalog
        .route("/products", get(products::list_products))
        .route("/products", post(products::create_product))
        .route("/products/:id", get(products::get_product))
        .route("/products/:id", put(products::update_product))
        .route("/products/:id", delete(products::delete_product))
        // Seasonal rates
        .route("/rates", get(rates::list_rates))
        .route("/rates", post(rates::create_rate))
        .route("/rates/:id", get(rates::get_rate))
        .route("/rates/:id", put(rates::update_rate))
        .route("/rates/:id", delete(rates::delete_rate))
        // Orders (room tabs)
        .route("/orders", get(orders::list_orders))
        .route("/orders", post(orders::create_order))
        .route("/orders/:id", get(orders::get_order))
        .route("/orders/:id/lines", post(orders::add_order_line))
        .route("/orders/:id/close", post(orders::close_order))
        // Staff users
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id", put(users::update_user))
        .route("/users/:id", delete(users::delete_user))
        // Reports
        .route("/reports/dashboard", get(reports::dashboard))
        // Protected by auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1", api_routes)
        .layer(cors_layer(&state.config.cors.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
