//! Order (room tab) endpoints. Adding a line and recomputing the totals run
//! in one transaction so the tab never shows a line without its money.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::{
    self, AddOrderLineRequest, CloseOrderRequest, CreateOrderRequest, Order, OrderStatus,
    OrderWithLines,
};
use crate::AppState;

use super::error::ApiError;
use super::Pagination;

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub room_number: Option<String>,
    #[serde(default)]
    pub offset: i64,
    pub limit: Option<i64>,
}

async fn load_with_lines(state: &AppState, id: &str) -> Result<OrderWithLines, ApiError> {
    let order = db::orders::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    let lines = db::orders::lines(&state.db, id).await?;
    Ok(OrderWithLines { order, lines })
}

/// List orders, optionally filtered by room number
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = match filter.room_number {
        Some(ref number) => db::orders::list_by_room(&state.db, number).await?,
        None => {
            let page = Pagination {
                offset: filter.offset,
                limit: filter.limit,
            };
            let (offset, limit) = page.clamp();
            db::orders::list(&state.db, offset, limit).await?
        }
    };
    Ok(Json(orders))
}

/// Get an order with its lines
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderWithLines>, ApiError> {
    Ok(Json(load_with_lines(&state, &id).await?))
}

/// Open a tab for a room
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let room = db::rooms::get_by_number(&state.db, &req.room_number).await?;
    if room.is_none() {
        return Err(ApiError::validation_field(
            "room_number",
            format!("Room {} does not exist", req.room_number),
        ));
    }
    if let Some(ref stay_id) = req.stay_id {
        if db::stays::get(&state.db, stay_id).await?.is_none() {
            return Err(ApiError::validation_field("stay_id", "Stay does not exist"));
        }
    }

    let order = db::orders::new_order(req);
    db::orders::insert(&state.db, &order).await?;

    tracing::info!(room = %order.room_number, "Order opened");
    Ok((StatusCode::CREATED, Json(order)))
}

/// Add a line to an open order. The product name and price are snapshotted
/// into the line, and the order totals are recomputed, in one transaction.
pub async fn add_order_line(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddOrderLineRequest>,
) -> Result<(StatusCode, Json<OrderWithLines>), ApiError> {
    if req.quantity < 1 {
        return Err(ApiError::validation_field(
            "quantity",
            "Quantity must be at least 1",
        ));
    }

    let order = db::orders::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    if order.status_enum() != OrderStatus::Open {
        return Err(ApiError::conflict("Order is closed"));
    }

    let product = db::products::get(&state.db, &req.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    if !product.active {
        return Err(ApiError::bad_request(format!(
            "Product {} is not for sale",
            product.name
        )));
    }

    let line = db::orders::new_line(&order.id, &product, req.quantity, req.notes);

    let mut tx = state.db.begin().await?;
    db::orders::insert_line(&mut *tx, &line).await?;
    db::orders::recompute_totals(&mut *tx, &order.id).await?;
    tx.commit().await?;

    tracing::info!(
        room = %order.room_number,
        product = %line.product_name,
        quantity = line.quantity,
        "Order line added"
    );
    Ok((StatusCode::CREATED, Json(load_with_lines(&state, &id).await?)))
}

/// Close the tab. Closing is single-shot; a second attempt conflicts.
pub async fn close_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CloseOrderRequest>,
) -> Result<Json<OrderWithLines>, ApiError> {
    let closed = db::orders::close(&state.db, &id, req.payment_method.as_deref()).await?;
    if closed == 0 {
        // distinguish missing from already-closed
        let order = db::orders::get(&state.db, &id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order not found"))?;
        return Err(ApiError::conflict(format!(
            "Order is already {}",
            order.status
        )));
    }

    tracing::info!(order_id = %id, "Order closed");
    Ok(Json(load_with_lines(&state, &id).await?))
}
