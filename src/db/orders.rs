//! Order (room tab) queries. Line items snapshot product name and price so
//! later catalog edits do not rewrite history.

use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::{CreateOrderRequest, Order, OrderLine, OrderStatus, Product};

pub fn new_order(req: CreateOrderRequest) -> Order {
    let now = chrono::Utc::now().to_rfc3339();
    Order {
        id: Uuid::new_v4().to_string(),
        stay_id: req.stay_id,
        room_number: req.room_number,
        status: OrderStatus::Open.as_str().to_string(),
        subtotal: 0.0,
        tax: 0.0,
        total: 0.0,
        payment_method: None,
        notes: req.notes,
        created_at: now.clone(),
        updated_at: now,
    }
}

pub fn new_line(order_id: &str, product: &Product, quantity: i64, notes: Option<String>) -> OrderLine {
    OrderLine {
        id: Uuid::new_v4().to_string(),
        order_id: order_id.to_string(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        unit_price: product.price,
        quantity,
        line_subtotal: product.price * quantity as f64,
        notes,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

pub async fn get<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<Option<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn list<'e>(
    ex: impl SqliteExecutor<'e>,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at, id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await
}

pub async fn list_by_room<'e>(
    ex: impl SqliteExecutor<'e>,
    room_number: &str,
) -> sqlx::Result<Vec<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE room_number = ? ORDER BY created_at, id")
        .bind(room_number)
        .fetch_all(ex)
        .await
}

pub async fn lines<'e>(ex: impl SqliteExecutor<'e>, order_id: &str) -> sqlx::Result<Vec<OrderLine>> {
    sqlx::query_as::<_, OrderLine>(
        "SELECT * FROM order_lines WHERE order_id = ? ORDER BY created_at, id",
    )
    .bind(order_id)
    .fetch_all(ex)
    .await
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, order: &Order) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, stay_id, room_number, status, subtotal, tax, total,
            payment_method, notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&order.id)
    .bind(&order.stay_id)
    .bind(&order.room_number)
    .bind(&order.status)
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.total)
    .bind(&order.payment_method)
    .bind(&order.notes)
    .bind(&order.created_at)
    .bind(&order.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn insert_line<'e>(ex: impl SqliteExecutor<'e>, line: &OrderLine) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO order_lines (
            id, order_id, product_id, product_name, unit_price, quantity,
            line_subtotal, notes, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&line.id)
    .bind(&line.order_id)
    .bind(&line.product_id)
    .bind(&line.product_name)
    .bind(line.unit_price)
    .bind(line.quantity)
    .bind(line.line_subtotal)
    .bind(&line.notes)
    .bind(&line.created_at)
    .execute(ex)
    .await?;
    Ok(())
}

/// Re-derive subtotal and total from the stored lines.
pub async fn recompute_totals<'e>(ex: impl SqliteExecutor<'e>, order_id: &str) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE orders SET
            subtotal = (SELECT COALESCE(SUM(line_subtotal), 0) FROM order_lines WHERE order_id = orders.id),
            total = (SELECT COALESCE(SUM(line_subtotal), 0) FROM order_lines WHERE order_id = orders.id) + tax,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&now)
    .bind(order_id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn close<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    payment_method: Option<&str>,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        "UPDATE orders SET status = ?, payment_method = COALESCE(?, payment_method), updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(OrderStatus::Closed.as_str())
    .bind(payment_method)
    .bind(&now)
    .bind(id)
    .bind(OrderStatus::Open.as_str())
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}
