use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::{CreateRateRequest, Rate, UpdateRateRequest};

pub fn new_rate(req: CreateRateRequest) -> Rate {
    let now = chrono::Utc::now().to_rfc3339();
    Rate {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        room_type: req.room_type,
        price: req.price,
        valid_from: req.valid_from.map(|d| d.to_string()),
        valid_to: req.valid_to.map(|d| d.to_string()),
        weekdays: req.weekdays,
        active: req.active,
        priority: req.priority,
        description: req.description,
        created_at: now.clone(),
        updated_at: now,
    }
}

pub async fn get<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<Option<Rate>> {
    sqlx::query_as::<_, Rate>("SELECT * FROM rates WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn list<'e>(
    ex: impl SqliteExecutor<'e>,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<Rate>> {
    sqlx::query_as::<_, Rate>("SELECT * FROM rates ORDER BY created_at, id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, rate: &Rate) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO rates (
            id, name, room_type, price, valid_from, valid_to, weekdays,
            active, priority, description, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&rate.id)
    .bind(&rate.name)
    .bind(&rate.room_type)
    .bind(rate.price)
    .bind(&rate.valid_from)
    .bind(&rate.valid_to)
    .bind(&rate.weekdays)
    .bind(rate.active)
    .bind(rate.priority)
    .bind(&rate.description)
    .bind(&rate.created_at)
    .bind(&rate.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    req: &UpdateRateRequest,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE rates SET
            name = COALESCE(?, name),
            room_type = COALESCE(?, room_type),
            price = COALESCE(?, price),
            valid_from = COALESCE(?, valid_from),
            valid_to = COALESCE(?, valid_to),
            weekdays = COALESCE(?, weekdays),
            active = COALESCE(?, active),
            priority = COALESCE(?, priority),
            description = COALESCE(?, description),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.room_type)
    .bind(req.price)
    .bind(req.valid_from.map(|d| d.to_string()))
    .bind(req.valid_to.map(|d| d.to_string()))
    .bind(&req.weekdays)
    .bind(req.active)
    .bind(req.priority)
    .bind(&req.description)
    .bind(&now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM rates WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
