use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::{CreateProductRequest, Product, UpdateProductRequest};

pub fn new_product(req: CreateProductRequest) -> Product {
    let now = chrono::Utc::now().to_rfc3339();
    Product {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        description: req.description,
        category: req.category,
        price: req.price,
        stock: req.stock,
        active: req.active,
        barcode: req.barcode,
        supplier: req.supplier,
        notes: req.notes,
        created_at: now.clone(),
        updated_at: now,
    }
}

pub async fn get<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn list<'e>(
    ex: impl SqliteExecutor<'e>,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at, id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, product: &Product) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO products (
            id, name, description, category, price, stock, active,
            barcode, supplier, notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.price)
    .bind(product.stock)
    .bind(product.active)
    .bind(&product.barcode)
    .bind(&product.supplier)
    .bind(&product.notes)
    .bind(&product.created_at)
    .bind(&product.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    req: &UpdateProductRequest,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE products SET
            name = COALESCE(?, name),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            price = COALESCE(?, price),
            stock = COALESCE(?, stock),
            active = COALESCE(?, active),
            barcode = COALESCE(?, barcode),
            supplier = COALESCE(?, supplier),
            notes = COALESCE(?, notes),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.category)
    .bind(req.price)
    .bind(req.stock)
    .bind(req.active)
    .bind(&req.barcode)
    .bind(&req.supplier)
    .bind(&req.notes)
    .bind(&now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
