//! Product catalog endpoints (minibar items, restaurant dishes, services).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{self, CreateProductRequest, Product, UpdateProductRequest};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_name, validate_price};
use super::Pagination;

fn validate_create_request(req: &CreateProductRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.name, "name") {
        errors.add("name", e);
    }
    if let Err(e) = validate_name(&req.category, "category") {
        errors.add("category", e);
    }
    if let Err(e) = validate_price(req.price, "price") {
        errors.add("price", e);
    }
    if let Some(stock) = req.stock {
        if stock < 0 {
            errors.add("stock", "Stock cannot be negative");
        }
    }

    errors.finish()
}

fn validate_update_request(req: &UpdateProductRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref name) = req.name {
        if let Err(e) = validate_name(name, "name") {
            errors.add("name", e);
        }
    }
    if let Some(ref category) = req.category {
        if let Err(e) = validate_name(category, "category") {
            errors.add("category", e);
        }
    }
    if let Some(price) = req.price {
        if let Err(e) = validate_price(price, "price") {
            errors.add("price", e);
        }
    }
    if let Some(stock) = req.stock {
        if stock < 0 {
            errors.add("stock", "Stock cannot be negative");
        }
    }

    errors.finish()
}

/// List products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let (offset, limit) = page.clamp();
    let products = db::products::list(&state.db, offset, limit).await?;
    Ok(Json(products))
}

/// Get a product by id
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = db::products::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// Create a product
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_create_request(&req)?;

    let product = db::products::new_product(req);
    db::products::insert(&state.db, &product).await?;

    tracing::info!(name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partial update of a product
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validate_update_request(&req)?;

    let updated = db::products::update(&state.db, &id, &req).await?;
    if updated == 0 {
        return Err(ApiError::not_found("Product not found"));
    }

    let product = db::products::get(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// Delete a product. Existing order lines keep their snapshot of it.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = db::products::delete(&state.db, &id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Product not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
