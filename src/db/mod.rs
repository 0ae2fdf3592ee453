mod models;

pub mod guests;
pub mod orders;
pub mod products;
pub mod rates;
pub mod reports;
pub mod rooms;
pub mod stays;
pub mod users;

pub use models::*;

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::config::Config;

pub type DbPool = SqlitePool;

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(config: &Config) -> Result<DbPool> {
    let db_url = match &config.database.url {
        Some(url) => url.clone(),
        None => {
            crate::utils::ensure_dir(&config.server.data_dir)?;
            let db_path = config.server.data_dir.join("innkeep.db");
            format!("sqlite:{}?mode=rwc", db_path.display())
        }
    };

    info!("Initializing database at {}", db_url);
    connect(&db_url).await
}

pub async fn connect(db_url: &str) -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    // Migration 001: hotel schema (rooms, guests, stays, products, rates, orders)
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;

    // Migration 002: staff users
    execute_sql(pool, include_str!("../../migrations/002_users.sql")).await?;

    info!("Migrations completed");
    Ok(())
}
