//! Staff user queries. Deletion is a soft delete: the row stays, is_active
//! flips to false.

use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::{CreateUserRequest, UpdateUserRequest, User};

pub fn new_user(req: CreateUserRequest, password_hash: String) -> User {
    let now = chrono::Utc::now().to_rfc3339();
    User {
        id: Uuid::new_v4().to_string(),
        full_name: req.full_name,
        email: req.email,
        phone: req.phone,
        password_hash,
        is_active: true,
        is_superuser: req.is_superuser,
        position: req.position,
        department: req.department,
        created_at: now.clone(),
        updated_at: now,
    }
}

pub async fn get<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn get_by_email<'e>(
    ex: impl SqliteExecutor<'e>,
    email: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(ex)
        .await
}

pub async fn list<'e>(
    ex: impl SqliteExecutor<'e>,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, user: &User) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (
            id, full_name, email, phone, password_hash, is_active,
            is_superuser, position, department, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.full_name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(&user.password_hash)
    .bind(user.is_active)
    .bind(user.is_superuser)
    .bind(&user.position)
    .bind(&user.department)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

/// Partial update. `password_hash` is passed separately because the request
/// carries a plaintext password that the caller hashes first.
pub async fn update<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &str,
    req: &UpdateUserRequest,
    password_hash: Option<String>,
) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE users SET
            full_name = COALESCE(?, full_name),
            email = COALESCE(?, email),
            phone = COALESCE(?, phone),
            password_hash = COALESCE(?, password_hash),
            is_active = COALESCE(?, is_active),
            is_superuser = COALESCE(?, is_superuser),
            position = COALESCE(?, position),
            department = COALESCE(?, department),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.full_name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(password_hash)
    .bind(req.is_active)
    .bind(req.is_superuser)
    .bind(&req.position)
    .bind(&req.department)
    .bind(&now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn deactivate<'e>(ex: impl SqliteExecutor<'e>, id: &str) -> sqlx::Result<u64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query("UPDATE users SET is_active = 0, updated_at = ? WHERE id = ?")
        .bind(&now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> db::DbPool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    fn sample_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            full_name: "Reception Staff".to_string(),
            email: email.to_string(),
            password: "plain".to_string(),
            phone: None,
            is_superuser: false,
            position: Some("receptionist".to_string()),
            department: None,
        }
    }

    #[tokio::test]
    async fn delete_is_soft() {
        let pool = test_pool().await;
        let user = new_user(sample_request("desk@hotel.test"), "hash".to_string());
        insert(&pool, &user).await.unwrap();

        assert_eq!(deactivate(&pool, &user.id).await.unwrap(), 1);

        // row survives, flag flips
        let stored = get(&pool, &user.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert_eq!(stored.email, "desk@hotel.test");
    }

    #[tokio::test]
    async fn update_without_password_keeps_hash() {
        let pool = test_pool().await;
        let user = new_user(sample_request("night@hotel.test"), "original-hash".to_string());
        insert(&pool, &user).await.unwrap();

        let req = UpdateUserRequest {
            full_name: Some("Night Shift".to_string()),
            ..Default::default()
        };
        update(&pool, &user.id, &req, None).await.unwrap();

        let stored = get(&pool, &user.id).await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Night Shift");
        assert_eq!(stored.password_hash, "original-hash");
    }
}
