use sqlx::SqliteExecutor;
use uuid::Uuid;

use super::{Guest, GuestInfo};

pub fn new_guest(info: &GuestInfo) -> Guest {
    Guest {
        id: Uuid::new_v4().to_string(),
        full_name: info.full_name.clone(),
        email: info.email.clone(),
        phone: info.phone.clone(),
        document_id: info.document_id.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, guest: &Guest) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO guests (id, full_name, email, phone, document_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guest.id)
    .bind(&guest.full_name)
    .bind(&guest.email)
    .bind(&guest.phone)
    .bind(&guest.document_id)
    .bind(&guest.created_at)
    .execute(ex)
    .await?;
    Ok(())
}
