//! Reader identity rows

use fablier_common::db::models::User;
use fablier_common::Result;
use sqlx::SqlitePool;

/// Create a reader and return the stored row
pub async fn create_user(pool: &SqlitePool, name: &str) -> Result<User> {
    let id: i64 = sqlx::query_scalar("INSERT INTO users (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    get_user(pool, id)
        .await?
        .ok_or_else(|| fablier_common::Error::Internal("user row vanished after insert".into()))
}

/// Load a reader by id
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}
