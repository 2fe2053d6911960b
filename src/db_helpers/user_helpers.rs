use sqlx::{Sqlite, SqlitePool};

use crate::{errors::ApiError, models::User};

pub async fn fetch_users(pool: &SqlitePool) -> Result<Vec<User>, ApiError> {
    let users = sqlx::query_as::<Sqlite, User>("SELECT username, name, avatar_url FROM users")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn fetch_user_by_name(pool: &SqlitePool, username: &str) -> Result<User, ApiError> {
    sqlx::query_as::<Sqlite, User>(
        r#"
        SELECT username, name, avatar_url FROM users WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::UserNotFound)
}
