use sqlx::SqlitePool;

use crate::errors::ApiError;

mod article_helpers;
mod comment_helpers;
mod topic_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use comment_helpers::*;
pub use topic_helpers::*;
pub use user_helpers::*;

// ----------------- Helper Functions -----------------

/// Parses a path identifier. Anything that is not a plain integer is a
/// datatype error, reported before the store is queried.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::InvalidIdFormat)
}

async fn article_exists(pool: &SqlitePool, article_id: i64) -> Result<bool, ApiError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT article_id FROM articles WHERE article_id = $1")
        .bind(article_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

async fn comment_exists(pool: &SqlitePool, comment_id: i64) -> Result<bool, ApiError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT comment_id FROM comments WHERE comment_id = $1")
        .bind(comment_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

async fn topic_exists(pool: &SqlitePool, slug: &str) -> Result<bool, ApiError> {
    let found = sqlx::query_scalar::<_, String>("SELECT slug FROM topics WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}
