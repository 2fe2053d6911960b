use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::{CommentRequest, PageQueryParams},
    errors::ApiError,
    models::Comment,
    query::Pagination,
};

use super::{article_exists, comment_exists, parse_id};

const COMMENT_COLUMNS: &str = "comment_id, article_id, author, body, votes, created_at";

pub async fn fetch_comments_by_article(
    pool: &SqlitePool,
    id: &str,
    PageQueryParams { limit, page }: PageQueryParams,
) -> Result<Vec<Comment>, ApiError> {
    let article_id = parse_id(id)?;
    if !article_exists(pool, article_id).await? {
        return Err(ApiError::ArticleNotFound);
    }
    let pagination = Pagination::parse(limit.as_deref(), page.as_deref())?;

    let query = format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE article_id = $1
        ORDER BY created_at DESC, comment_id DESC
        LIMIT $2 OFFSET $3
        "#
    );
    let comments = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(article_id)
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;
    Ok(comments)
}

/// Missing keys and unknown authors surface as storage constraint failures
/// and are translated by [`ApiError`]'s `From<sqlx::Error>`.
pub async fn insert_comment(
    pool: &SqlitePool,
    id: &str,
    CommentRequest { username, body }: CommentRequest,
) -> Result<Comment, ApiError> {
    let article_id = parse_id(id)?;
    if !article_exists(pool, article_id).await? {
        return Err(ApiError::ArticleNotFound);
    }

    let query = format!(
        r#"
        INSERT INTO comments (body, article_id, author)
        VALUES ($1, $2, $3)
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let comment = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(body)
        .bind(article_id)
        .bind(username)
        .fetch_one(pool)
        .await?;

    tracing::info!(comment_id = comment.comment_id, article_id, "Comment posted");
    Ok(comment)
}

pub async fn delete_comment_by_id(pool: &SqlitePool, id: &str) -> Result<(), ApiError> {
    let comment_id = parse_id(id)?;
    let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::CommentNotFound);
    }
    Ok(())
}

/// Only writes while `votes + delta` stays an integer; SQLite would otherwise
/// store the sum as a REAL.
pub async fn increment_comment_votes(
    pool: &SqlitePool,
    id: &str,
    delta: i64,
) -> Result<Comment, ApiError> {
    let comment_id = parse_id(id)?;
    let query = format!(
        r#"
        UPDATE comments
        SET votes = votes + $1
        WHERE comment_id = $2
          AND typeof(votes + $1) = 'integer'
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let updated = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(delta)
        .bind(comment_id)
        .fetch_optional(pool)
        .await?;

    match updated {
        Some(comment) => Ok(comment),
        None if comment_exists(pool, comment_id).await? => Err(ApiError::VoteOutOfRange),
        None => Err(ApiError::CommentNotFound),
    }
}
