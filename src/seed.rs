//! Fixture loading.
//!
//! [`seed`] wipes every table and inserts a [`SeedData`] set in dependency
//! order, all inside one transaction. The bundled test fixture under
//! `data/test-data/` is compiled into the binary.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::format_timestamp;

const TEST_TOPICS: &str = include_str!("../data/test-data/topics.json");
const TEST_USERS: &str = include_str!("../data/test-data/users.json");
const TEST_ARTICLES: &str = include_str!("../data/test-data/articles.json");
const TEST_COMMENTS: &str = include_str!("../data/test-data/comments.json");

#[derive(Debug, Clone, Deserialize)]
pub struct TopicSeed {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSeed {
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub votes: i64,
}

/// Comments point at articles by their position in the article list,
/// starting from 1.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentSeed {
    pub article_id: i64,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub votes: i64,
}

#[derive(Debug, Clone)]
pub struct SeedData {
    pub topics: Vec<TopicSeed>,
    pub users: Vec<UserSeed>,
    pub articles: Vec<ArticleSeed>,
    pub comments: Vec<CommentSeed>,
}

impl SeedData {
    pub fn test_data() -> Result<Self> {
        Ok(Self {
            topics: serde_json::from_str(TEST_TOPICS).context("Invalid topic fixture")?,
            users: serde_json::from_str(TEST_USERS).context("Invalid user fixture")?,
            articles: serde_json::from_str(TEST_ARTICLES).context("Invalid article fixture")?,
            comments: serde_json::from_str(TEST_COMMENTS).context("Invalid comment fixture")?,
        })
    }
}

pub async fn seed(pool: &SqlitePool, data: &SeedData) -> Result<()> {
    let mut tx = pool.begin().await?;

    for table in ["comments", "articles", "users", "topics"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut tx)
            .await
            .with_context(|| format!("Failed to clear {table}"))?;
    }

    for topic in &data.topics {
        sqlx::query("INSERT INTO topics (slug, description) VALUES ($1, $2)")
            .bind(&topic.slug)
            .bind(&topic.description)
            .execute(&mut tx)
            .await
            .with_context(|| format!("Failed to insert topic {}", topic.slug))?;
    }

    for user in &data.users {
        sqlx::query("INSERT INTO users (username, name, avatar_url) VALUES ($1, $2, $3)")
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.avatar_url)
            .execute(&mut tx)
            .await
            .with_context(|| format!("Failed to insert user {}", user.username))?;
    }

    for (article_id, article) in (1_i64..).zip(&data.articles) {
        sqlx::query(
            r#"
            INSERT INTO articles (article_id, title, topic, author, body, created_at, votes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(article_id)
        .bind(&article.title)
        .bind(&article.topic)
        .bind(&article.author)
        .bind(&article.body)
        .bind(format_timestamp(&article.created_at))
        .bind(article.votes)
        .execute(&mut tx)
        .await
        .with_context(|| format!("Failed to insert article {}", article.title))?;
    }

    for (comment_id, comment) in (1_i64..).zip(&data.comments) {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, body, article_id, author, votes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment_id)
        .bind(&comment.body)
        .bind(comment.article_id)
        .bind(&comment.author)
        .bind(comment.votes)
        .bind(format_timestamp(&comment.created_at))
        .execute(&mut tx)
        .await
        .with_context(|| format!("Failed to insert comment {comment_id}"))?;
    }

    tx.commit().await?;
    tracing::info!(
        topics = data.topics.len(),
        users = data.users.len(),
        articles = data.articles.len(),
        comments = data.comments.len(),
        "Database seeded"
    );
    Ok(())
}
