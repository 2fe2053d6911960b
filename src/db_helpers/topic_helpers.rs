use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::CreateTopicRequest,
    errors::{is_unique_violation, ApiError},
    models::Topic,
};

pub async fn fetch_topics(pool: &SqlitePool) -> Result<Vec<Topic>, ApiError> {
    let topics = sqlx::query_as::<Sqlite, Topic>("SELECT slug, description FROM topics")
        .fetch_all(pool)
        .await?;
    Ok(topics)
}

pub async fn insert_topic(
    pool: &SqlitePool,
    CreateTopicRequest { slug, description }: CreateTopicRequest,
) -> Result<Topic, ApiError> {
    let result = sqlx::query_as::<Sqlite, Topic>(
        r#"
        INSERT INTO topics (slug, description)
        VALUES ($1, $2)
        RETURNING slug, description
        "#,
    )
    .bind(slug.clone())
    .bind(description)
    .fetch_one(pool)
    .await;

    match result {
        Ok(topic) => Ok(topic),
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::TopicAlreadyExists(slug.unwrap_or_default()))
        }
        Err(e) => Err(e.into()),
    }
}
