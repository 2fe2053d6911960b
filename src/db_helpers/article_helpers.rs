use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::CreateArticleRequest;
use crate::errors::ApiError;
use crate::models::{Article, ArticleSummary};
use crate::query::ArticleQueryPlan;

use super::{article_exists, parse_id, topic_exists};

const ARTICLE_LIST_QUERY: &str = r#"
            SELECT article_id,
                   title,
                   topic,
                   author,
                   created_at,
                   votes,
                   (SELECT COUNT(*)
                    FROM   comments
                    WHERE  comments.article_id = articles.article_id) AS comment_count
            FROM   articles
            WHERE  ( topic = $1
                     OR $1 IS NULL )
"#;

const ARTICLE_COUNT_QUERY: &str = r#"
            SELECT COUNT(*)
            FROM   articles
            WHERE  ( topic = $1
                     OR $1 IS NULL )
"#;

const SINGLE_ARTICLE_QUERY: &str = r#"
            SELECT article_id,
                   title,
                   topic,
                   author,
                   body,
                   created_at,
                   votes,
                   (SELECT COUNT(*)
                    FROM   comments
                    WHERE  comments.article_id = articles.article_id) AS comment_count
            FROM   articles
            WHERE  article_id = $1
"#;

pub async fn fetch_articles(
    pool: &SqlitePool,
    plan: &ArticleQueryPlan,
) -> Result<Vec<ArticleSummary>, ApiError> {
    let query = format!(
        "{ARTICLE_LIST_QUERY} {} LIMIT $2 OFFSET $3",
        plan.order_by_clause()
    );
    tracing::debug!(
        topic = ?plan.topic,
        sort_by = %plan.sort_by,
        limit = plan.limit(),
        offset = plan.offset(),
        "Listing articles"
    );
    let articles = sqlx::query_as::<Sqlite, ArticleSummary>(&query)
        .bind(plan.topic.as_deref())
        .bind(plan.limit())
        .bind(plan.offset())
        .fetch_all(pool)
        .await?;
    Ok(articles)
}

/// Number of articles matching the topic filter, ignoring pagination.
pub async fn count_articles(pool: &SqlitePool, topic: Option<&str>) -> Result<i64, ApiError> {
    let count = sqlx::query_scalar::<Sqlite, i64>(ARTICLE_COUNT_QUERY)
        .bind(topic)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn fetch_article_by_id(pool: &SqlitePool, id: &str) -> Result<Article, ApiError> {
    let article_id = parse_id(id)?;
    sqlx::query_as::<Sqlite, Article>(SINGLE_ARTICLE_QUERY)
        .bind(article_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::ArticleNotFound)
}

/// Applies `votes = votes + delta` in a single statement so concurrent
/// increments never overwrite each other. SQLite turns an overflowing integer
/// sum into a REAL, so the update only matches while the sum stays an integer.
pub async fn increment_article_votes(
    pool: &SqlitePool,
    id: &str,
    delta: i64,
) -> Result<Article, ApiError> {
    let article = fetch_article_by_id(pool, id).await?;

    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        r#"
        UPDATE articles
        SET votes = votes + $1
        WHERE article_id = $2
          AND typeof(votes + $1) = 'integer'
        "#,
    )
    .bind(delta)
    .bind(article.article_id)
    .execute(&mut tx)
    .await?;
    if result.rows_affected() == 0 {
        tx.rollback().await?;
        // Either the row was deleted since the existence check or the sum
        // left the integer range.
        return Err(if article_exists(pool, article.article_id).await? {
            ApiError::VoteOutOfRange
        } else {
            ApiError::ArticleNotFound
        });
    }
    let updated = sqlx::query_as::<Sqlite, Article>(SINGLE_ARTICLE_QUERY)
        .bind(article.article_id)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn insert_article(
    pool: &SqlitePool,
    CreateArticleRequest {
        title,
        topic,
        author,
        body,
    }: CreateArticleRequest,
) -> Result<Article, ApiError> {
    // Foreign key failures cannot tell topic from author apart, so the topic
    // is checked up front.
    if let Some(topic) = &topic {
        if !topic_exists(pool, topic).await? {
            return Err(ApiError::UnknownTopic);
        }
    }

    let mut tx = pool.begin().await?;
    let article_id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO articles (title, topic, author, body)
        VALUES ($1, $2, $3, $4)
        RETURNING article_id
        "#,
    )
    .bind(title)
    .bind(topic)
    .bind(author)
    .bind(body)
    .fetch_one(&mut tx)
    .await?;

    let article = sqlx::query_as::<Sqlite, Article>(SINGLE_ARTICLE_QUERY)
        .bind(article_id)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;

    tracing::info!(article_id, "Article created");
    Ok(article)
}

/// Deletes an article; its comments go with it.
pub async fn delete_article_by_id(pool: &SqlitePool, id: &str) -> Result<(), ApiError> {
    let article_id = parse_id(id)?;
    let result = sqlx::query("DELETE FROM articles WHERE article_id = $1")
        .bind(article_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::ArticleNotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_formats::ArticleQueryParams;
    use crate::db_helpers::test_support::seeded_pool;

    fn plan(params: ArticleQueryParams) -> ArticleQueryPlan {
        ArticleQueryPlan::parse(&params).unwrap()
    }

    #[tokio::test]
    async fn lists_newest_first_by_default() {
        let pool = seeded_pool().await;
        let articles = fetch_articles(&pool, &ArticleQueryPlan::default()).await.unwrap();

        assert_eq!(articles.len(), 10);
        assert!(articles
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        assert_eq!(count_articles(&pool, None).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn nonexistent_topic_yields_no_rows() {
        let pool = seeded_pool().await;
        let plan = plan(ArticleQueryParams {
            topic: Some("games".into()),
            ..Default::default()
        });

        assert!(fetch_articles(&pool, &plan).await.unwrap().is_empty());
        assert_eq!(count_articles(&pool, Some("games")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_page_of_one_is_the_second_row() {
        let pool = seeded_pool().await;
        let everything = fetch_articles(
            &pool,
            &plan(ArticleQueryParams {
                limit: Some("12".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        let page = fetch_articles(
            &pool,
            &plan(ArticleQueryParams {
                limit: Some("1".into()),
                page: Some("2".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(everything.len(), 12);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].article_id, everything[1].article_id);
    }

    #[tokio::test]
    async fn sorts_by_comment_count() {
        let pool = seeded_pool().await;
        let articles = fetch_articles(
            &pool,
            &plan(ArticleQueryParams {
                sort_by: Some("comment_count".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(articles[0].article_id, 1);
        assert_eq!(articles[0].comment_count, 11);
        assert!(articles
            .windows(2)
            .all(|pair| pair[0].comment_count >= pair[1].comment_count));
    }

    #[tokio::test]
    async fn fetches_a_single_article_with_its_comment_count() {
        let pool = seeded_pool().await;
        let article = fetch_article_by_id(&pool, "1").await.unwrap();

        assert_eq!(article.author, "butter_bridge");
        assert_eq!(article.body, "I find this existence challenging");
        assert_eq!(article.votes, 100);
        assert_eq!(article.comment_count, 11);
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_are_distinguished() {
        let pool = seeded_pool().await;

        assert!(matches!(
            fetch_article_by_id(&pool, "99999").await,
            Err(ApiError::ArticleNotFound)
        ));
        assert!(matches!(
            fetch_article_by_id(&pool, "abc").await,
            Err(ApiError::InvalidIdFormat)
        ));
    }

    #[tokio::test]
    async fn votes_move_by_the_given_delta() {
        let pool = seeded_pool().await;
        increment_article_votes(&pool, "3", 50).await.unwrap();

        let article = increment_article_votes(&pool, "3", -30).await.unwrap();
        assert_eq!(article.votes, 20);

        let article = increment_article_votes(&pool, "3", -45).await.unwrap();
        assert_eq!(article.votes, -25);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let pool = seeded_pool().await;
        let (first, second) = tokio::join!(
            increment_article_votes(&pool, "3", 1),
            increment_article_votes(&pool, "3", 1)
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(fetch_article_by_id(&pool, "3").await.unwrap().votes, 2);
    }

    #[tokio::test]
    async fn overflowing_votes_are_rejected_without_writing() {
        let pool = seeded_pool().await;

        assert!(matches!(
            increment_article_votes(&pool, "1", i64::MAX).await,
            Err(ApiError::VoteOutOfRange)
        ));
        assert_eq!(fetch_article_by_id(&pool, "1").await.unwrap().votes, 100);

        increment_article_votes(&pool, "3", -1).await.unwrap();
        assert!(matches!(
            increment_article_votes(&pool, "3", i64::MIN).await,
            Err(ApiError::VoteOutOfRange)
        ));
        assert_eq!(fetch_article_by_id(&pool, "3").await.unwrap().votes, -1);

        let article = increment_article_votes(&pool, "3", i64::MIN + 1).await.unwrap();
        assert_eq!(article.votes, i64::MIN);
        assert_eq!(fetch_articles(&pool, &ArticleQueryPlan::default()).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn voting_on_a_missing_article_fails() {
        let pool = seeded_pool().await;
        assert!(matches!(
            increment_article_votes(&pool, "99999", 1).await,
            Err(ApiError::ArticleNotFound)
        ));
    }

    #[tokio::test]
    async fn inserts_an_article() {
        let pool = seeded_pool().await;
        let article = insert_article(
            &pool,
            CreateArticleRequest {
                title: Some("Cats are liquid".into()),
                topic: Some("cats".into()),
                author: Some("lurker".into()),
                body: Some("They fit anywhere.".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(article.article_id, 13);
        assert_eq!(article.votes, 0);
        assert_eq!(article.comment_count, 0);
        assert_eq!(count_articles(&pool, Some("cats")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn article_insert_reports_bad_references_and_missing_keys() {
        let pool = seeded_pool().await;
        let request = || CreateArticleRequest {
            title: Some("t".into()),
            topic: Some("cats".into()),
            author: Some("lurker".into()),
            body: Some("b".into()),
        };

        let error = insert_article(
            &pool,
            CreateArticleRequest {
                topic: Some("dogs".into()),
                ..request()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(error, ApiError::UnknownTopic));

        let error = insert_article(
            &pool,
            CreateArticleRequest {
                author: Some("Kev".into()),
                ..request()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(error, ApiError::UnknownAuthor));

        let error = insert_article(
            &pool,
            CreateArticleRequest {
                title: None,
                ..request()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(error.to_string(), "Key \"title\" is missing");
    }

    #[tokio::test]
    async fn deleting_an_article_removes_its_comments() {
        let pool = seeded_pool().await;
        delete_article_by_id(&pool, "1").await.unwrap();

        assert!(matches!(
            fetch_article_by_id(&pool, "1").await,
            Err(ApiError::ArticleNotFound)
        ));
        let orphans = sqlx::query_scalar::<Sqlite, i64>(
            "SELECT COUNT(*) FROM comments WHERE article_id = 1",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(orphans, 0);
        assert!(matches!(
            delete_article_by_id(&pool, "1").await,
            Err(ApiError::ArticleNotFound)
        ));
    }
}
