use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    Extension, Json,
};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    data_formats::*,
    db_helpers::{
        count_articles, delete_article_by_id, delete_comment_by_id, fetch_article_by_id,
        fetch_articles, fetch_comments_by_article, fetch_topics, fetch_user_by_name, fetch_users,
        increment_article_votes, increment_comment_votes, insert_article, insert_comment,
        insert_topic, parse_id,
    },
    errors::ApiError,
    query::ArticleQueryPlan,
    JsonResponse,
};

const ENDPOINTS: &str = include_str!("../data/endpoints.json");

type Pool = Extension<Arc<SqlitePool>>;
type JsonResult<T> = Result<Json<T>, ApiError>;
type CreatedResult<T> = Result<JsonResponse<T>, ApiError>;

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))
}

// ----------------- Helper Handlers -----------------
pub async fn not_found(uri: Uri) -> ApiError {
    tracing::debug!("No route for {uri}");
    ApiError::RouteNotFound
}

pub async fn get_endpoints() -> JsonResult<EndpointsWrapper> {
    let endpoints: Value = serde_json::from_str(ENDPOINTS)
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Invalid endpoints.json")))?;
    Ok(Json(EndpointsWrapper { endpoints }))
}

// ----------------- Topic Handlers -----------------
pub async fn get_topics(Extension(pool): Pool) -> JsonResult<MultipleTopicsWrapper> {
    let topics = fetch_topics(&pool).await?;
    Ok(Json(MultipleTopicsWrapper {
        topics: topics.into_iter().map(TopicResponse::from).collect(),
    }))
}

pub async fn post_topic(
    Extension(pool): Pool,
    payload: Result<Json<CreateTopicRequest>, JsonRejection>,
) -> CreatedResult<TopicWrapper<TopicResponse>> {
    let topic = insert_topic(&pool, json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(TopicWrapper {
            topic: topic.into(),
        }),
    ))
}

// ----------------- Article Handlers -----------------
pub async fn get_articles(
    Extension(pool): Pool,
    params: Result<Query<ArticleQueryParams>, QueryRejection>,
) -> JsonResult<MultipleArticlesWrapper> {
    let plan = ArticleQueryPlan::parse(&query_params(params)?)?;
    let articles = fetch_articles(&pool, &plan).await?;
    let total_count = count_articles(&pool, plan.topic.as_deref()).await?;
    Ok(Json(MultipleArticlesWrapper {
        articles: articles
            .into_iter()
            .map(ArticleSummaryResponse::from)
            .collect(),
        total_count,
    }))
}

pub async fn post_article(
    Extension(pool): Pool,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> CreatedResult<ArticleWrapper<ArticleResponse>> {
    let article = insert_article(&pool, json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ArticleWrapper {
            article: article.into(),
        }),
    ))
}

pub async fn get_article(
    Extension(pool): Pool,
    Path(article_id): Path<String>,
) -> JsonResult<ArticleWrapper<ArticleResponse>> {
    let article = fetch_article_by_id(&pool, &article_id).await?;
    Ok(Json(ArticleWrapper {
        article: article.into(),
    }))
}

pub async fn patch_article_votes(
    Extension(pool): Pool,
    Path(article_id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> JsonResult<ArticleWrapper<ArticleResponse>> {
    // A malformed id is reported ahead of a malformed body.
    parse_id(&article_id)?;
    let delta = json_body(payload)?.delta()?;
    let article = increment_article_votes(&pool, &article_id, delta).await?;
    Ok(Json(ArticleWrapper {
        article: article.into(),
    }))
}

pub async fn delete_article(
    Extension(pool): Pool,
    Path(article_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_article_by_id(&pool, &article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Comment Handlers -----------------
pub async fn get_article_comments(
    Extension(pool): Pool,
    Path(article_id): Path<String>,
    params: Result<Query<PageQueryParams>, QueryRejection>,
) -> JsonResult<MultipleCommentsWrapper> {
    let comments = fetch_comments_by_article(&pool, &article_id, query_params(params)?).await?;
    Ok(Json(MultipleCommentsWrapper {
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

pub async fn post_comment(
    Extension(pool): Pool,
    Path(article_id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> CreatedResult<PostedCommentWrapper> {
    let comment = insert_comment(&pool, &article_id, json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostedCommentWrapper {
            posted_comment: comment.into(),
        }),
    ))
}

pub async fn delete_comment(
    Extension(pool): Pool,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_comment_by_id(&pool, &comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn patch_comment_votes(
    Extension(pool): Pool,
    Path(comment_id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> JsonResult<CommentWrapper<CommentResponse>> {
    parse_id(&comment_id)?;
    let delta = json_body(payload)?.delta()?;
    let comment = increment_comment_votes(&pool, &comment_id, delta).await?;
    Ok(Json(CommentWrapper {
        comment: comment.into(),
    }))
}

// ----------------- User Handlers -----------------
pub async fn get_users(Extension(pool): Pool) -> JsonResult<MultipleUsersWrapper> {
    let users = fetch_users(&pool).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

pub async fn get_user(
    Extension(pool): Pool,
    Path(username): Path<String>,
) -> JsonResult<UserWrapper<UserResponse>> {
    let user = fetch_user_by_name(&pool, &username).await?;
    Ok(Json(UserWrapper { user: user.into() }))
}
