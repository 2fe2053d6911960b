use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::{ArticleSummaryResponse, CommentResponse, TopicResponse, UserResponse};

#[derive(Debug, Deserialize, Serialize)]
pub struct TopicWrapper<T> {
    pub topic: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleTopicsWrapper {
    pub topics: Vec<TopicResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleUsersWrapper {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleWrapper<T> {
    pub article: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleArticlesWrapper {
    pub articles: Vec<ArticleSummaryResponse>,
    pub total_count: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper<T> {
    pub comment: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostedCommentWrapper {
    #[serde(rename = "postedComment")]
    pub posted_comment: CommentResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCommentsWrapper {
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EndpointsWrapper {
    pub endpoints: Value,
}
