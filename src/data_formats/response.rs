use serde::{Deserialize, Serialize};

use crate::models::{format_timestamp, Article, ArticleSummary, Comment, Topic, User};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TopicResponse {
    pub slug: String,
    pub description: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ArticleResponse {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: String,
    pub votes: i64,
    pub comment_count: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ArticleSummaryResponse {
    pub article_id: i64,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub created_at: String,
    pub votes: i64,
    pub comment_count: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CommentResponse {
    pub comment_id: i64,
    pub article_id: i64,
    pub author: String,
    pub body: String,
    pub votes: i64,
    pub created_at: String,
}

impl From<Topic> for TopicResponse {
    fn from(Topic { slug, description }: Topic) -> Self {
        TopicResponse { slug, description }
    }
}

impl From<User> for UserResponse {
    fn from(
        User {
            username,
            name,
            avatar_url,
        }: User,
    ) -> Self {
        UserResponse {
            username,
            name,
            avatar_url,
        }
    }
}

impl From<Article> for ArticleResponse {
    fn from(
        Article {
            article_id,
            title,
            topic,
            author,
            body,
            created_at,
            votes,
            comment_count,
        }: Article,
    ) -> Self {
        ArticleResponse {
            article_id,
            title,
            topic,
            author,
            body,
            created_at: format_timestamp(&created_at),
            votes,
            comment_count,
        }
    }
}

impl From<ArticleSummary> for ArticleSummaryResponse {
    fn from(
        ArticleSummary {
            article_id,
            title,
            topic,
            author,
            created_at,
            votes,
            comment_count,
        }: ArticleSummary,
    ) -> Self {
        ArticleSummaryResponse {
            article_id,
            title,
            topic,
            author,
            created_at: format_timestamp(&created_at),
            votes,
            comment_count,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(
        Comment {
            comment_id,
            article_id,
            author,
            body,
            votes,
            created_at,
        }: Comment,
    ) -> Self {
        CommentResponse {
            comment_id,
            article_id,
            author,
            body,
            votes,
            created_at: format_timestamp(&created_at),
        }
    }
}
