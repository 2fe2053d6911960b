use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

use crate::JsonResponse;

// SQLite extended result codes, as reported by `DatabaseError::code`.
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad Request - Invalid datatype for ID")]
    InvalidIdFormat,
    #[error("Key \"{0}\" is missing")]
    MissingField(String),
    #[error("Username does not exist!")]
    UnknownAuthor,
    #[error("Topic does not exist!")]
    UnknownTopic,
    #[error("Topic '{0}' already exists!")]
    TopicAlreadyExists(String),
    #[error("sort_by: '{0}' is not found.")]
    UnknownSortColumn(String),
    #[error("order '{0}' does not exist. Please use: 'asc' or 'desc'")]
    InvalidSortOrder(String),
    #[error("topic '{0}' is not allowed")]
    InvalidTopicFormat(String),
    #[error("Bad Request - inc_votes takes votes out of range")]
    VoteOutOfRange,
    #[error("'{0}' must be a number!")]
    InvalidPagination(&'static str),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Invalid ID: Article not found!")]
    ArticleNotFound,
    #[error("comment with that ID does not exist")]
    CommentNotFound,
    #[error("user with that username does not exist")]
    UserNotFound,
    #[error("Invalid URL")]
    RouteNotFound,
    #[error("Internal server error!")]
    Database(#[source] sqlx::Error),
    #[error("Internal server error!")]
    Internal(#[source] anyhow::Error),
}

/// Coarse classification of every rejection the API can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Constraint,
    Internal,
}

impl ErrorCategory {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorCategory::Validation | ErrorCategory::Constraint => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub msg: String,
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::InvalidIdFormat
            | ApiError::MissingField(_)
            | ApiError::InvalidSortOrder(_)
            | ApiError::InvalidTopicFormat(_)
            | ApiError::InvalidPagination(_)
            | ApiError::VoteOutOfRange
            | ApiError::InvalidRequest(_) => ErrorCategory::Validation,
            // Unknown sort columns are reported as 404.
            ApiError::UnknownSortColumn(_)
            | ApiError::ArticleNotFound
            | ApiError::CommentNotFound
            | ApiError::UserNotFound
            | ApiError::RouteNotFound => ErrorCategory::NotFound,
            ApiError::UnknownAuthor | ApiError::UnknownTopic | ApiError::TopicAlreadyExists(_) => {
                ErrorCategory::Constraint
            }
            ApiError::Database(_) | ApiError::Internal(_) => ErrorCategory::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.category().status_code()
    }

    pub fn to_json_response(&self) -> JsonResponse<ErrorMessage> {
        let status_code = self.status_code();
        match self {
            ApiError::Database(e) => tracing::error!("Database error: {e}"),
            ApiError::Internal(e) => tracing::error!("Internal error: {e:#}"),
            other => tracing::debug!(status = %status_code, "Request rejected: {other}"),
        }
        (
            status_code,
            Json(ErrorMessage {
                msg: self.to_string(),
            }),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(value: sqlx::Error) -> Self {
        if let sqlx::Error::Database(e) = &value {
            let code = e.code();
            if let Some(translated) = translate_constraint(code.as_deref(), e.message()) {
                return translated;
            }
        }
        Self::Database(value)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

/// Maps a storage constraint failure onto the client error it stands for.
///
/// SQLite reports the failing column of a NOT NULL violation in the message
/// (`NOT NULL constraint failed: comments.body`), but foreign key violations
/// carry no constraint name, so every FK failure is attributed to the author
/// reference. Accessors check the other references before inserting.
pub(crate) fn translate_constraint(code: Option<&str>, message: &str) -> Option<ApiError> {
    if code == Some(SQLITE_CONSTRAINT_NOTNULL) || message.starts_with("NOT NULL constraint failed")
    {
        let column = message.rsplit(": ").next().unwrap_or_default();
        return Some(ApiError::MissingField(request_field_for(column).to_owned()));
    }
    if code == Some(SQLITE_CONSTRAINT_FOREIGNKEY)
        || message.starts_with("FOREIGN KEY constraint failed")
    {
        return Some(ApiError::UnknownAuthor);
    }
    None
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(e) => {
            matches!(
                e.code().as_deref(),
                Some(SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY)
            ) || e.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

fn request_field_for(column: &str) -> &str {
    match column {
        "comments.author" => "username",
        "articles.author" => "username/author",
        "articles.votes" | "comments.votes" => "inc_votes",
        other => other.rsplit('.').next().unwrap_or(other),
    }
}
