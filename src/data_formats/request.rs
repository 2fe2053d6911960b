use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ApiError;

// Required fields are optional here on purpose: absent values are bound as
// NULL and the store's NOT NULL constraints report which key is missing.

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CommentRequest {
    pub username: Option<String>,
    pub body: Option<String>,
}

// ----------------- Article Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub topic: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
}

// ----------------- Topic Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CreateTopicRequest {
    pub slug: Option<String>,
    pub description: Option<String>,
}

// ----------------- Vote Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct VoteRequest {
    pub inc_votes: Option<Value>,
}

impl VoteRequest {
    /// The signed vote delta. Numeric strings are accepted, anything else that
    /// is not an integer is a datatype error.
    pub fn delta(&self) -> Result<i64, ApiError> {
        match &self.inc_votes {
            None | Some(Value::Null) => Err(ApiError::MissingField("inc_votes".to_owned())),
            Some(Value::Number(number)) => number.as_i64().ok_or(ApiError::InvalidIdFormat),
            Some(Value::String(text)) => text.trim().parse().map_err(|_| ApiError::InvalidIdFormat),
            Some(_) => Err(ApiError::InvalidIdFormat),
        }
    }
}
