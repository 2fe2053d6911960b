mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

/// Raw, unvalidated query string of `GET /api/articles`.
///
/// Every field stays a string here; turning it into something the store can
/// use is the job of [`crate::query::ArticleQueryPlan`].
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ArticleQueryParams {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default, rename = "p")]
    pub page: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct PageQueryParams {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default, rename = "p")]
    pub page: Option<String>,
}
