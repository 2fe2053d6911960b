//! Validation of the article listing query string.
//!
//! Untrusted query parameters are turned into an [`ArticleQueryPlan`] before
//! anything touches the store. Only the allow-listed sort tokens ever end up
//! in SQL text; the topic filter, limit and offset are always bound.

use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{data_formats::ArticleQueryParams, errors::ApiError};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));
static TOPIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("valid topic regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Author,
    Title,
    ArticleId,
    Topic,
    #[default]
    CreatedAt,
    Votes,
    CommentCount,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Author,
        SortColumn::Title,
        SortColumn::ArticleId,
        SortColumn::Topic,
        SortColumn::CreatedAt,
        SortColumn::Votes,
        SortColumn::CommentCount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Author => "author",
            SortColumn::Title => "title",
            SortColumn::ArticleId => "article_id",
            SortColumn::Topic => "topic",
            SortColumn::CreatedAt => "created_at",
            SortColumn::Votes => "votes",
            SortColumn::CommentCount => "comment_count",
        }
    }
}

impl FromStr for SortColumn {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == value)
            .ok_or_else(|| ApiError::UnknownSortColumn(value.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ApiError::InvalidSortOrder(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl Pagination {
    /// Checks `limit` before `page`; the first failure wins.
    pub fn parse(limit: Option<&str>, page: Option<&str>) -> Result<Self, ApiError> {
        let limit = parse_count(limit, DEFAULT_LIMIT, "limit")?;
        let page = parse_count(page, DEFAULT_PAGE, "page")?;
        Ok(Self { limit, page })
    }

    /// Rows to skip. Page `0` is treated like page `1`.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.limit)
    }
}

fn parse_count(raw: Option<&str>, default: i64, name: &'static str) -> Result<i64, ApiError> {
    match raw {
        None => Ok(default),
        Some(raw) if DIGITS.is_match(raw) => {
            raw.parse().map_err(|_| ApiError::InvalidPagination(name))
        }
        Some(_) => Err(ApiError::InvalidPagination(name)),
    }
}

/// A validated filter/sort/page request for the article listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleQueryPlan {
    pub topic: Option<String>,
    pub sort_by: SortColumn,
    pub order: SortOrder,
    pub pagination: Pagination,
}

impl ArticleQueryPlan {
    /// Validates in the fixed order limit, page, sort_by, order, topic and
    /// reports only the first failure.
    pub fn parse(params: &ArticleQueryParams) -> Result<Self, ApiError> {
        let pagination = Pagination::parse(params.limit.as_deref(), params.page.as_deref())?;
        let sort_by = match params.sort_by.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortColumn::default(),
        };
        let order = match params.order.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };
        let topic = match params.topic.as_deref() {
            None | Some("") => None,
            Some(raw) if TOPIC.is_match(raw) => Some(raw.to_owned()),
            Some(raw) => return Err(ApiError::InvalidTopicFormat(raw.to_owned())),
        };
        Ok(Self {
            topic,
            sort_by,
            order,
            pagination,
        })
    }

    /// `ORDER BY` clause built from allow-listed tokens only. Ties are broken
    /// by `article_id` in the same direction so paging is stable.
    pub fn order_by_clause(&self) -> String {
        let direction = self.order.as_sql();
        match self.sort_by {
            SortColumn::ArticleId => format!("ORDER BY article_id {direction}"),
            column => format!(
                "ORDER BY {} {direction}, article_id {direction}",
                column.as_str()
            ),
        }
    }

    pub fn limit(&self) -> i64 {
        self.pagination.limit
    }

    pub fn offset(&self) -> i64 {
        self.pagination.offset()
    }
}

impl TryFrom<ArticleQueryParams> for ArticleQueryPlan {
    type Error = ApiError;

    fn try_from(params: ArticleQueryParams) -> Result<Self, Self::Error> {
        Self::parse(&params)
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
