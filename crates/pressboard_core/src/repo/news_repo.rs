//! News item repository contract and HTTP implementation.
//!
//! # Responsibility
//! - List news items for the spreadsheet view.
//! - Send classification partial updates and return the confirmed item.
//!
//! # Invariants
//! - `update_news_item` is one HTTP request; the server applies all fields
//!   of the patch or none of them.
//! - The returned item must carry the requested id.

use crate::api::{ApiClient, ApiError};
use crate::model::date_range::DateRange;
use crate::model::news_item::{ClassificationPatch, NewsItem, NewsItemId};
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all press API repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Transport failure or non-2xx response.
    Api(ApiError),
    /// Target record does not exist remotely.
    NotFound(String),
    /// Response decoded but violates the expected contract.
    InvalidData(String),
    /// Request rejected locally before it was sent.
    Validation(ValidationError),
}

impl RepoError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Status { message, .. }) => message.clone(),
            Self::Api(ApiError::Http(_)) => "could not reach the server".to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(err) => write!(f, "{err}"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::InvalidData(message) => write!(f, "invalid response data: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ApiError> for RepoError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Maps a 404 to `NotFound(what)` and leaves other errors as transport errors.
pub(crate) fn not_found_as(what: impl FnOnce() -> String) -> impl FnOnce(ApiError) -> RepoError {
    move |err| {
        if err.is_not_found() {
            RepoError::NotFound(what())
        } else {
            RepoError::Api(err)
        }
    }
}

/// Filter options for the news list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsListQuery {
    pub range: Option<DateRange>,
    pub strategic_only: bool,
}

impl NewsListQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(range) = self.range {
            pairs.extend(range.query_pairs());
        }
        if self.strategic_only {
            pairs.push(("isStrategic", "true".to_string()));
        }
        pairs
    }
}

/// Repository interface for news item operations.
pub trait NewsRepository {
    /// Lists news items matching the filter, in server order.
    fn list_news_items(&self, query: &NewsListQuery) -> RepoResult<Vec<NewsItem>>;
    /// Sends one partial update and returns the server-confirmed item.
    fn update_news_item(
        &self,
        id: NewsItemId,
        patch: &ClassificationPatch,
    ) -> RepoResult<NewsItem>;
}

/// `reqwest`-backed news repository.
#[derive(Debug, Clone)]
pub struct HttpNewsRepository {
    client: ApiClient,
}

impl HttpNewsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl NewsRepository for HttpNewsRepository {
    fn list_news_items(&self, query: &NewsListQuery) -> RepoResult<Vec<NewsItem>> {
        let pairs = query.query_pairs();
        Ok(self.client.get_json("news-items", &pairs)?)
    }

    fn update_news_item(
        &self,
        id: NewsItemId,
        patch: &ClassificationPatch,
    ) -> RepoResult<NewsItem> {
        let confirmed: NewsItem = self
            .client
            .put_json(&format!("news-items/{id}"), patch)
            .map_err(not_found_as(|| format!("news item {id}")))?;

        if confirmed.id != id {
            return Err(RepoError::InvalidData(format!(
                "update for {id} returned item {}",
                confirmed.id
            )));
        }
        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::NewsListQuery;
    use crate::model::date_range::DateRange;

    #[test]
    fn query_pairs_include_only_requested_filters() {
        assert!(NewsListQuery::default().query_pairs().is_empty());

        let range = DateRange::normalize(Some("2024-01-01"), Some("2024-01-07"))
            .unwrap()
            .unwrap();
        let pairs = NewsListQuery {
            range: Some(range),
            strategic_only: true,
        }
        .query_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["startDate", "endDate", "isStrategic"]);
    }
}
