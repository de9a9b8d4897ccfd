//! Client core for the press-monitoring dashboard.
//! This crate is the single source of truth for client-side invariants.

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod store;

pub use api::{ApiClient, ApiError, ApiResult};
pub use config::{ApiConfig, ConfigError, EditOrdering};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::date_range::DateRange;
pub use model::news_item::{ClassificationField, ClassificationPatch, NewsItem, NewsItemId};
pub use model::portal::{NewPortal, Portal, PortalId};
pub use model::sentiment::{Sentiment, SentimentBreakdown, SentimentTotals};
pub use model::strategic_week::{NewStrategicWeek, StrategicWeek, StrategicWeekId};
pub use model::validation::ValidationError;
pub use notify::{Notification, NotificationKind, NotificationLog, Notifier};
pub use repo::news_repo::{
    HttpNewsRepository, NewsListQuery, NewsRepository, RepoError, RepoResult,
};
pub use repo::portal_repo::{HttpPortalRepository, PortalRepository};
pub use repo::week_repo::{HttpStrategicWeekRepository, StrategicWeekRepository};
pub use service::classification_editor::{
    ClassificationEditor, ControlState, EditorError, FieldControl,
};
pub use service::portal_service::{PortalService, PortalServiceError};
pub use service::vocabulary::{StrategicVocabulary, VocabularyMismatch};
pub use service::week_service::{WeekService, WeekServiceError};
pub use store::news_store::{NewsStore, ViewFilter};

/// Editor wired to the HTTP repositories.
pub type HttpClassificationEditor =
    ClassificationEditor<HttpNewsRepository, HttpStrategicWeekRepository>;

/// Builds an HTTP-backed editor from config.
pub fn http_editor(
    config: &ApiConfig,
    notifier: std::sync::Arc<dyn Notifier>,
) -> ApiResult<HttpClassificationEditor> {
    let client = ApiClient::new(config)?;
    Ok(ClassificationEditor::new(
        HttpNewsRepository::new(client.clone()),
        HttpStrategicWeekRepository::new(client),
        notifier,
        config.edit_ordering,
    ))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
