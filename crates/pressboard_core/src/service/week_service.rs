//! Strategic week use-case service.
//!
//! # Responsibility
//! - List, create and delete strategic weeks.
//! - Announce add/delete outcomes to the user.
//!
//! # Invariants
//! - Create requests are validated before any request is sent.
//! - Each call emits at most one notification.

use crate::model::strategic_week::{NewStrategicWeek, StrategicWeek, StrategicWeekId};
use crate::model::validation::ValidationError;
use crate::notify::{Notification, Notifier};
use crate::repo::news_repo::RepoError;
use crate::repo::week_repo::StrategicWeekRepository;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for strategic week use-cases.
#[derive(Debug)]
pub enum WeekServiceError {
    /// Request rejected before it was sent.
    Invalid(ValidationError),
    /// Target week does not exist remotely.
    WeekNotFound(StrategicWeekId),
    /// Remote request failed.
    Repo(RepoError),
}

impl Display for WeekServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid strategic week: {err}"),
            Self::WeekNotFound(id) => write!(f, "strategic week not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WeekServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::WeekNotFound(_) => None,
        }
    }
}

impl From<RepoError> for WeekServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

/// Strategic week service facade over repository implementations.
pub struct WeekService<R: StrategicWeekRepository> {
    repo: R,
    notifier: Arc<dyn Notifier>,
}

impl<R: StrategicWeekRepository> WeekService<R> {
    pub fn new(repo: R, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub fn list_weeks(&self) -> Result<Vec<StrategicWeek>, WeekServiceError> {
        Ok(self.repo.list_weeks()?)
    }

    /// Validates and creates one week.
    pub fn create_week(
        &self,
        request: &NewStrategicWeek,
    ) -> Result<StrategicWeek, WeekServiceError> {
        let result = request
            .normalized()
            .map_err(WeekServiceError::Invalid)
            .and_then(|normalized| Ok(self.repo.create_week(&normalized)?));

        match result {
            Ok(created) => {
                info!(
                    "event=strategic_week_create module=weeks status=ok week_id={} cycle={}",
                    created.id, created.cycle
                );
                self.notifier
                    .notify(Notification::success("Strategic week created"));
                Ok(created)
            }
            Err(err) => {
                warn!("event=strategic_week_create module=weeks status=error error={err}");
                self.notifier
                    .notify(Notification::failure("strategic week", failure_reason(&err)));
                Err(err)
            }
        }
    }

    /// Deletes one week by id.
    pub fn delete_week(&self, id: StrategicWeekId) -> Result<(), WeekServiceError> {
        let result = self.repo.delete_week(id).map_err(|err| match err {
            RepoError::NotFound(_) => WeekServiceError::WeekNotFound(id),
            other => WeekServiceError::from(other),
        });

        match result {
            Ok(()) => {
                info!("event=strategic_week_delete module=weeks status=ok week_id={id}");
                self.notifier
                    .notify(Notification::success("Strategic week deleted"));
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=strategic_week_delete module=weeks status=error week_id={id} error={err}"
                );
                self.notifier.notify(Notification::destructive(
                    "Could not delete strategic week",
                    failure_reason(&err),
                ));
                Err(err)
            }
        }
    }
}

fn failure_reason(err: &WeekServiceError) -> String {
    match err {
        WeekServiceError::Repo(repo_err) => repo_err.user_message(),
        other => other.to_string(),
    }
}
