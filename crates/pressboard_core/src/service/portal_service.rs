//! Source portal registry service.
//!
//! # Invariants
//! - Create requests are validated before any request is sent.
//! - Portals are listed sorted by name (case-insensitive), then id.

use crate::model::portal::{NewPortal, Portal, PortalId};
use crate::model::validation::ValidationError;
use crate::notify::{Notification, Notifier};
use crate::repo::news_repo::RepoError;
use crate::repo::portal_repo::PortalRepository;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for portal use-cases.
#[derive(Debug)]
pub enum PortalServiceError {
    Invalid(ValidationError),
    PortalNotFound(PortalId),
    Repo(RepoError),
}

impl Display for PortalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid portal: {err}"),
            Self::PortalNotFound(id) => write!(f, "portal not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PortalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::PortalNotFound(_) => None,
        }
    }
}

impl From<RepoError> for PortalServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

/// Portal registry facade.
pub struct PortalService<R: PortalRepository> {
    repo: R,
    notifier: Arc<dyn Notifier>,
}

impl<R: PortalRepository> PortalService<R> {
    pub fn new(repo: R, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub fn list_portals(&self) -> Result<Vec<Portal>, PortalServiceError> {
        let mut portals = self.repo.list_portals()?;
        portals.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(portals)
    }

    pub fn create_portal(&self, request: &NewPortal) -> Result<Portal, PortalServiceError> {
        let result = request
            .normalized()
            .map_err(PortalServiceError::Invalid)
            .and_then(|normalized| Ok(self.repo.create_portal(&normalized)?));

        match result {
            Ok(created) => {
                info!(
                    "event=portal_create module=portals status=ok portal_id={}",
                    created.id
                );
                self.notifier.notify(Notification::success("Portal added"));
                Ok(created)
            }
            Err(err) => {
                warn!("event=portal_create module=portals status=error error={err}");
                self.notifier
                    .notify(Notification::failure("portal", failure_reason(&err)));
                Err(err)
            }
        }
    }

    pub fn delete_portal(&self, id: PortalId) -> Result<(), PortalServiceError> {
        let result = self.repo.delete_portal(id).map_err(|err| match err {
            RepoError::NotFound(_) => PortalServiceError::PortalNotFound(id),
            other => PortalServiceError::from(other),
        });

        match result {
            Ok(()) => {
                info!("event=portal_delete module=portals status=ok portal_id={id}");
                self.notifier.notify(Notification::success("Portal removed"));
                Ok(())
            }
            Err(err) => {
                warn!("event=portal_delete module=portals status=error portal_id={id} error={err}");
                self.notifier.notify(Notification::destructive(
                    "Could not remove portal",
                    failure_reason(&err),
                ));
                Err(err)
            }
        }
    }
}

fn failure_reason(err: &PortalServiceError) -> String {
    match err {
        PortalServiceError::Repo(repo_err) => repo_err.user_message(),
        other => other.to_string(),
    }
}
