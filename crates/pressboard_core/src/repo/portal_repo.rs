//! Source portal repository contract and HTTP implementation.

use crate::api::ApiClient;
use crate::model::portal::{NewPortal, Portal, PortalId};
use crate::repo::news_repo::{not_found_as, RepoResult};

/// Repository interface for the portal registry.
pub trait PortalRepository {
    fn list_portals(&self) -> RepoResult<Vec<Portal>>;
    fn create_portal(&self, portal: &NewPortal) -> RepoResult<Portal>;
    fn delete_portal(&self, id: PortalId) -> RepoResult<()>;
}

/// `reqwest`-backed portal repository.
#[derive(Debug, Clone)]
pub struct HttpPortalRepository {
    client: ApiClient,
}

impl HttpPortalRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl PortalRepository for HttpPortalRepository {
    fn list_portals(&self) -> RepoResult<Vec<Portal>> {
        Ok(self.client.get_json("portals", &[])?)
    }

    fn create_portal(&self, portal: &NewPortal) -> RepoResult<Portal> {
        let normalized = portal.normalized()?;
        Ok(self.client.post_json("portals", &normalized)?)
    }

    fn delete_portal(&self, id: PortalId) -> RepoResult<()> {
        self.client
            .delete(&format!("portals/{id}"))
            .map_err(not_found_as(|| format!("portal {id}")))
    }
}
