//! Source portal registry records.

use crate::model::validation::ValidationError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PortalId = Uuid;

/// News source monitored by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    pub id: PortalId,
    pub name: String,
    pub url: String,
}

/// Body for `POST /portals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPortal {
    pub name: String,
    pub url: String,
}

impl NewPortal {
    /// Returns a trimmed copy with a checked absolute http(s) URL.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankField("name"));
        }
        let raw_url = self.url.trim();
        let parsed =
            Url::parse(raw_url).map_err(|_| ValidationError::InvalidUrl(raw_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ValidationError::InvalidUrl(raw_url.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            url: raw_url.to_string(),
        })
    }
}
