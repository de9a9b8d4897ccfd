//! Strategic week repository contract and HTTP implementation.

use crate::api::ApiClient;
use crate::model::strategic_week::{NewStrategicWeek, StrategicWeek, StrategicWeekId};
use crate::repo::news_repo::{not_found_as, RepoError, RepoResult};

/// Repository interface for the strategic week reference set.
pub trait StrategicWeekRepository {
    fn list_weeks(&self) -> RepoResult<Vec<StrategicWeek>>;
    fn create_week(&self, week: &NewStrategicWeek) -> RepoResult<StrategicWeek>;
    fn delete_week(&self, id: StrategicWeekId) -> RepoResult<()>;
}

/// `reqwest`-backed strategic week repository.
#[derive(Debug, Clone)]
pub struct HttpStrategicWeekRepository {
    client: ApiClient,
}

impl HttpStrategicWeekRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl StrategicWeekRepository for HttpStrategicWeekRepository {
    fn list_weeks(&self) -> RepoResult<Vec<StrategicWeek>> {
        Ok(self.client.get_json("strategic-weeks", &[])?)
    }

    fn create_week(&self, week: &NewStrategicWeek) -> RepoResult<StrategicWeek> {
        let normalized = week.normalized()?;
        let created: StrategicWeek = self.client.post_json("strategic-weeks", &normalized)?;
        if created.cycle != normalized.cycle {
            return Err(RepoError::InvalidData(format!(
                "created week {} reports cycle {} instead of {}",
                created.id, created.cycle, normalized.cycle
            )));
        }
        Ok(created)
    }

    fn delete_week(&self, id: StrategicWeekId) -> RepoResult<()> {
        self.client
            .delete(&format!("strategic-weeks/{id}"))
            .map_err(not_found_as(|| format!("strategic week {id}")))
    }
}
