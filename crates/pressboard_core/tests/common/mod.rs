#![allow(dead_code)]

use chrono::NaiveDate;
use pressboard_core::{
    ApiError, ClassificationPatch, NewStrategicWeek, NewsItem, NewsItemId, NewsListQuery,
    NewsRepository, RepoError, RepoResult, StrategicWeek, StrategicWeekId,
    StrategicWeekRepository,
};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory news API that applies patches like the real server.
#[derive(Default)]
pub struct FakeNewsRepository {
    items: Mutex<Vec<NewsItem>>,
    requests: Mutex<Vec<(NewsItemId, serde_json::Value)>>,
    fail_next: Mutex<Option<u16>>,
    respond_with: Mutex<Option<NewsItem>>,
    hold: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl FakeNewsRepository {
    pub fn with_items(items: Vec<NewsItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    /// Next update fails with the given HTTP status.
    pub fn fail_next_update(&self, status: u16) {
        *self.fail_next.lock().unwrap() = Some(status);
    }

    /// Next update returns `item` verbatim, whatever was sent.
    pub fn respond_next_with(&self, item: NewsItem) {
        *self.respond_with.lock().unwrap() = Some(item);
    }

    /// Next update signals `entered` and blocks until `release` fires.
    pub fn hold_next_update(&self, entered: Sender<()>, release: Receiver<()>) {
        *self.hold.lock().unwrap() = Some((entered, release));
    }

    pub fn requests(&self) -> Vec<(NewsItemId, serde_json::Value)> {
        self.requests.lock().unwrap().clone()
    }
}

impl NewsRepository for FakeNewsRepository {
    fn list_news_items(&self, query: &NewsListQuery) -> RepoResult<Vec<NewsItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| !query.strategic_only || item.is_strategic)
            .cloned()
            .collect())
    }

    fn update_news_item(
        &self,
        id: NewsItemId,
        patch: &ClassificationPatch,
    ) -> RepoResult<NewsItem> {
        let hold = self.hold.lock().unwrap().take();
        if let Some((entered, release)) = hold {
            entered.send(()).unwrap();
            release.recv().unwrap();
        }

        self.requests
            .lock()
            .unwrap()
            .push((id, serde_json::to_value(patch).unwrap()));

        if let Some(status) = self.fail_next.lock().unwrap().take() {
            return Err(RepoError::Api(ApiError::Status {
                status,
                message: "internal error".to_string(),
            }));
        }
        if let Some(item) = self.respond_with.lock().unwrap().take() {
            return Ok(item);
        }

        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("news item {id}")))?;
        patch.apply_to(item);
        Ok(item.clone())
    }
}

/// In-memory strategic week API.
#[derive(Default)]
pub struct FakeWeekRepository {
    weeks: Mutex<Vec<StrategicWeek>>,
    fail_next: Mutex<Option<u16>>,
    created: Mutex<Vec<NewStrategicWeek>>,
}

impl FakeWeekRepository {
    pub fn with_weeks(weeks: Vec<StrategicWeek>) -> Self {
        Self {
            weeks: Mutex::new(weeks),
            ..Self::default()
        }
    }

    pub fn replace_weeks(&self, weeks: Vec<StrategicWeek>) {
        *self.weeks.lock().unwrap() = weeks;
    }

    pub fn fail_next(&self, status: u16) {
        *self.fail_next.lock().unwrap() = Some(status);
    }

    pub fn created(&self) -> Vec<NewStrategicWeek> {
        self.created.lock().unwrap().clone()
    }

    fn take_failure(&self) -> RepoResult<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(status) => Err(RepoError::Api(ApiError::Status {
                status,
                message: "internal error".to_string(),
            })),
            None => Ok(()),
        }
    }
}

impl StrategicWeekRepository for FakeWeekRepository {
    fn list_weeks(&self) -> RepoResult<Vec<StrategicWeek>> {
        self.take_failure()?;
        Ok(self.weeks.lock().unwrap().clone())
    }

    fn create_week(&self, week: &NewStrategicWeek) -> RepoResult<StrategicWeek> {
        self.take_failure()?;
        self.created.lock().unwrap().push(week.clone());
        let created = StrategicWeek {
            id: Uuid::new_v4(),
            start_date: week.start_date,
            end_date: week.end_date,
            cycle: week.cycle,
            category: week.category.clone(),
            subcategory: week.subcategory.clone(),
        };
        self.weeks.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn delete_week(&self, id: StrategicWeekId) -> RepoResult<()> {
        self.take_failure()?;
        let mut weeks = self.weeks.lock().unwrap();
        let before = weeks.len();
        weeks.retain(|week| week.id != id);
        if weeks.len() == before {
            return Err(RepoError::NotFound(format!("strategic week {id}")));
        }
        Ok(())
    }
}

pub fn week(cycle: u32, category: &str, subcategory: &str) -> StrategicWeek {
    StrategicWeek {
        id: Uuid::new_v4(),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        cycle,
        category: category.to_string(),
        subcategory: subcategory.to_string(),
    }
}

pub fn classified_item(cycle: u32, category: &str, subcategory: &str) -> NewsItem {
    let mut item = NewsItem::new(Uuid::new_v4(), "Governo inaugura escola");
    item.is_strategic = true;
    item.cycle = Some(cycle);
    item.category = Some(category.to_string());
    item.subcategory = Some(subcategory.to_string());
    item
}

pub fn plain_item(title: &str) -> NewsItem {
    NewsItem::new(Uuid::new_v4(), title)
}
