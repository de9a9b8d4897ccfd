//! Strategic classification editor.
//!
//! # Responsibility
//! - Drive the four per-row controls: strategic toggle, cycle, category and
//!   subcategory selects.
//! - Persist every edit through `NewsRepository::update_news_item` before the
//!   local store reflects it.
//! - Cascade resets when a higher-order field is cleared.
//!
//! # Invariants
//! - The store only holds server-confirmed values; a failed request leaves
//!   the item untouched and emits exactly one destructive notification.
//! - Every stored item satisfies the classification cascade after a
//!   successful edit.
//! - At most one request per `(item, field)` is in flight.
//! - With `EditOrdering::PerItem`, at most one request per item is in flight.
//! - Failed requests are never retried automatically.

use crate::config::EditOrdering;
use crate::model::date_range::DateRange;
use crate::model::news_item::{ClassificationField, ClassificationPatch, NewsItem, NewsItemId};
use crate::model::sentiment::SentimentTotals;
use crate::model::validation::ValidationError;
use crate::notify::{Notification, Notifier};
use crate::repo::news_repo::{NewsListQuery, NewsRepository, RepoError};
use crate::repo::week_repo::StrategicWeekRepository;
use crate::service::vocabulary::{StrategicVocabulary, VocabularyMismatch};
use crate::store::news_store::{NewsStore, ViewFilter};
use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Errors from editor operations.
#[derive(Debug)]
pub enum EditorError {
    /// Item is not loaded in the store.
    ItemNotFound(NewsItemId),
    /// Edit rejected before any request was sent.
    Invalid(ValidationError),
    /// A save for the same control is still in flight.
    SaveInProgress {
        id: NewsItemId,
        field: ClassificationField,
    },
    /// Remote request failed.
    Repo(RepoError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "news item not loaded: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::SaveInProgress { id, field } => write!(
                f,
                "save already in progress for {} on {id}",
                field.wire_name()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Interactive state of one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldControl {
    /// Control accepts input.
    pub enabled: bool,
    /// A save for this control is in flight.
    pub saving: bool,
}

/// Interactive state of the four controls of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub strategic: FieldControl,
    pub cycle: FieldControl,
    pub category: FieldControl,
    pub subcategory: FieldControl,
}

/// Per-row classification editor over a keyed store.
pub struct ClassificationEditor<R: NewsRepository, W: StrategicWeekRepository> {
    news_repo: R,
    week_repo: W,
    notifier: Arc<dyn Notifier>,
    ordering: EditOrdering,
    store: Mutex<NewsStore>,
    vocabulary: RwLock<StrategicVocabulary>,
    saving: Mutex<HashSet<(NewsItemId, ClassificationField)>>,
    item_locks: Mutex<HashMap<NewsItemId, Arc<Mutex<()>>>>,
}

impl<R: NewsRepository, W: StrategicWeekRepository> ClassificationEditor<R, W> {
    /// Creates an editor with an empty store and vocabulary.
    pub fn new(
        news_repo: R,
        week_repo: W,
        notifier: Arc<dyn Notifier>,
        ordering: EditOrdering,
    ) -> Self {
        Self {
            news_repo,
            week_repo,
            notifier,
            ordering,
            store: Mutex::new(NewsStore::new()),
            vocabulary: RwLock::new(StrategicVocabulary::default()),
            saving: Mutex::new(HashSet::new()),
            item_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn news_repository(&self) -> &R {
        &self.news_repo
    }

    pub fn week_repository(&self) -> &W {
        &self.week_repo
    }

    /// Fetches news items and replaces the store.
    ///
    /// Returns the number of loaded items.
    pub fn load_items(
        &self,
        range: Option<DateRange>,
        view: ViewFilter,
    ) -> Result<usize, EditorError> {
        let query = NewsListQuery {
            range,
            strategic_only: view == ViewFilter::StrategicOnly,
        };
        let items = self.news_repo.list_news_items(&query).map_err(|err| {
            warn!("event=news_items_load module=editor status=error error={err}");
            self.notifier.notify(Notification::destructive(
                "Could not load news items",
                err.user_message(),
            ));
            EditorError::from(err)
        })?;

        let count = items.len();
        self.store.lock().load(items, view);
        info!("event=news_items_load module=editor status=ok count={count}");
        Ok(count)
    }

    /// Re-fetches the strategic week set and swaps it in atomically.
    pub fn reload_vocabulary(&self) -> Result<usize, EditorError> {
        let weeks = self.week_repo.list_weeks().map_err(|err| {
            warn!("event=vocabulary_reload module=editor status=error error={err}");
            self.notifier.notify(Notification::destructive(
                "Could not load strategic weeks",
                err.user_message(),
            ));
            EditorError::from(err)
        })?;

        let count = weeks.len();
        self.set_vocabulary(StrategicVocabulary::new(weeks));
        info!("event=vocabulary_reload module=editor status=ok weeks={count}");
        Ok(count)
    }

    /// Replaces the reference set without a fetch.
    pub fn set_vocabulary(&self, vocabulary: StrategicVocabulary) {
        *self.vocabulary.write() = vocabulary;
    }

    pub fn vocabulary(&self) -> StrategicVocabulary {
        self.vocabulary.read().clone()
    }

    pub fn available_cycles(&self) -> Vec<u32> {
        self.vocabulary.read().cycles()
    }

    /// Categories for `cycle`; empty when the cycle is unset.
    pub fn available_categories(&self, cycle: Option<u32>) -> Vec<String> {
        match cycle {
            Some(cycle) => self.vocabulary.read().categories(cycle),
            None => Vec::new(),
        }
    }

    /// Subcategories for `(cycle, category)`; empty when either is unset.
    pub fn available_subcategories(
        &self,
        cycle: Option<u32>,
        category: Option<&str>,
    ) -> Vec<String> {
        match (cycle, category) {
            (Some(cycle), Some(category)) => self.vocabulary.read().subcategories(cycle, category),
            _ => Vec::new(),
        }
    }

    /// Stored value the current vocabulary does not offer, if any.
    ///
    /// Reported for display only; the stored value is never repaired.
    pub fn vocabulary_mismatch(&self, id: NewsItemId) -> Option<VocabularyMismatch> {
        let item = self.item(id)?;
        self.vocabulary.read().mismatch(&item)
    }

    pub fn item(&self, id: NewsItemId) -> Option<NewsItem> {
        self.store.lock().get(id).cloned()
    }

    /// Snapshot of the visible rows in display order.
    pub fn visible_items(&self) -> Vec<NewsItem> {
        self.store
            .lock()
            .visible_items()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Sentiment counts over the visible rows.
    pub fn sentiment_totals(&self) -> SentimentTotals {
        let store = self.store.lock();
        SentimentTotals::from_items(store.visible_items())
    }

    /// Enable/saving flags for the four controls of one row.
    pub fn controls(&self, id: NewsItemId) -> Option<ControlState> {
        let item = self.item(id)?;
        let saving = self.saving.lock();
        let control = |field: ClassificationField, precondition: bool| {
            let in_flight = saving.contains(&(id, field));
            FieldControl {
                enabled: precondition && !in_flight,
                saving: in_flight,
            }
        };

        Some(ControlState {
            strategic: control(ClassificationField::Strategic, true),
            cycle: control(ClassificationField::Cycle, item.is_strategic),
            category: control(
                ClassificationField::Category,
                item.is_strategic && item.cycle.is_some(),
            ),
            subcategory: control(
                ClassificationField::Subcategory,
                item.is_strategic && item.cycle.is_some() && item.category.is_some(),
            ),
        })
    }

    /// Marks or unmarks an item as strategic.
    ///
    /// Unmarking sends and applies `cycle/category/subcategory = null` in the
    /// same request. In a strategic-only view an unmarked item is hidden.
    pub fn set_strategic(&self, id: NewsItemId, checked: bool) -> Result<NewsItem, EditorError> {
        let confirmed = self.save(
            id,
            ClassificationField::Strategic,
            ClassificationPatch::strategic(checked),
            |_, confirmed| {
                if !checked {
                    ClassificationPatch::strategic(false).apply_to(confirmed);
                }
            },
        )?;

        let mut store = self.store.lock();
        if !checked && store.view() == ViewFilter::StrategicOnly {
            store.hide(id);
        }
        drop(store);

        self.notifier.notify(Notification::success(if checked {
            "News item marked as strategic"
        } else {
            "News item unmarked as strategic"
        }));
        Ok(confirmed)
    }

    /// Sets or clears the cycle. Clearing also clears category and
    /// subcategory.
    ///
    /// # Errors
    /// - `Invalid(NonPositiveCycle)` for `Some(0)`; nothing is sent.
    pub fn set_cycle(&self, id: NewsItemId, cycle: Option<u32>) -> Result<NewsItem, EditorError> {
        if cycle == Some(0) {
            let err = ValidationError::NonPositiveCycle;
            warn!("event=news_item_update module=editor status=rejected field=cycle item_id={id}");
            self.notifier.notify(Notification::failure(
                ClassificationField::Cycle.action_label(),
                err.to_string(),
            ));
            return Err(EditorError::Invalid(err));
        }
        self.save(
            id,
            ClassificationField::Cycle,
            ClassificationPatch::cycle(cycle),
            |previous, confirmed| {
                if cycle.is_none() || !previous.is_strategic {
                    confirmed.category = None;
                    confirmed.subcategory = None;
                }
            },
        )
    }

    /// Sets or clears the category. Clearing also clears the subcategory.
    pub fn set_category(
        &self,
        id: NewsItemId,
        category: Option<String>,
    ) -> Result<NewsItem, EditorError> {
        let clearing = category.is_none();
        self.save(
            id,
            ClassificationField::Category,
            ClassificationPatch::category(category),
            |previous, confirmed| {
                if clearing || !previous.is_strategic {
                    confirmed.subcategory = None;
                }
            },
        )
    }

    /// Sets or clears the subcategory.
    pub fn set_subcategory(
        &self,
        id: NewsItemId,
        subcategory: Option<String>,
    ) -> Result<NewsItem, EditorError> {
        self.save(
            id,
            ClassificationField::Subcategory,
            ClassificationPatch::subcategory(subcategory),
            |_, _| {},
        )
    }

    fn save(
        &self,
        id: NewsItemId,
        field: ClassificationField,
        patch: ClassificationPatch,
        cascade: impl FnOnce(&NewsItem, &mut NewsItem),
    ) -> Result<NewsItem, EditorError> {
        let Some(previous) = self.item(id) else {
            self.notifier.notify(Notification::failure(
                field.action_label(),
                "the news item is no longer loaded",
            ));
            return Err(EditorError::ItemNotFound(id));
        };

        let _saving = SavingGuard::acquire(&self.saving, id, field)
            .ok_or(EditorError::SaveInProgress { id, field })?;
        let item_lock = match self.ordering {
            EditOrdering::PerItem => Some(self.item_lock(id)),
            EditOrdering::LastWriteWins => None,
        };
        let result = {
            let _item_guard = item_lock.as_ref().map(|lock| lock.lock());
            self.send_and_apply(id, field, &patch, &previous, cascade)
        };
        if let Some(lock) = item_lock {
            self.release_item_lock(id, lock);
        }
        result
    }

    fn send_and_apply(
        &self,
        id: NewsItemId,
        field: ClassificationField,
        patch: &ClassificationPatch,
        previous: &NewsItem,
        cascade: impl FnOnce(&NewsItem, &mut NewsItem),
    ) -> Result<NewsItem, EditorError> {
        let mut confirmed = match self.news_repo.update_news_item(id, patch) {
            Ok(confirmed) => confirmed,
            Err(err) => {
                warn!(
                    "event=news_item_update module=editor status=error field={} item_id={id} error={err}",
                    field.wire_name()
                );
                self.notifier
                    .notify(Notification::failure(field.action_label(), err.user_message()));
                return Err(err.into());
            }
        };

        cascade(previous, &mut confirmed);
        if confirmed.clamp_classification() {
            warn!(
                "event=news_item_clamped module=editor status=warn phase=confirm field={} item_id={id}",
                field.wire_name()
            );
        }

        if self
            .store
            .lock()
            .apply_confirmed_update(confirmed.clone())
            .is_none()
        {
            warn!(
                "event=news_item_update module=editor status=warn reason=unloaded_after_save item_id={id}"
            );
        }
        info!(
            "event=news_item_update module=editor status=ok field={} item_id={id}",
            field.wire_name()
        );
        Ok(confirmed)
    }

    fn item_lock(&self, id: NewsItemId) -> Arc<Mutex<()>> {
        self.item_locks
            .lock()
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the per-item lock entry once no other edit holds or waits on it.
    fn release_item_lock(&self, id: NewsItemId, lock: Arc<Mutex<()>>) {
        let mut locks = self.item_locks.lock();
        drop(lock);
        if locks
            .get(&id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&id);
        }
    }

    /// Number of items with a live per-item lock entry.
    #[cfg(test)]
    fn tracked_item_locks(&self) -> usize {
        self.item_locks.lock().len()
    }
}

/// Marks one control as saving until dropped.
struct SavingGuard<'a> {
    saving: &'a Mutex<HashSet<(NewsItemId, ClassificationField)>>,
    key: (NewsItemId, ClassificationField),
}

impl<'a> SavingGuard<'a> {
    fn acquire(
        saving: &'a Mutex<HashSet<(NewsItemId, ClassificationField)>>,
        id: NewsItemId,
        field: ClassificationField,
    ) -> Option<Self> {
        let key = (id, field);
        if !saving.lock().insert(key) {
            return None;
        }
        Some(Self { saving, key })
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.saving.lock().remove(&self.key);
    }
}
