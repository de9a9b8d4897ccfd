//! Keyed store of news items for the spreadsheet view.
//!
//! # Responsibility
//! - Hold the last server-confirmed value of every loaded item.
//! - Track which items are visible in the current view and in what order.
//!
//! # Invariants
//! - Every stored item satisfies `NewsItem::validate()`.
//! - Updates replace one item by id; nothing else is rewritten.
//! - `visible` only references ids present in `items`.

use crate::model::news_item::{NewsItem, NewsItemId};
use log::warn;
use std::collections::HashMap;

/// Which rows the spreadsheet currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewFilter {
    #[default]
    All,
    /// Only strategic items; unmarking an item hides it.
    StrategicOnly,
}

/// Id-keyed item store with a visible ordering.
#[derive(Debug, Default)]
pub struct NewsStore {
    items: HashMap<NewsItemId, NewsItem>,
    visible: Vec<NewsItemId>,
    view: ViewFilter,
}

impl NewsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole store with a fresh server load.
    ///
    /// Items breaking the classification cascade are clamped to the nearest
    /// valid state. Duplicate ids keep the first occurrence's position and
    /// the last occurrence's value; visibility follows that last value.
    pub fn load(&mut self, items: Vec<NewsItem>, view: ViewFilter) {
        self.items.clear();
        self.visible.clear();
        self.view = view;

        for mut item in items {
            if item.clamp_classification() {
                warn!(
                    "event=news_item_clamped module=store status=warn phase=load item_id={}",
                    item.id
                );
            }
            let id = item.id;
            if self.items.insert(id, item).is_none() {
                self.visible.push(id);
            }
        }

        if view == ViewFilter::StrategicOnly {
            let items = &self.items;
            self.visible
                .retain(|id| items.get(id).is_some_and(|item| item.is_strategic));
        }
    }

    pub fn view(&self) -> ViewFilter {
        self.view
    }

    pub fn get(&self, id: NewsItemId) -> Option<&NewsItem> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visible items in display order.
    pub fn visible_items(&self) -> Vec<&NewsItem> {
        self.visible
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    pub fn is_visible(&self, id: NewsItemId) -> bool {
        self.visible.contains(&id)
    }

    /// Replaces one item with its server-confirmed value.
    ///
    /// Returns the previous value, or `None` when the id was not loaded (the
    /// item is then ignored).
    pub fn apply_confirmed_update(&mut self, item: NewsItem) -> Option<NewsItem> {
        let slot = self.items.get_mut(&item.id)?;
        Some(std::mem::replace(slot, item))
    }

    /// Removes an item from the visible list; it stays addressable by id.
    pub fn hide(&mut self, id: NewsItemId) -> bool {
        let before = self.visible.len();
        self.visible.retain(|visible_id| *visible_id != id);
        before != self.visible.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &NewsItem> {
        self.items.values()
    }
}
