//! Strategic vocabulary derived from the strategic week reference set.
//!
//! # Responsibility
//! - Offer the valid `(cycle -> category -> subcategory)` options for the
//!   classification selects.
//!
//! # Invariants
//! - Options are derived from the current week set on every call; there is
//!   no cached projection that could outlive a reload.
//! - `cycles()` is sorted ascending; categories and subcategories keep
//!   first-seen order.

use crate::model::news_item::NewsItem;
use crate::model::strategic_week::StrategicWeek;
use std::collections::{BTreeSet, HashSet};

/// Read-only reference set for one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategicVocabulary {
    weeks: Vec<StrategicWeek>,
}

/// Stored classification value missing from the current vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyMismatch {
    Cycle(u32),
    Category {
        cycle: u32,
        category: String,
    },
    Subcategory {
        cycle: u32,
        category: String,
        subcategory: String,
    },
}

impl StrategicVocabulary {
    pub fn new(weeks: Vec<StrategicWeek>) -> Self {
        Self { weeks }
    }

    pub fn weeks(&self) -> &[StrategicWeek] {
        &self.weeks
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Distinct cycles, ascending.
    pub fn cycles(&self) -> Vec<u32> {
        self.weeks
            .iter()
            .map(|week| week.cycle)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct categories offered for `cycle`; empty for unknown cycles.
    pub fn categories(&self, cycle: u32) -> Vec<String> {
        distinct(
            self.weeks
                .iter()
                .filter(|week| week.cycle == cycle)
                .map(|week| week.category.as_str()),
        )
    }

    /// Distinct subcategories offered for `(cycle, category)`.
    pub fn subcategories(&self, cycle: u32, category: &str) -> Vec<String> {
        distinct(
            self.weeks
                .iter()
                .filter(|week| week.cycle == cycle && week.category == category)
                .map(|week| week.subcategory.as_str()),
        )
    }

    /// Reports the highest-level stored value the vocabulary does not offer.
    ///
    /// Unclassified levels are never reported.
    pub fn mismatch(&self, item: &NewsItem) -> Option<VocabularyMismatch> {
        let cycle = item.cycle?;
        if !self.weeks.iter().any(|week| week.cycle == cycle) {
            return Some(VocabularyMismatch::Cycle(cycle));
        }

        let category = item.category.as_deref()?;
        if !self
            .weeks
            .iter()
            .any(|week| week.cycle == cycle && week.category == category)
        {
            return Some(VocabularyMismatch::Category {
                cycle,
                category: category.to_string(),
            });
        }

        let subcategory = item.subcategory.as_deref()?;
        if !self.weeks.iter().any(|week| {
            week.cycle == cycle && week.category == category && week.subcategory == subcategory
        }) {
            return Some(VocabularyMismatch::Subcategory {
                cycle,
                category: category.to_string(),
                subcategory: subcategory.to_string(),
            });
        }

        None
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
