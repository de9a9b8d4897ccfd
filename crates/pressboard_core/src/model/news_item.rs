//! News item model and strategic classification cascade.
//!
//! # Responsibility
//! - Define the ingested article record as exchanged with the press API.
//! - Define the partial-update body used by the classification editor.
//!
//! # Invariants
//! - `is_strategic == false` implies cycle, category and subcategory are unset.
//! - `cycle == None` implies category and subcategory are unset.
//! - `category == None` implies subcategory is unset.
//! - Items are created and deleted by ingestion, never by this crate.

use crate::model::sentiment::Sentiment;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned by the remote store.
pub type NewsItemId = Uuid;

/// One ingested article row.
///
/// Only the classification fields are edited client-side; the rest is
/// carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: NewsItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Source portal display name.
    #[serde(default)]
    pub portal: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    /// Publication timestamp as sent by the API (not interpreted).
    #[serde(default)]
    pub published_at: Option<String>,
    /// Reporting cycle. Positive when set.
    #[serde(default)]
    pub cycle: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Gates whether the three classification fields may be set.
    #[serde(default)]
    pub is_strategic: bool,
}

impl NewsItem {
    /// Creates an unclassified item. Used by fixtures and import paths.
    pub fn new(id: NewsItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: None,
            portal: None,
            sentiment: None,
            published_at: None,
            cycle: None,
            category: None,
            subcategory: None,
            is_strategic: false,
        }
    }

    /// Checks the classification cascade.
    ///
    /// # Errors
    /// - `NonPositiveCycle` when `cycle == Some(0)`.
    /// - `ClassifiedWhileUnmarked`, `CategoryWithoutCycle`,
    ///   `SubcategoryWithoutCategory` for broken cascades.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cycle == Some(0) {
            return Err(ValidationError::NonPositiveCycle);
        }
        if !self.is_strategic
            && (self.cycle.is_some() || self.category.is_some() || self.subcategory.is_some())
        {
            return Err(ValidationError::ClassifiedWhileUnmarked);
        }
        if self.cycle.is_none() && self.category.is_some() {
            return Err(ValidationError::CategoryWithoutCycle);
        }
        if self.category.is_none() && self.subcategory.is_some() {
            return Err(ValidationError::SubcategoryWithoutCategory);
        }
        Ok(())
    }

    /// Moves the item to the nearest state satisfying `validate()`.
    ///
    /// Children of an unset parent are dropped; the strategic flag itself is
    /// never changed. Returns `true` when any field was cleared.
    pub fn clamp_classification(&mut self) -> bool {
        let before = (
            self.cycle,
            self.category.is_some(),
            self.subcategory.is_some(),
        );

        if !self.is_strategic || self.cycle == Some(0) {
            self.cycle = None;
        }
        if self.cycle.is_none() {
            self.category = None;
        }
        if self.category.is_none() {
            self.subcategory = None;
        }

        before
            != (
                self.cycle,
                self.category.is_some(),
                self.subcategory.is_some(),
            )
    }
}

/// Editable classification fields, one per editor control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassificationField {
    Strategic,
    Cycle,
    Category,
    Subcategory,
}

impl ClassificationField {
    /// Wire name of the field.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Strategic => "isStrategic",
            Self::Cycle => "cycle",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
        }
    }

    /// Human-readable action name used in failure notifications.
    pub fn action_label(self) -> &'static str {
        match self {
            Self::Strategic => "strategic flag",
            Self::Cycle => "cycle",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
        }
    }
}

/// Partial update body for `PUT /news-items/{id}`.
///
/// Outer `None` omits the field from the body; `Some(None)` sends `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_strategic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Option<String>>,
}

impl ClassificationPatch {
    /// Strategic toggle. Unmarking also clears all three children.
    pub fn strategic(checked: bool) -> Self {
        if checked {
            Self {
                is_strategic: Some(true),
                ..Self::default()
            }
        } else {
            Self {
                is_strategic: Some(false),
                cycle: Some(None),
                category: Some(None),
                subcategory: Some(None),
            }
        }
    }

    /// Cycle edit. Clearing the cycle also clears category and subcategory.
    pub fn cycle(value: Option<u32>) -> Self {
        match value {
            Some(cycle) => Self {
                cycle: Some(Some(cycle)),
                ..Self::default()
            },
            None => Self {
                cycle: Some(None),
                category: Some(None),
                subcategory: Some(None),
                ..Self::default()
            },
        }
    }

    /// Category edit. Clearing the category also clears the subcategory.
    pub fn category(value: Option<String>) -> Self {
        match value {
            Some(category) => Self {
                category: Some(Some(category)),
                ..Self::default()
            },
            None => Self {
                category: Some(None),
                subcategory: Some(None),
                ..Self::default()
            },
        }
    }

    /// Subcategory edit. Leaf field, no cascade.
    pub fn subcategory(value: Option<String>) -> Self {
        Self {
            subcategory: Some(value),
            ..Self::default()
        }
    }

    /// Writes every present field into `item`.
    pub fn apply_to(&self, item: &mut NewsItem) {
        if let Some(value) = self.is_strategic {
            item.is_strategic = value;
        }
        if let Some(value) = self.cycle {
            item.cycle = value;
        }
        if let Some(value) = self.category.as_ref() {
            item.category = value.clone();
        }
        if let Some(value) = self.subcategory.as_ref() {
            item.subcategory = value.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassificationPatch, NewsItem};
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    fn classified() -> NewsItem {
        let mut item = NewsItem::new(Uuid::new_v4(), "title");
        item.is_strategic = true;
        item.cycle = Some(3);
        item.category = Some("Educação".to_string());
        item.subcategory = Some("Escolas".to_string());
        item
    }

    #[test]
    fn validate_rejects_broken_cascades() {
        let mut item = classified();
        item.is_strategic = false;
        assert_eq!(
            item.validate(),
            Err(ValidationError::ClassifiedWhileUnmarked)
        );

        let mut item = classified();
        item.cycle = None;
        assert_eq!(item.validate(), Err(ValidationError::CategoryWithoutCycle));

        let mut item = classified();
        item.category = None;
        assert_eq!(
            item.validate(),
            Err(ValidationError::SubcategoryWithoutCategory)
        );

        let mut item = classified();
        item.cycle = Some(0);
        assert_eq!(item.validate(), Err(ValidationError::NonPositiveCycle));
    }

    #[test]
    fn clamp_drops_orphaned_children_only() {
        let mut item = classified();
        item.category = None;
        assert!(item.clamp_classification());
        assert_eq!(item.cycle, Some(3));
        assert_eq!(item.subcategory, None);
        assert!(item.validate().is_ok());

        let mut untouched = classified();
        assert!(!untouched.clamp_classification());
    }

    #[test]
    fn clamp_clears_everything_on_unmarked_item() {
        let mut item = classified();
        item.is_strategic = false;
        assert!(item.clamp_classification());
        assert_eq!(
            (item.cycle, item.category, item.subcategory),
            (None, None, None)
        );
    }

    #[test]
    fn unmark_patch_carries_all_four_fields() {
        let json = serde_json::to_value(ClassificationPatch::strategic(false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isStrategic": false,
                "cycle": null,
                "category": null,
                "subcategory": null
            })
        );
    }

    #[test]
    fn mark_patch_carries_only_the_flag() {
        let json = serde_json::to_value(ClassificationPatch::strategic(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "isStrategic": true }));
    }

    #[test]
    fn subcategory_patch_never_cascades() {
        let json = serde_json::to_value(ClassificationPatch::subcategory(None)).unwrap();
        assert_eq!(json, serde_json::json!({ "subcategory": null }));
    }

    #[test]
    fn apply_to_only_touches_present_fields() {
        let mut item = classified();
        ClassificationPatch::category(Some("Saúde".to_string())).apply_to(&mut item);
        assert_eq!(item.category.as_deref(), Some("Saúde"));
        assert_eq!(item.subcategory.as_deref(), Some("Escolas"));
        assert_eq!(item.cycle, Some(3));
    }
}
