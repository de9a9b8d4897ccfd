//! Strategic week reference records.
//!
//! # Responsibility
//! - Define the `(cycle -> category -> subcategory)` vocabulary records.
//! - Validate create requests before they reach the API.
//!
//! # Invariants
//! - `start_date <= end_date`.
//! - `cycle > 0`; category and subcategory are non-blank.

use crate::model::date_range::{api_date, DateRange};
use crate::model::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type StrategicWeekId = Uuid;

/// Server-defined reporting week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicWeek {
    pub id: StrategicWeekId,
    #[serde(with = "api_date")]
    pub start_date: NaiveDate,
    #[serde(with = "api_date")]
    pub end_date: NaiveDate,
    pub cycle: u32,
    pub category: String,
    pub subcategory: String,
}

impl StrategicWeek {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Body for `POST /strategic-weeks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStrategicWeek {
    #[serde(with = "api_date")]
    pub start_date: NaiveDate,
    #[serde(with = "api_date")]
    pub end_date: NaiveDate,
    pub cycle: u32,
    pub category: String,
    pub subcategory: String,
}

impl NewStrategicWeek {
    /// Returns a trimmed copy, or the first violated invariant.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if self.end_date < self.start_date {
            return Err(ValidationError::ReversedDateRange);
        }
        if self.cycle == 0 {
            return Err(ValidationError::NonPositiveCycle);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::BlankField("category"));
        }
        let subcategory = self.subcategory.trim();
        if subcategory.is_empty() {
            return Err(ValidationError::BlankField("subcategory"));
        }
        Ok(Self {
            start_date: self.start_date,
            end_date: self.end_date,
            cycle: self.cycle,
            category: category.to_string(),
            subcategory: subcategory.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NewStrategicWeek, StrategicWeek};
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;

    fn request() -> NewStrategicWeek {
        NewStrategicWeek {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
            cycle: 1,
            category: " Social ".to_string(),
            subcategory: "Habitação".to_string(),
        }
    }

    #[test]
    fn normalized_trims_labels() {
        let normalized = request().normalized().unwrap();
        assert_eq!(normalized.category, "Social");
    }

    #[test]
    fn normalized_rejects_invalid_requests() {
        let mut reversed = request();
        std::mem::swap(&mut reversed.start_date, &mut reversed.end_date);
        assert_eq!(
            reversed.normalized(),
            Err(ValidationError::ReversedDateRange)
        );

        let mut blank = request();
        blank.subcategory = "   ".to_string();
        assert_eq!(
            blank.normalized(),
            Err(ValidationError::BlankField("subcategory"))
        );

        let mut zero = request();
        zero.cycle = 0;
        assert_eq!(zero.normalized(), Err(ValidationError::NonPositiveCycle));
    }

    #[test]
    fn deserializes_wire_shape_with_timestamp_dates() {
        let week: StrategicWeek = serde_json::from_value(serde_json::json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "startDate": "2024-05-06T00:00:00.000Z",
            "endDate": "2024-05-12",
            "cycle": 2,
            "category": "Saúde",
            "subcategory": "Postos"
        }))
        .unwrap();
        assert_eq!(week.cycle, 2);
        assert_eq!(week.range().start, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());

        let json = serde_json::to_value(&week).unwrap();
        assert_eq!(json["startDate"], "2024-05-06");
    }
}
