//! Model validation errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Invariant violation detected by a model `validate()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Cycle numbers are positive integers.
    NonPositiveCycle,
    /// A classification field is set while the item is not strategic.
    ClassifiedWhileUnmarked,
    /// Category is set without a cycle.
    CategoryWithoutCycle,
    /// Subcategory is set without a category.
    SubcategoryWithoutCategory,
    /// A required text field is blank after trim.
    BlankField(&'static str),
    /// Date range ends before it starts.
    ReversedDateRange,
    /// Date text does not match any accepted format.
    InvalidDate(String),
    /// URL is not an absolute http(s) URL.
    InvalidUrl(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveCycle => write!(f, "cycle must be a positive integer"),
            Self::ClassifiedWhileUnmarked => {
                write!(f, "cycle/category/subcategory require isStrategic=true")
            }
            Self::CategoryWithoutCycle => write!(f, "category requires a cycle"),
            Self::SubcategoryWithoutCategory => write!(f, "subcategory requires a category"),
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::ReversedDateRange => write!(f, "endDate must not be earlier than startDate"),
            Self::InvalidDate(value) => write!(
                f,
                "invalid date `{value}`; expected YYYY-MM-DD, ISO timestamp or DD/MM/YYYY"
            ),
            Self::InvalidUrl(value) => write!(f, "invalid http(s) url `{value}`"),
        }
    }
}

impl Error for ValidationError {}
