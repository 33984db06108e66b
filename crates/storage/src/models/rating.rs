use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::{self, StorageError};

pub const MIN_RATING: i16 = 0;
pub const MAX_RATING: i16 = 5;
pub const MAX_REPORT_TYPE_LEN: usize = 64;

/// Report types are short slugs such as `advanced` or `non-invasive`.
pub fn is_valid_report_type(report_type: &str) -> bool {
    !report_type.is_empty()
        && report_type.len() <= MAX_REPORT_TYPE_LEN
        && report_type
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Source of a generated summary that annotators rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    Mistral,
    Deepseek,
}

impl ModelName {
    /// Every model a page needs a rating for before it counts as evaluated.
    pub const ALL: [ModelName; 2] = [ModelName::Mistral, ModelName::Deepseek];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mistral => "mistral",
            Self::Deepseek => "deepseek",
        }
    }

    /// Number of records a fully evaluated page holds.
    pub fn expected_per_page() -> i64 {
        Self::ALL.len() as i64
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown model '{0}'")]
pub struct UnknownModel(pub String);

impl FromStr for ModelName {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

/// Annotator identity that ratings are confined to.
///
/// The anonymous scope is stored as an empty string so that the uniqueness
/// constraint on `(annotator, page, model, report_type)` also holds for
/// ratings submitted without an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scope(String);

impl Scope {
    pub fn anonymous() -> Self {
        Self(String::new())
    }

    pub fn annotator(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifies exactly one rating record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatingKey {
    pub scope: Scope,
    pub page: i32,
    pub model: ModelName,
    pub report_type: String,
}

impl RatingKey {
    pub fn validate(&self) -> error::Result<()> {
        if self.page < 1 {
            return Err(StorageError::invalid(
                "page",
                format!("page must be a positive integer, got {}", self.page),
            ));
        }
        if !is_valid_report_type(&self.report_type) {
            return Err(StorageError::invalid(
                "report_type",
                "report type must be 1-64 lowercase letters, digits, '-' or '_'",
            ));
        }
        Ok(())
    }
}

/// The three criterion ratings of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Criteria {
    pub criterion1: i16,
    pub criterion2: i16,
    pub criterion3: i16,
}

impl Criteria {
    pub fn new(criterion1: i16, criterion2: i16, criterion3: i16) -> Self {
        Self {
            criterion1,
            criterion2,
            criterion3,
        }
    }

    /// A criterion counts as met once it carries any rating above zero.
    pub fn all_met(&self) -> bool {
        self.criterion1 > 0 && self.criterion2 > 0 && self.criterion3 > 0
    }
}

/// Partial rating write. `None` leaves the stored value alone on update and
/// falls back to 0 when the record is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingPatch {
    pub criterion1: Option<i16>,
    pub criterion2: Option<i16>,
    pub criterion3: Option<i16>,
}

impl RatingPatch {
    pub fn apply(&self, current: Criteria) -> Criteria {
        Criteria {
            criterion1: self.criterion1.unwrap_or(current.criterion1),
            criterion2: self.criterion2.unwrap_or(current.criterion2),
            criterion3: self.criterion3.unwrap_or(current.criterion3),
        }
    }

    /// Rejects the first criterion outside `MIN_RATING..=MAX_RATING`.
    pub fn validate(&self) -> error::Result<()> {
        let fields = [
            ("criterion1", self.criterion1),
            ("criterion2", self.criterion2),
            ("criterion3", self.criterion3),
        ];
        for (field, rating) in fields {
            if let Some(rating) = rating.filter(|r| !(MIN_RATING..=MAX_RATING).contains(r)) {
                return Err(StorageError::invalid(
                    field,
                    format!("rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub rating_id: i64,
    pub annotator: String,
    pub page: i32,
    pub model: ModelName,
    pub report_type: String,
    pub criterion1_rating: i16,
    pub criterion2_rating: i16,
    pub criterion3_rating: i16,
    pub all_criteria_met: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RatingRecord {
    pub fn criteria(&self) -> Criteria {
        Criteria::new(
            self.criterion1_rating,
            self.criterion2_rating,
            self.criterion3_rating,
        )
    }

    /// Overwrites the ratings and recomputes `all_criteria_met` with them.
    pub fn set_criteria(&mut self, criteria: Criteria) {
        self.criterion1_rating = criteria.criterion1;
        self.criterion2_rating = criteria.criterion2;
        self.criterion3_rating = criteria.criterion3;
        self.all_criteria_met = criteria.all_met();
    }
}
