use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use super::common::{field_error, validate_model, validate_report_type};
use super::status::PageCompletionStatus;
use crate::models::{
    MAX_RATING, MIN_RATING, ModelName, RatingKey, RatingPatch, RatingRecord, Scope,
};

/// Path segments addressing one rating record
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct RatingPath {
    /// Page (report index) within the report type, starting at 1
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: i32,

    /// Model whose summary is being rated
    #[validate(custom(function = "validate_model"))]
    pub model: String,

    /// Report type, e.g. `advanced` or `non-invasive`
    #[validate(custom(function = "validate_report_type"))]
    pub report_type: String,
}

impl RatingPath {
    pub fn into_key(self, scope: Scope) -> Result<RatingKey, ValidationErrors> {
        self.validate()?;

        let model = self
            .model
            .parse::<ModelName>()
            .map_err(|e| field_error("model", "unknown_model", e.to_string()))?;

        Ok(RatingKey {
            scope,
            page: self.page,
            model,
            report_type: self.report_type,
        })
    }
}

/// Path segments addressing every record of one page
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct PagePath {
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: i32,

    #[validate(custom(function = "validate_report_type"))]
    pub report_type: String,
}

/// Request payload for rating one (page, model, report type).
///
/// Any subset of the criteria may be sent; omitted criteria keep their stored
/// value, or start at 0 when the record does not exist yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertRatingRequest {
    #[validate(range(
        min = MIN_RATING,
        max = MAX_RATING,
        message = "rating must be between 0 and 5"
    ))]
    pub criterion1: Option<i16>,

    #[validate(range(
        min = MIN_RATING,
        max = MAX_RATING,
        message = "rating must be between 0 and 5"
    ))]
    pub criterion2: Option<i16>,

    #[validate(range(
        min = MIN_RATING,
        max = MAX_RATING,
        message = "rating must be between 0 and 5"
    ))]
    pub criterion3: Option<i16>,
}

impl From<&UpsertRatingRequest> for RatingPatch {
    fn from(req: &UpsertRatingRequest) -> Self {
        Self {
            criterion1: req.criterion1,
            criterion2: req.criterion2,
            criterion3: req.criterion3,
        }
    }
}

/// Stored ratings of one page, one slot per model
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PageRatings {
    pub mistral: Option<RatingRecord>,
    pub deepseek: Option<RatingRecord>,
}

impl PageRatings {
    pub fn insert(&mut self, record: RatingRecord) {
        match record.model {
            ModelName::Mistral => self.mistral = Some(record),
            ModelName::Deepseek => self.deepseek = Some(record),
        }
    }

    pub fn get(&self, model: ModelName) -> Option<&RatingRecord> {
        match model {
            ModelName::Mistral => self.mistral.as_ref(),
            ModelName::Deepseek => self.deepseek.as_ref(),
        }
    }

    /// Number of models holding a record.
    pub fn record_count(&self) -> i64 {
        ModelName::ALL
            .iter()
            .filter(|model| self.get(**model).is_some())
            .count() as i64
    }

    /// True when every model has a record and each has all criteria met.
    pub fn fully_rated(&self) -> bool {
        ModelName::ALL
            .iter()
            .all(|model| self.get(*model).is_some_and(|r| r.all_criteria_met))
    }
}

impl FromIterator<RatingRecord> for PageRatings {
    fn from_iter<I: IntoIterator<Item = RatingRecord>>(iter: I) -> Self {
        let mut ratings = Self::default();
        for record in iter {
            ratings.insert(record);
        }
        ratings
    }
}

/// Response of a rating write: the stored record plus the page status it produced
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedRating {
    pub record: RatingRecord,
    pub page_status: PageCompletionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(page: i32, model: &str, report_type: &str) -> RatingPath {
        RatingPath {
            page,
            model: model.to_string(),
            report_type: report_type.to_string(),
        }
    }

    #[test]
    fn test_valid_path_becomes_key() {
        let key = path(3, "deepseek", "advanced")
            .into_key(Scope::anonymous())
            .unwrap();
        assert_eq!(key.page, 3);
        assert_eq!(key.model, ModelName::Deepseek);
        assert_eq!(key.report_type, "advanced");
    }

    #[test]
    fn test_non_positive_page_names_page() {
        let errors = path(0, "mistral", "advanced")
            .into_key(Scope::anonymous())
            .unwrap_err();
        assert!(errors.field_errors().contains_key("page"));
    }

    #[test]
    fn test_unknown_model_names_model() {
        let errors = path(1, "gpt4", "advanced")
            .into_key(Scope::anonymous())
            .unwrap_err();
        assert!(errors.field_errors().contains_key("model"));
    }

    #[test]
    fn test_out_of_range_rating_names_criterion() {
        let req = UpsertRatingRequest {
            criterion1: Some(3),
            criterion2: Some(6),
            criterion3: Some(-1),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(!fields.contains_key("criterion1"));
        assert!(fields.contains_key("criterion2"));
        assert!(fields.contains_key("criterion3"));
    }

    #[test]
    fn test_unknown_body_fields_are_rejected() {
        let parsed = serde_json::from_str::<UpsertRatingRequest>(
            r#"{"criterion1": 2, "all_criteria_met": true}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_partial_body_is_accepted() {
        let req: UpsertRatingRequest = serde_json::from_str(r#"{"criterion3": 4}"#).unwrap();
        assert!(req.validate().is_ok());
        let patch = RatingPatch::from(&req);
        assert_eq!(patch.criterion1, None);
        assert_eq!(patch.criterion3, Some(4));
    }
}
