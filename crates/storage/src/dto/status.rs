use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::validate_report_type;

/// Completion of one page.
///
/// `is_complete` only checks that one record exists per model, whatever the
/// ratings are; it drives the page indicators. `all_criteria_met` additionally
/// requires every criterion of both records to be rated, which is what the
/// type-level submission gate counts. The two can disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageCompletionStatus {
    pub page: i32,
    pub report_type: String,
    pub record_count: i64,
    pub is_complete: bool,
    pub all_criteria_met: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeCompletionStatus {
    pub report_type: String,
    pub total_pages: u32,
    pub all_pages_complete: bool,
    pub completed_evaluation_count: i64,
    pub total_evaluations_submitted: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct TypeStatusPath {
    #[validate(custom(function = "validate_report_type"))]
    pub report_type: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[into_params(parameter_in = Query)]
pub struct TypeStatusQuery {
    /// Number of pages of the report type; looked up from the stored summaries when omitted
    pub total_pages: Option<u32>,
}
