use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::validate_report_type;
use crate::models::ReportSummary;

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct ReportPath {
    #[validate(custom(function = "validate_report_type"))]
    pub report_type: String,

    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: u32,
}

/// The two generated summaries shown side by side on one page
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub mistral: Option<ReportSummary>,
    pub deepseek: Option<ReportSummary>,
    pub total_pages: u32,
    pub current_page: u32,
}

impl ReportPage {
    pub fn empty(current_page: u32) -> Self {
        Self {
            mistral: None,
            deepseek: None,
            total_pages: 0,
            current_page,
        }
    }
}
