pub mod content;
pub mod rating;

pub use content::{CollectionCount, ContentCounts, ReportSummary};
pub use rating::{
    Criteria, MAX_RATING, MAX_REPORT_TYPE_LEN, MIN_RATING, ModelName, RatingKey, RatingPatch,
    RatingRecord, Scope, UnknownModel, is_valid_report_type,
};
