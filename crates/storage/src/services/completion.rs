use crate::dto::rating::{PageRatings, SavedRating};
use crate::dto::status::{PageCompletionStatus, TypeCompletionStatus};
use crate::error::{Result, StorageError};
use crate::models::{ModelName, RatingKey, RatingPatch, Scope};
use crate::store::{ContentSource, RatingStore};

/// A report type is complete once every page carries a fully rated record
/// for every model. A type without pages is never complete.
pub fn type_is_complete(total_pages: u32, completed_evaluation_count: i64) -> bool {
    total_pages > 0
        && completed_evaluation_count == i64::from(total_pages) * ModelName::expected_per_page()
}

/// Derives page and report-type completion from the stored ratings.
pub struct CompletionEvaluator<'a> {
    ratings: &'a dyn RatingStore,
    content: &'a dyn ContentSource,
}

impl<'a> CompletionEvaluator<'a> {
    pub fn new(ratings: &'a dyn RatingStore, content: &'a dyn ContentSource) -> Self {
        Self { ratings, content }
    }

    /// Upserts one rating and returns it together with the refreshed page status.
    ///
    /// Out-of-range input fails with `StorageError::Invalid` before the store is touched.
    pub async fn save_rating(&self, key: &RatingKey, patch: &RatingPatch) -> Result<SavedRating> {
        key.validate()?;
        patch.validate()?;

        let record = self.ratings.upsert(key, patch).await?;
        tracing::debug!(
            page = key.page,
            model = %key.model,
            report_type = %key.report_type,
            all_criteria_met = record.all_criteria_met,
            "Rating saved"
        );

        let page_status = self
            .page_status(&key.scope, key.page, &key.report_type)
            .await?;

        Ok(SavedRating {
            record,
            page_status,
        })
    }

    pub async fn page_ratings(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<PageRatings> {
        self.ratings
            .find_by_page_and_type(scope, page, report_type)
            .await
    }

    /// True when exactly one record per model exists, regardless of the ratings they hold.
    pub async fn page_is_complete(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<bool> {
        let count = self
            .ratings
            .count_by_page_and_type(scope, page, report_type)
            .await?;
        Ok(count == ModelName::expected_per_page())
    }

    pub async fn page_status(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<PageCompletionStatus> {
        let ratings = self
            .ratings
            .find_by_page_and_type(scope, page, report_type)
            .await?;
        let record_count = ratings.record_count();

        Ok(PageCompletionStatus {
            page,
            report_type: report_type.to_string(),
            record_count,
            is_complete: record_count == ModelName::expected_per_page(),
            all_criteria_met: ratings.fully_rated(),
        })
    }

    /// Page count to judge a type against: the caller's value when given,
    /// otherwise the size of the larger summary collection. Unknown types have 0 pages.
    pub async fn resolve_total_pages(
        &self,
        report_type: &str,
        requested: Option<u32>,
    ) -> Result<u32> {
        if let Some(total_pages) = requested {
            return Ok(total_pages);
        }

        match self.content.content_counts(report_type).await {
            Ok(counts) => Ok(counts.total_pages()),
            Err(StorageError::NotFound) => {
                tracing::debug!(report_type, "No summaries for report type, treating as empty");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn type_status(
        &self,
        scope: &Scope,
        report_type: &str,
        total_pages: u32,
    ) -> Result<TypeCompletionStatus> {
        let completed_evaluation_count = self
            .ratings
            .count_by_type_where_complete(scope, report_type)
            .await?;
        let total_evaluations_submitted = self.ratings.count_by_type(scope, report_type).await?;

        Ok(TypeCompletionStatus {
            report_type: report_type.to_string(),
            total_pages,
            all_pages_complete: type_is_complete(total_pages, completed_evaluation_count),
            completed_evaluation_count,
            total_evaluations_submitted,
        })
    }
}
