use std::future::Future;

use async_trait::async_trait;

use crate::Database;
use crate::dto::rating::PageRatings;
use crate::dto::report::ReportPage;
use crate::error::{Result, StorageError};
use crate::models::{
    CollectionCount, ContentCounts, ModelName, RatingKey, RatingPatch, RatingRecord,
    ReportSummary, Scope,
};
use crate::repository::content::ContentRepository;
use crate::repository::rating::RatingRepository;

/// Persistence of rating records, one per (scope, page, model, report type).
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Create the record for `key` or update it in place.
    ///
    /// Implementations recompute `all_criteria_met` as part of the same write
    /// and never create a second record for an existing key.
    async fn upsert(&self, key: &RatingKey, patch: &RatingPatch) -> Result<RatingRecord>;

    async fn find_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<PageRatings>;

    async fn count_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<i64>;

    async fn count_by_type(&self, scope: &Scope, report_type: &str) -> Result<i64>;

    async fn count_by_type_where_complete(&self, scope: &Scope, report_type: &str)
    -> Result<i64>;
}

/// Read access to the generated summaries that get rated.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// `NotFound` when the report type has no summaries at all.
    async fn content_counts(&self, report_type: &str) -> Result<ContentCounts>;

    async fn find_summary(
        &self,
        report_type: &str,
        model: ModelName,
        page: u32,
    ) -> Result<Option<ReportSummary>>;

    async fn collection_counts(&self) -> Result<Vec<CollectionCount>>;

    /// Both summaries of one page, paginated one summary per page.
    async fn fetch_page(&self, report_type: &str, page: u32) -> Result<ReportPage> {
        let counts = match self.content_counts(report_type).await {
            Ok(counts) => counts,
            Err(StorageError::NotFound) => return Ok(ReportPage::empty(page)),
            Err(e) => return Err(e),
        };

        let (mistral, deepseek) = tokio::try_join!(
            self.find_summary(report_type, ModelName::Mistral, page),
            self.find_summary(report_type, ModelName::Deepseek, page),
        )?;

        Ok(ReportPage {
            mistral,
            deepseek,
            total_pages: counts.total_pages(),
            current_page: page,
        })
    }
}

impl Database {
    /// Runs one store operation under the configured timeout.
    async fn bounded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        let limit = self.operation_timeout();
        tokio::time::timeout(limit, operation)
            .await
            .map_err(|_| StorageError::Timeout(limit))?
    }
}

#[async_trait]
impl RatingStore for Database {
    async fn upsert(&self, key: &RatingKey, patch: &RatingPatch) -> Result<RatingRecord> {
        self.bounded(RatingRepository::new(self.pool()).upsert(key, patch))
            .await
    }

    async fn find_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<PageRatings> {
        self.bounded(RatingRepository::new(self.pool()).find_by_page_and_type(
            scope,
            page,
            report_type,
        ))
        .await
    }

    async fn count_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<i64> {
        self.bounded(RatingRepository::new(self.pool()).count_by_page_and_type(
            scope,
            page,
            report_type,
        ))
        .await
    }

    async fn count_by_type(&self, scope: &Scope, report_type: &str) -> Result<i64> {
        self.bounded(RatingRepository::new(self.pool()).count_by_type(scope, report_type))
            .await
    }

    async fn count_by_type_where_complete(
        &self,
        scope: &Scope,
        report_type: &str,
    ) -> Result<i64> {
        self.bounded(
            RatingRepository::new(self.pool()).count_by_type_where_complete(scope, report_type),
        )
        .await
    }
}

#[async_trait]
impl ContentSource for Database {
    async fn content_counts(&self, report_type: &str) -> Result<ContentCounts> {
        self.bounded(ContentRepository::new(self.pool()).content_counts(report_type))
            .await
    }

    async fn find_summary(
        &self,
        report_type: &str,
        model: ModelName,
        page: u32,
    ) -> Result<Option<ReportSummary>> {
        self.bounded(ContentRepository::new(self.pool()).find_summary(report_type, model, page))
            .await
    }

    async fn collection_counts(&self) -> Result<Vec<CollectionCount>> {
        self.bounded(ContentRepository::new(self.pool()).collection_counts())
            .await
    }
}
