use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::dto::rating::PageRatings;
use crate::error::{Result, StorageError};
use crate::models::{
    CollectionCount, ContentCounts, Criteria, ModelName, RatingKey, RatingPatch, RatingRecord,
    ReportSummary, Scope,
};
use crate::store::{ContentSource, RatingStore};

/// In-process store with the same semantics as the PostgreSQL one,
/// including rejection of keys and ratings the table constraints refuse.
pub struct MemoryStore {
    records: Mutex<Vec<RatingRecord>>,
    summaries: Mutex<Vec<ReportSummary>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            summaries: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }
}

impl MemoryStore {
    /// Makes every following operation fail as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored rating records across every scope.
    pub async fn record_count(&self) -> usize {
        self.records.lock().await.len()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Timeout(Duration::ZERO));
        }
        Ok(())
    }

    /// Appends a summary at the next position of its (report type, model) collection.
    pub async fn insert_summary(
        &self,
        report_type: &str,
        model: ModelName,
        label: &str,
        content: &str,
    ) -> ReportSummary {
        let mut summaries = self.summaries.lock().await;
        let position = summaries
            .iter()
            .filter(|s| s.report_type == report_type && s.model == model)
            .count() as i32
            + 1;

        let summary = ReportSummary {
            summary_id: self.next_id.fetch_add(1, Ordering::Relaxed),
            report_type: report_type.to_string(),
            model,
            position,
            label: label.to_string(),
            explanation: String::new(),
            content: content.to_string(),
        };
        summaries.push(summary.clone());
        summary
    }

    fn matches(record: &RatingRecord, scope: &Scope, report_type: &str) -> bool {
        record.annotator == scope.as_str() && record.report_type == report_type
    }
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn upsert(&self, key: &RatingKey, patch: &RatingPatch) -> Result<RatingRecord> {
        self.check_available()?;
        key.validate()?;
        patch.validate()?;
        let mut records = self.records.lock().await;

        let existing = records.iter_mut().find(|r| {
            Self::matches(r, &key.scope, &key.report_type)
                && r.page == key.page
                && r.model == key.model
        });

        if let Some(record) = existing {
            record.set_criteria(patch.apply(record.criteria()));
            record.updated_at = Utc::now();
            return Ok(record.clone());
        }

        let now = Utc::now();
        let mut record = RatingRecord {
            rating_id: self.next_id.fetch_add(1, Ordering::Relaxed),
            annotator: key.scope.as_str().to_string(),
            page: key.page,
            model: key.model,
            report_type: key.report_type.clone(),
            criterion1_rating: 0,
            criterion2_rating: 0,
            criterion3_rating: 0,
            all_criteria_met: false,
            created_at: now,
            updated_at: now,
        };
        record.set_criteria(patch.apply(Criteria::default()));
        records.push(record.clone());

        Ok(record)
    }

    async fn find_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<PageRatings> {
        self.check_available()?;
        let records = self.records.lock().await;

        Ok(records
            .iter()
            .filter(|r| Self::matches(r, scope, report_type) && r.page == page)
            .cloned()
            .collect())
    }

    async fn count_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<i64> {
        self.check_available()?;
        let records = self.records.lock().await;

        Ok(records
            .iter()
            .filter(|r| Self::matches(r, scope, report_type) && r.page == page)
            .count() as i64)
    }

    async fn count_by_type(&self, scope: &Scope, report_type: &str) -> Result<i64> {
        self.check_available()?;
        let records = self.records.lock().await;

        Ok(records
            .iter()
            .filter(|r| Self::matches(r, scope, report_type))
            .count() as i64)
    }

    async fn count_by_type_where_complete(
        &self,
        scope: &Scope,
        report_type: &str,
    ) -> Result<i64> {
        self.check_available()?;
        let records = self.records.lock().await;

        Ok(records
            .iter()
            .filter(|r| Self::matches(r, scope, report_type) && r.all_criteria_met)
            .count() as i64)
    }
}

#[async_trait]
impl ContentSource for MemoryStore {
    async fn content_counts(&self, report_type: &str) -> Result<ContentCounts> {
        self.check_available()?;
        let summaries = self.summaries.lock().await;

        let mut counts = ContentCounts::default();
        let mut found = false;
        for summary in summaries.iter().filter(|s| s.report_type == report_type) {
            counts.add(summary.model, 1);
            found = true;
        }

        if found {
            Ok(counts)
        } else {
            Err(StorageError::NotFound)
        }
    }

    async fn find_summary(
        &self,
        report_type: &str,
        model: ModelName,
        page: u32,
    ) -> Result<Option<ReportSummary>> {
        self.check_available()?;
        let summaries = self.summaries.lock().await;

        let mut matching: Vec<&ReportSummary> = summaries
            .iter()
            .filter(|s| s.report_type == report_type && s.model == model)
            .collect();
        matching.sort_by_key(|s| (s.position, s.summary_id));

        Ok(matching
            .get(page.saturating_sub(1) as usize)
            .map(|s| (*s).clone()))
    }

    async fn collection_counts(&self) -> Result<Vec<CollectionCount>> {
        self.check_available()?;
        let summaries = self.summaries.lock().await;

        let mut counts: Vec<CollectionCount> = Vec::new();
        for summary in summaries.iter() {
            match counts
                .iter_mut()
                .find(|c| c.report_type == summary.report_type && c.model == summary.model)
            {
                Some(count) => count.count += 1,
                None => counts.push(CollectionCount {
                    report_type: summary.report_type.clone(),
                    model: summary.model,
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| {
            (a.report_type.as_str(), a.model.as_str())
                .cmp(&(b.report_type.as_str(), b.model.as_str()))
        });

        Ok(counts)
    }
}
