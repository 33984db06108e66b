use sqlx::{FromRow, PgPool};

use crate::error::{Result, StorageError};
use crate::models::{CollectionCount, ContentCounts, ModelName, ReportSummary};

#[derive(FromRow)]
struct SummaryRow {
    summary_id: i64,
    report_type: String,
    model: String,
    position: i32,
    label: String,
    explanation: String,
    content: String,
}

impl TryFrom<SummaryRow> for ReportSummary {
    type Error = StorageError;

    fn try_from(row: SummaryRow) -> Result<Self> {
        let model = row
            .model
            .parse()
            .map_err(|e| StorageError::Corrupt(format!("summary {}: {}", row.summary_id, e)))?;

        Ok(Self {
            summary_id: row.summary_id,
            report_type: row.report_type,
            model,
            position: row.position,
            label: row.label,
            explanation: row.explanation,
            content: row.content,
        })
    }
}

#[derive(FromRow)]
struct CountRow {
    report_type: String,
    model: String,
    count: i64,
}

/// Repository for the generated report summaries being evaluated
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Summary counts per model for one report type.
    ///
    /// Returns `NotFound` when no summary of any model exists for the type.
    pub async fn content_counts(&self, report_type: &str) -> Result<ContentCounts> {
        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT report_type, model, COUNT(*) AS count
            FROM report_summaries
            WHERE report_type = $1
            GROUP BY report_type, model
            "#,
        )
        .bind(report_type)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Err(StorageError::NotFound);
        }

        let mut counts = ContentCounts::default();
        for row in rows {
            let model: ModelName = row
                .model
                .parse()
                .map_err(|e| StorageError::Corrupt(format!("{}", e)))?;
            counts.add(model, row.count);
        }

        Ok(counts)
    }

    /// The summary shown on `page` for one model, skipping `page - 1` summaries.
    pub async fn find_summary(
        &self,
        report_type: &str,
        model: ModelName,
        page: u32,
    ) -> Result<Option<ReportSummary>> {
        let offset = i64::from(page.saturating_sub(1));

        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT summary_id, report_type, model, position, label, explanation, content
            FROM report_summaries
            WHERE report_type = $1 AND model = $2
            ORDER BY position, summary_id
            LIMIT 1 OFFSET $3
            "#,
        )
        .bind(report_type)
        .bind(model.as_str())
        .bind(offset)
        .fetch_optional(self.pool)
        .await?;

        row.map(ReportSummary::try_from).transpose()
    }

    pub async fn collection_counts(&self) -> Result<Vec<CollectionCount>> {
        let rows = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT report_type, model, COUNT(*) AS count
            FROM report_summaries
            GROUP BY report_type, model
            ORDER BY report_type, model
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<CollectionCount> {
                let model = row
                    .model
                    .parse()
                    .map_err(|e| StorageError::Corrupt(format!("{}", e)))?;
                Ok(CollectionCount {
                    report_type: row.report_type,
                    model,
                    count: row.count,
                })
            })
            .collect()
    }
}
