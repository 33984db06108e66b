use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::dto::rating::PageRatings;
use crate::error::{Result, StorageError};
use crate::models::{RatingKey, RatingPatch, RatingRecord, Scope};

#[derive(FromRow)]
struct RatingRow {
    rating_id: i64,
    annotator: String,
    page: i32,
    model: String,
    report_type: String,
    criterion1_rating: i16,
    criterion2_rating: i16,
    criterion3_rating: i16,
    all_criteria_met: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RatingRow> for RatingRecord {
    type Error = StorageError;

    fn try_from(row: RatingRow) -> Result<Self> {
        let model = row
            .model
            .parse()
            .map_err(|e| StorageError::Corrupt(format!("rating {}: {}", row.rating_id, e)))?;

        Ok(Self {
            rating_id: row.rating_id,
            annotator: row.annotator,
            page: row.page,
            model,
            report_type: row.report_type,
            criterion1_rating: row.criterion1_rating,
            criterion2_rating: row.criterion2_rating,
            criterion3_rating: row.criterion3_rating,
            all_criteria_met: row.all_criteria_met,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for rating_records database operations
pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update the record for `key` in a single statement.
    ///
    /// `all_criteria_met` is a generated column, so the returned row always
    /// carries the flag computed from the ratings that were just written.
    pub async fn upsert(&self, key: &RatingKey, patch: &RatingPatch) -> Result<RatingRecord> {
        key.validate()?;
        patch.validate()?;

        let row = sqlx::query_as::<_, RatingRow>(
            r#"
            INSERT INTO rating_records (
                annotator, page, model, report_type,
                criterion1_rating, criterion2_rating, criterion3_rating
            )
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 0), COALESCE($7, 0))
            ON CONFLICT (annotator, page, model, report_type) DO UPDATE
            SET
                criterion1_rating = COALESCE($5, rating_records.criterion1_rating),
                criterion2_rating = COALESCE($6, rating_records.criterion2_rating),
                criterion3_rating = COALESCE($7, rating_records.criterion3_rating),
                updated_at = now()
            RETURNING rating_id, annotator, page, model, report_type,
                      criterion1_rating, criterion2_rating, criterion3_rating,
                      all_criteria_met, created_at, updated_at
            "#,
        )
        .bind(key.scope.as_str())
        .bind(key.page)
        .bind(key.model.as_str())
        .bind(&key.report_type)
        .bind(patch.criterion1)
        .bind(patch.criterion2)
        .bind(patch.criterion3)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                return StorageError::ConstraintViolation(
                    "A rating for this page, model and report type is already being saved"
                        .to_string(),
                );
            }
            if err.is_check_violation() {
                return StorageError::ConstraintViolation(
                    "Ratings must be between 0 and 5 and page must be positive".to_string(),
                );
            }
            err
        })?;

        RatingRecord::try_from(row)
    }

    pub async fn find_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<PageRatings> {
        let rows = sqlx::query_as::<_, RatingRow>(
            r#"
            SELECT rating_id, annotator, page, model, report_type,
                   criterion1_rating, criterion2_rating, criterion3_rating,
                   all_criteria_met, created_at, updated_at
            FROM rating_records
            WHERE annotator = $1 AND page = $2 AND report_type = $3
            ORDER BY model
            "#,
        )
        .bind(scope.as_str())
        .bind(page)
        .bind(report_type)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(RatingRecord::try_from).collect()
    }

    pub async fn count_by_page_and_type(
        &self,
        scope: &Scope,
        page: i32,
        report_type: &str,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM rating_records
            WHERE annotator = $1 AND page = $2 AND report_type = $3
            "#,
        )
        .bind(scope.as_str())
        .bind(page)
        .bind(report_type)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_by_type(&self, scope: &Scope, report_type: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM rating_records
            WHERE annotator = $1 AND report_type = $2
            "#,
        )
        .bind(scope.as_str())
        .bind(report_type)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_by_type_where_complete(
        &self,
        scope: &Scope,
        report_type: &str,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM rating_records
            WHERE annotator = $1 AND report_type = $2 AND all_criteria_met
            "#,
        )
        .bind(scope.as_str())
        .bind(report_type)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
