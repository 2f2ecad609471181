//! SQLite implementation of the ClassificationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::parse_lenient_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ClassificationRecord, Evaluation, NewClassification, OfficialMatch, OfficialMatchReview,
    ReviewFilter, ReviewItem, StoredEvaluation,
};
use crate::domain::ports::ClassificationRepository;

const REVIEW_SELECT: &str = r"
    SELECT t.id, t.created_at, t.filename, t.taric_code, t.cn_code, t.hs_chapter,
           t.confidence, t.short_reason, t.alternatives_json, t.raw_response_json,
           t.official_match_score, t.official_match_label, t.official_reviewed_by,
           t.official_reviewed_at,
           e.id AS evaluation_id, e.correct_digits, e.reviewer, e.comment,
           e.superviser_bewertung AS supervisor_rating,
           e.created_at AS evaluation_created_at,
           e.updated_at AS evaluation_updated_at
    FROM taric_live t
    LEFT JOIN taric_evaluation e ON e.taric_live_id = t.id";

#[derive(Clone)]
pub struct SqliteClassificationRepository {
    pool: SqlitePool,
}

impl SqliteClassificationRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: i64) -> DomainResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM taric_live WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl ClassificationRepository for SqliteClassificationRepository {
    async fn insert(&self, classification: &NewClassification) -> DomainResult<i64> {
        let result = sqlx::query(
            r"INSERT INTO taric_live
                (created_at, filename, taric_code, cn_code, hs_chapter, confidence,
                 short_reason, alternatives_json, raw_response_json)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(&classification.filename)
        .bind(&classification.taric_code)
        .bind(&classification.cn_code)
        .bind(&classification.hs_chapter)
        .bind(classification.confidence)
        .bind(&classification.short_reason)
        .bind(&classification.alternatives_json)
        .bind(&classification.raw_response_json)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(
            id,
            filename = %classification.filename,
            taric_code = classification.taric_code.as_deref().unwrap_or("-"),
            "classification stored"
        );
        Ok(id)
    }

    async fn get(&self, id: i64) -> DomainResult<Option<ReviewItem>> {
        let sql = format!("{REVIEW_SELECT} WHERE t.id = ?");
        let row: Option<ReviewRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ReviewRow::into_item).transpose()
    }

    async fn list_for_review(
        &self,
        filter: ReviewFilter,
        limit: u32,
    ) -> DomainResult<Vec<ReviewItem>> {
        let condition = match filter {
            ReviewFilter::All => "",
            ReviewFilter::Unreviewed => " WHERE e.id IS NULL",
            ReviewFilter::Reviewed => " WHERE e.id IS NOT NULL",
        };
        let sql = format!("{REVIEW_SELECT}{condition} ORDER BY t.id DESC LIMIT ?");

        let rows: Vec<ReviewRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ReviewRow::into_item).collect()
    }

    async fn upsert_evaluation(
        &self,
        classification_id: i64,
        evaluation: &Evaluation,
    ) -> DomainResult<i64> {
        if !self.exists(classification_id).await? {
            return Err(DomainError::ClassificationNotFound(classification_id));
        }

        let now = Utc::now().to_rfc3339();
        let (id,): (i64,) = sqlx::query_as(
            r"INSERT INTO taric_evaluation
                (taric_live_id, correct_digits, reviewer, comment, superviser_bewertung,
                 created_at, updated_at)
              VALUES (?, ?, ?, ?, ?, ?, ?)
              ON CONFLICT(taric_live_id) DO UPDATE SET
                correct_digits       = excluded.correct_digits,
                reviewer             = excluded.reviewer,
                comment              = excluded.comment,
                superviser_bewertung = excluded.superviser_bewertung,
                updated_at           = excluded.updated_at
              RETURNING id",
        )
        .bind(classification_id)
        .bind(i64::from(evaluation.correct_digits))
        .bind(&evaluation.reviewer)
        .bind(&evaluation.comment)
        .bind(evaluation.supervisor_rating)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn record_official_match(
        &self,
        classification_id: i64,
        official_match: &OfficialMatch,
    ) -> DomainResult<()> {
        let result = sqlx::query(
            r"UPDATE taric_live
              SET official_match_score = ?, official_match_label = ?,
                  official_reviewed_by = ?, official_reviewed_at = ?
              WHERE id = ?",
        )
        .bind(official_match.score)
        .bind(&official_match.label)
        .bind(&official_match.reviewed_by)
        .bind(Utc::now().to_rfc3339())
        .bind(classification_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ClassificationNotFound(classification_id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    created_at: Option<String>,
    filename: Option<String>,
    taric_code: Option<String>,
    cn_code: Option<String>,
    hs_chapter: Option<String>,
    confidence: Option<f64>,
    short_reason: Option<String>,
    alternatives_json: Option<String>,
    raw_response_json: Option<String>,
    official_match_score: Option<f64>,
    official_match_label: Option<String>,
    official_reviewed_by: Option<String>,
    official_reviewed_at: Option<String>,
    evaluation_id: Option<i64>,
    correct_digits: Option<i64>,
    reviewer: Option<String>,
    comment: Option<String>,
    supervisor_rating: Option<i64>,
    evaluation_created_at: Option<String>,
    evaluation_updated_at: Option<String>,
}

/// Missing timestamps read as `None`; present but unreadable ones are errors.
fn optional_datetime(field: &str, value: Option<&str>) -> DomainResult<Option<DateTime<Utc>>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_lenient_datetime(v).map(Some).ok_or_else(|| {
            DomainError::SerializationError(format!("invalid {field} timestamp: {v}"))
        }),
    }
}

impl ReviewRow {
    fn into_item(self) -> DomainResult<ReviewItem> {
        let official_match = match (self.official_match_score, self.official_match_label) {
            (Some(score), Some(label)) => Some(OfficialMatchReview {
                official_match: OfficialMatch {
                    score,
                    label,
                    reviewed_by: self.official_reviewed_by,
                },
                reviewed_at: self
                    .official_reviewed_at
                    .as_deref()
                    .and_then(parse_lenient_datetime),
            }),
            _ => None,
        };

        let evaluation = match self.evaluation_id {
            Some(id) => {
                let correct_digits = self.correct_digits.unwrap_or_default();
                Some(StoredEvaluation {
                    id,
                    evaluation: Evaluation {
                        correct_digits: u8::try_from(correct_digits).map_err(|_| {
                            DomainError::SerializationError(format!(
                                "correct_digits out of range: {correct_digits}"
                            ))
                        })?,
                        reviewer: self.reviewer,
                        comment: self.comment,
                        supervisor_rating: self.supervisor_rating,
                    },
                    created_at: optional_datetime(
                        "evaluation created_at",
                        self.evaluation_created_at.as_deref(),
                    )?,
                    updated_at: optional_datetime(
                        "evaluation updated_at",
                        self.evaluation_updated_at.as_deref(),
                    )?,
                })
            }
            None => None,
        };

        Ok(ReviewItem {
            classification: ClassificationRecord {
                id: self.id,
                created_at: optional_datetime("created_at", self.created_at.as_deref())?,
                filename: self.filename,
                taric_code: self.taric_code,
                cn_code: self.cn_code,
                hs_chapter: self.hs_chapter,
                confidence: self.confidence,
                short_reason: self.short_reason,
                alternatives_json: self.alternatives_json,
                raw_response_json: self.raw_response_json,
                official_match,
            },
            evaluation,
        })
    }
}
