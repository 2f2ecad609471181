//! Review of stored classifier answers against the official description.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::official_description_service::OfficialDescriptionService;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    CacheEntry, ClassificationRecord, Evaluation, NewClassification, OfficialMatch, ReviewFilter,
    ReviewItem,
};
use crate::domain::ports::{ClassificationRepository, DescriptionCache, RemoteLookupClient};

/// Largest page accepted by [`ReviewService::list`].
pub const MAX_REVIEW_LIMIT: u32 = 1000;

/// A classification shown next to the official wording of its code.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDetail {
    pub item: ReviewItem,
    pub official: Option<CacheEntry>,
}

pub struct ReviewService<R, S, C>
where
    R: ClassificationRepository,
    S: DescriptionCache,
    C: RemoteLookupClient,
{
    repository: Arc<R>,
    descriptions: Arc<OfficialDescriptionService<S, C>>,
}

impl<R, S, C> ReviewService<R, S, C>
where
    R: ClassificationRepository,
    S: DescriptionCache,
    C: RemoteLookupClient,
{
    pub const fn new(repository: Arc<R>, descriptions: Arc<OfficialDescriptionService<S, C>>) -> Self {
        Self {
            repository,
            descriptions,
        }
    }

    /// Store a classifier answer for later review.
    pub async fn import_model_response(
        &self,
        filename: &str,
        response: &Value,
    ) -> DomainResult<ClassificationRecord> {
        if filename.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "filename cannot be empty".to_string(),
            ));
        }
        if !response.is_object() {
            return Err(DomainError::ValidationFailed(
                "model response must be a JSON object".to_string(),
            ));
        }

        let new = NewClassification::from_model_response(filename.trim(), response);
        let id = self.repository.insert(&new).await?;
        tracing::info!(id, filename, taric_code = ?new.taric_code, "classification imported");

        self.repository
            .get(id)
            .await?
            .map(|item| item.classification)
            .ok_or(DomainError::ClassificationNotFound(id))
    }

    /// List classifications newest first.
    pub async fn list(&self, filter: ReviewFilter, limit: u32) -> DomainResult<Vec<ReviewItem>> {
        if limit == 0 || limit > MAX_REVIEW_LIMIT {
            return Err(DomainError::ValidationFailed(format!(
                "limit must be between 1 and {MAX_REVIEW_LIMIT}, got {limit}"
            )));
        }
        self.repository.list_for_review(filter, limit).await
    }

    /// Load one classification with its evaluation and official description.
    ///
    /// A failed official lookup never hides the classification; it only
    /// leaves `official` empty.
    pub async fn show(&self, id: i64, language: Option<&str>) -> DomainResult<ReviewDetail> {
        let item = self
            .repository
            .get(id)
            .await?
            .ok_or(DomainError::ClassificationNotFound(id))?;

        let official = match item.classification.taric_code.as_deref() {
            Some(code) => {
                self.descriptions
                    .get_official_description(code, language, None)
                    .await?
            }
            None => None,
        };

        Ok(ReviewDetail { item, official })
    }

    /// Insert or update the evaluation of a classification.
    pub async fn save_evaluation(&self, id: i64, evaluation: &Evaluation) -> DomainResult<i64> {
        evaluation.validate().map_err(DomainError::ValidationFailed)?;
        let evaluation_id = self.repository.upsert_evaluation(id, evaluation).await?;
        tracing::info!(
            classification_id = id,
            evaluation_id,
            correct_digits = evaluation.correct_digits,
            "evaluation saved"
        );
        Ok(evaluation_id)
    }

    /// Record how well the classification matches the official description.
    pub async fn record_official_match(
        &self,
        id: i64,
        official_match: &OfficialMatch,
    ) -> DomainResult<()> {
        official_match
            .validate()
            .map_err(DomainError::ValidationFailed)?;
        self.repository.record_official_match(id, official_match).await?;
        tracing::info!(
            classification_id = id,
            score = official_match.score,
            label = %official_match.label,
            "official match recorded"
        );
        Ok(())
    }
}
