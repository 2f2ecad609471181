use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Evaluation, NewClassification, OfficialMatch, ReviewFilter, ReviewItem,
};

/// Repository for classifier answers and their review
#[async_trait]
pub trait ClassificationRepository: Send + Sync {
    /// Store a classifier answer and return its id
    async fn insert(&self, classification: &NewClassification) -> DomainResult<i64>;

    /// Load one classification joined with its evaluation
    async fn get(&self, id: i64) -> DomainResult<Option<ReviewItem>>;

    /// List classifications newest first, joined with their evaluation
    async fn list_for_review(&self, filter: ReviewFilter, limit: u32)
        -> DomainResult<Vec<ReviewItem>>;

    /// Insert or update the single evaluation of a classification.
    ///
    /// # Errors
    /// `ClassificationNotFound` if `classification_id` does not exist.
    async fn upsert_evaluation(
        &self,
        classification_id: i64,
        evaluation: &Evaluation,
    ) -> DomainResult<i64>;

    /// Store the official-match review fields on a classification
    async fn record_official_match(
        &self,
        classification_id: i64,
        official_match: &OfficialMatch,
    ) -> DomainResult<()>;
}
