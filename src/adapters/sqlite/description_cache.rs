//! SQLite implementation of the DescriptionCache port.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::parse_lenient_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CacheEntry, LanguageTag, RawPayload, TaricCode, DEFAULT_LANGUAGE};
use crate::domain::ports::DescriptionCache;

#[derive(Clone)]
pub struct SqliteDescriptionCache {
    pool: SqlitePool,
}

impl SqliteDescriptionCache {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored entries. Used by diagnostics and tests.
    pub async fn count(&self) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM taric_official_cache")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl DescriptionCache for SqliteDescriptionCache {
    async fn read(
        &self,
        code: &TaricCode,
        language: &LanguageTag,
    ) -> DomainResult<Option<CacheEntry>> {
        let row: Option<CacheRow> = sqlx::query_as(
            r"SELECT taric_code, language, description, source, fetched_at, raw_payload
              FROM taric_official_cache
              WHERE taric_code = ? AND language = ?",
        )
        .bind(code.as_str())
        .bind(language.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, entry: &CacheEntry) -> DomainResult<()> {
        let fetched_at = entry.fetched_at.ok_or_else(|| {
            DomainError::ValidationFailed(format!(
                "cache entry {}/{} has no fetch time",
                entry.code, entry.language
            ))
        })?;

        sqlx::query(
            r"INSERT INTO taric_official_cache
                (taric_code, language, description, source, fetched_at, raw_payload)
              VALUES (?, ?, ?, ?, ?, ?)
              ON CONFLICT(taric_code, language) DO UPDATE SET
                description = excluded.description,
                source      = excluded.source,
                fetched_at  = excluded.fetched_at,
                raw_payload = excluded.raw_payload",
        )
        .bind(entry.code.as_str())
        .bind(entry.language.as_str())
        .bind(&entry.description)
        .bind(&entry.source)
        .bind(fetched_at.to_rfc3339())
        .bind(entry.raw_payload.as_ref().map(RawPayload::as_str))
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            code = %entry.code,
            language = %entry.language,
            source = %entry.source,
            "official description cached"
        );
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CacheRow {
    taric_code: String,
    language: String,
    description: String,
    source: String,
    fetched_at: String,
    raw_payload: Option<String>,
}

impl TryFrom<CacheRow> for CacheEntry {
    type Error = DomainError;

    fn try_from(row: CacheRow) -> Result<Self, Self::Error> {
        let code = TaricCode::parse(&row.taric_code).ok_or_else(|| {
            DomainError::SerializationError("empty taric_code in cache row".to_string())
        })?;

        let fetched_at = parse_lenient_datetime(&row.fetched_at);
        if fetched_at.is_none() {
            tracing::warn!(
                code = %code,
                fetched_at = %row.fetched_at,
                "unreadable fetched_at in cache, entry will be treated as stale"
            );
        }

        Ok(Self {
            code,
            language: LanguageTag::normalize(Some(&row.language), DEFAULT_LANGUAGE),
            description: row.description,
            source: row.source,
            fetched_at,
            raw_payload: row.raw_payload.map(RawPayload::new),
        })
    }
}
