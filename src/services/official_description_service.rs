//! Official description lookup: cache first, remote on miss or staleness,
//! stale fallback on remote failure.

use chrono::Utc;
use std::sync::Arc;

use super::freshness::is_fresh;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    CacheEntry, FreshnessWindow, LanguageTag, LookupConfig, RemoteLookup, TaricCode,
};
use crate::domain::ports::{DescriptionCache, RemoteLookupClient};

/// Defaults applied when a caller leaves language or window unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSettings {
    pub default_language: String,
    pub default_window: FreshnessWindow,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self::from(&LookupConfig::default())
    }
}

impl From<&LookupConfig> for LookupSettings {
    fn from(config: &LookupConfig) -> Self {
        Self {
            default_language: config.default_language.clone(),
            default_window: config.freshness_window(),
        }
    }
}

/// The single entry point for reading official descriptions.
///
/// This service is the only writer of the description cache; other readers
/// go through [`get_official_description`](Self::get_official_description).
pub struct OfficialDescriptionService<S: DescriptionCache, C: RemoteLookupClient> {
    cache: Arc<S>,
    remote: Arc<C>,
    settings: LookupSettings,
}

impl<S: DescriptionCache, C: RemoteLookupClient> OfficialDescriptionService<S, C> {
    pub fn new(cache: Arc<S>, remote: Arc<C>) -> Self {
        Self::with_settings(cache, remote, LookupSettings::default())
    }

    pub const fn with_settings(cache: Arc<S>, remote: Arc<C>, settings: LookupSettings) -> Self {
        Self {
            cache,
            remote,
            settings,
        }
    }

    pub const fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    /// Look up a code with the configured language and freshness window.
    pub async fn lookup(&self, code: &str) -> DomainResult<Option<CacheEntry>> {
        self.get_official_description(code, None, None).await
    }

    /// Return the official description for (code, language).
    ///
    /// - Blank code: warning, `Ok(None)`.
    /// - Fresh cache entry: returned without a remote call.
    /// - Remote failure: the cached entry if any (even stale), else `Ok(None)`.
    /// - Remote "not found": `Ok(None)`, nothing is written.
    /// - Remote success: upserted, then read back from the cache.
    ///
    /// # Errors
    /// Only cache read/write failures are returned as errors.
    pub async fn get_official_description(
        &self,
        code: &str,
        language: Option<&str>,
        window: Option<FreshnessWindow>,
    ) -> DomainResult<Option<CacheEntry>> {
        let Some(code) = TaricCode::parse(code) else {
            tracing::warn!("official description requested for an empty TARIC code");
            return Ok(None);
        };
        let language = LanguageTag::normalize(language, &self.settings.default_language);
        let window = window.unwrap_or(self.settings.default_window);

        let cached = self.cache.read(&code, &language).await?;
        if let Some(entry) = &cached {
            if is_fresh(entry, window, Utc::now()) {
                tracing::info!(code = %code, language = %language, "official description from cache");
                return Ok(cached);
            }
        }

        let fetched = match self.remote.fetch(&code, &language).await {
            Ok(RemoteLookup::Found(entry)) => entry,
            Ok(RemoteLookup::NotFound) => {
                tracing::info!(code = %code, language = %language, "no official description found");
                return Ok(None);
            }
            Err(err) => {
                tracing::error!(
                    code = %code,
                    language = %language,
                    error = %err,
                    stale_fallback = cached.is_some(),
                    "official description lookup failed"
                );
                return Ok(cached);
            }
        };

        let entry = CacheEntry {
            code: code.clone(),
            language: language.clone(),
            ..fetched
        };
        self.cache.upsert(&entry).await?;

        tracing::info!(
            code = %code,
            language = %language,
            source = %entry.source,
            window = %window,
            "official description refreshed"
        );
        self.cache.read(&code, &language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteDescriptionCache};
    use crate::domain::errors::{DomainError, RemoteLookupError};
    use crate::domain::models::{RawPayload, EU_TARIC_WSDL_SOURCE};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum Scripted {
        Found(&'static str),
        NotFound,
        Fail,
    }

    /// Remote client fake that answers from a script and counts calls.
    struct ScriptedRemote {
        answer: Scripted,
        calls: AtomicUsize,
        last_key: Mutex<Option<(String, String)>>,
    }

    impl ScriptedRemote {
        fn new(answer: Scripted) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
                last_key: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteLookupClient for ScriptedRemote {
        async fn fetch(
            &self,
            code: &TaricCode,
            language: &LanguageTag,
        ) -> Result<RemoteLookup, RemoteLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_key.lock().unwrap() =
                Some((code.as_str().to_string(), language.as_str().to_string()));
            match self.answer {
                Scripted::Found(description) => Ok(RemoteLookup::Found(CacheEntry::fetched_now(
                    code.clone(),
                    language.clone(),
                    description,
                    EU_TARIC_WSDL_SOURCE,
                    Some(RawPayload::new("<ok/>")),
                ))),
                Scripted::NotFound => Ok(RemoteLookup::NotFound),
                Scripted::Fail => Err(RemoteLookupError::Timeout(15)),
            }
        }
    }

    /// Cache whose every operation fails.
    struct BrokenCache;

    #[async_trait]
    impl DescriptionCache for BrokenCache {
        async fn read(&self, _: &TaricCode, _: &LanguageTag) -> DomainResult<Option<CacheEntry>> {
            Err(DomainError::DatabaseError("disk I/O error".to_string()))
        }

        async fn upsert(&self, _: &CacheEntry) -> DomainResult<()> {
            Err(DomainError::DatabaseError("disk I/O error".to_string()))
        }
    }

    async fn setup(
        answer: Scripted,
    ) -> (
        OfficialDescriptionService<SqliteDescriptionCache, ScriptedRemote>,
        Arc<SqliteDescriptionCache>,
        Arc<ScriptedRemote>,
    ) {
        let pool = create_migrated_test_pool().await.unwrap();
        let cache = Arc::new(SqliteDescriptionCache::new(pool));
        let remote = Arc::new(ScriptedRemote::new(answer));
        let service = OfficialDescriptionService::new(cache.clone(), remote.clone());
        (service, cache, remote)
    }

    async fn seed(cache: &SqliteDescriptionCache, code: &str, description: &str, at: DateTime<Utc>) {
        let entry = CacheEntry::fetched_now(
            TaricCode::parse(code).unwrap(),
            LanguageTag::default(),
            description,
            EU_TARIC_WSDL_SOURCE,
            None,
        )
        .with_fetched_at(at);
        cache.upsert(&entry).await.unwrap();
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_remote() {
        let (service, cache, remote) = setup(Scripted::Found("remote")).await;
        seed(&cache, "8517120000", "cached", Utc::now()).await;

        let entry = service
            .get_official_description("8517120000", Some("DE"), Some(FreshnessWindow::Hours(24)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entry.description, "cached");
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_refetch() {
        let (service, cache, remote) = setup(Scripted::Found("refreshed")).await;
        seed(&cache, "8517120000", "old", Utc::now() - Duration::hours(48)).await;

        let entry = service
            .get_official_description("8517120000", Some("DE"), Some(FreshnessWindow::Hours(24)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(remote.calls(), 1);
        assert_eq!(entry.description, "refreshed");
        assert!(entry.age(Utc::now()).unwrap() < Duration::minutes(1));
        assert_eq!(cache.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remote_error_falls_back_to_stale() {
        let (service, cache, remote) = setup(Scripted::Fail).await;
        seed(&cache, "8517120000", "stale", Utc::now() - Duration::hours(48)).await;

        let entry = service
            .get_official_description("8517120000", None, Some(FreshnessWindow::Hours(24)))
            .await
            .unwrap()
            .expect("stale entry should be served");

        assert_eq!(remote.calls(), 1);
        assert_eq!(entry.description, "stale");
    }

    #[tokio::test]
    async fn test_remote_error_without_cache_is_absent() {
        let (service, _cache, remote) = setup(Scripted::Fail).await;
        let result = service.lookup("8517120000").await.unwrap();
        assert!(result.is_none());
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let (service, cache, remote) = setup(Scripted::NotFound).await;

        assert!(service.lookup("0000000000").await.unwrap().is_none());
        assert_eq!(cache.count().await.unwrap(), 0);

        // Absence is re-checked upstream on every call.
        assert!(service.lookup("0000000000").await.unwrap().is_none());
        assert_eq!(remote.calls(), 2);
    }

    #[tokio::test]
    async fn test_not_found_with_stale_entry_is_absent() {
        let (service, cache, _remote) = setup(Scripted::NotFound).await;
        seed(&cache, "8517120000", "stale", Utc::now() - Duration::hours(48)).await;

        assert!(service.lookup("8517120000").await.unwrap().is_none());
        // The stale row is left untouched.
        assert_eq!(cache.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_expiry_serves_year_old_entry() {
        let (service, cache, remote) = setup(Scripted::Found("remote")).await;
        seed(&cache, "8517120000", "ancient", Utc::now() - Duration::days(365)).await;

        let entry = service
            .get_official_description("8517120000", Some("DE"), Some(FreshnessWindow::NoExpiry))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entry.description, "ancient");
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_language_is_case_insensitive() {
        let (service, cache, remote) = setup(Scripted::Found("remote")).await;
        seed(&cache, "8517120000", "cached", Utc::now()).await;

        let entry = service
            .get_official_description("8517120000", Some("de"), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entry.description, "cached");
        assert_eq!(entry.language.as_str(), "DE");
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_code_is_absent_without_calls() {
        let (service, _cache, remote) = setup(Scripted::Found("remote")).await;
        assert!(service.lookup("   ").await.unwrap().is_none());
        assert!(service.lookup("").await.unwrap().is_none());
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_code_and_language_normalized_before_fetch() {
        let (service, cache, remote) = setup(Scripted::Found("remote")).await;

        service
            .get_official_description(" 8517120000 ", Some(" en "), None)
            .await
            .unwrap()
            .unwrap();

        let key = remote.last_key.lock().unwrap().clone();
        assert_eq!(key, Some(("8517120000".to_string(), "EN".to_string())));

        let stored = cache
            .read(
                &TaricCode::parse("8517120000").unwrap(),
                &LanguageTag::normalize(Some("EN"), "DE"),
            )
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_configured_defaults_apply() {
        let pool = create_migrated_test_pool().await.unwrap();
        let cache = Arc::new(SqliteDescriptionCache::new(pool));
        let remote = Arc::new(ScriptedRemote::new(Scripted::Found("remote")));
        let settings = LookupSettings {
            default_language: "en".to_string(),
            default_window: FreshnessWindow::NoExpiry,
        };
        let service = OfficialDescriptionService::with_settings(cache.clone(), remote.clone(), settings);

        let entry = service.lookup("8517120000").await.unwrap().unwrap();
        assert_eq!(entry.language.as_str(), "EN");
        assert_eq!(remote.calls(), 1);

        // Second call is a hit under the no-expiry default.
        service.lookup("8517120000").await.unwrap().unwrap();
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_timestamp_forces_refetch() {
        let pool = create_migrated_test_pool().await.unwrap();
        let cache = Arc::new(SqliteDescriptionCache::new(pool.clone()));
        let remote = Arc::new(ScriptedRemote::new(Scripted::Found("refreshed")));
        let service = OfficialDescriptionService::new(cache.clone(), remote.clone());
        seed(&cache, "8517120000", "seeded", Utc::now()).await;

        sqlx::query("UPDATE taric_official_cache SET fetched_at = 'not-a-date'")
            .execute(&pool)
            .await
            .unwrap();

        let entry = service.lookup("8517120000").await.unwrap().unwrap();
        assert_eq!(remote.calls(), 1);
        assert_eq!(entry.description, "refreshed");
        assert!(entry.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let remote = Arc::new(ScriptedRemote::new(Scripted::Found("remote")));
        let service = OfficialDescriptionService::new(Arc::new(BrokenCache), remote.clone());

        let result = service.lookup("8517120000").await;
        assert!(matches!(result, Err(DomainError::DatabaseError(_))));
        assert_eq!(remote.calls(), 0);
    }
}
