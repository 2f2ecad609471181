use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{CacheEntry, LanguageTag, TaricCode};

/// Persistent store of official descriptions keyed by (code, language).
///
/// Entries are never deleted or evicted.
#[async_trait]
pub trait DescriptionCache: Send + Sync {
    /// Look up the entry for a key. Has no side effects.
    async fn read(&self, code: &TaricCode, language: &LanguageTag)
        -> DomainResult<Option<CacheEntry>>;

    /// Insert or overwrite the entry for `entry`'s key.
    ///
    /// Atomic per key; concurrent writers for the same key resolve as
    /// last-writer-wins.
    async fn upsert(&self, entry: &CacheEntry) -> DomainResult<()>;
}
