use async_trait::async_trait;

use crate::domain::errors::RemoteLookupError;
use crate::domain::models::{LanguageTag, RemoteLookup, TaricCode};

/// Client for the remote official description service.
///
/// Implementations never touch the cache and must bound every call with a
/// finite timeout.
#[async_trait]
pub trait RemoteLookupClient: Send + Sync {
    /// Fetch the official description for a key.
    ///
    /// Returns [`RemoteLookup::NotFound`] when the service has no record;
    /// transport failures, timeouts, unexpected statuses and unreadable
    /// payloads are reported as [`RemoteLookupError`].
    async fn fetch(
        &self,
        code: &TaricCode,
        language: &LanguageTag,
    ) -> Result<RemoteLookup, RemoteLookupError>;
}
