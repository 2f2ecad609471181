//! Official TARIC description domain model.
//!
//! A cached description is keyed by a normalized (code, language) pair.
//! The raw remote payload travels alongside the typed fields for audit
//! purposes only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language used when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "DE";

/// Default freshness window for cached descriptions, in hours.
pub const DEFAULT_MAX_AGE_HOURS: u32 = 24;

/// Source tag written by the EU TARIC SOAP service adapter.
pub const EU_TARIC_WSDL_SOURCE: &str = "EU_TARIC_WSDL";

/// A trimmed, non-empty tariff code (TARIC/CN/HS).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaricCode(String);

impl TaricCode {
    /// Normalize a raw code. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of ASCII digits in the code (4, 6, 8 or 10 for well-formed codes).
    pub fn digit_count(&self) -> usize {
        self.0.chars().filter(char::is_ascii_digit).count()
    }

    /// The HS chapter (first two digits), if the code starts with two digits.
    pub fn hs_chapter(&self) -> Option<&str> {
        let prefix = self.0.get(..2)?;
        prefix
            .chars()
            .all(|c| c.is_ascii_digit())
            .then_some(prefix)
    }
}

impl fmt::Display for TaricCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uppercased language tag such as `DE` or `EN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Trim and uppercase `raw`, falling back to `default` when it is blank.
    pub fn normalize(raw: Option<&str>, default: &str) -> Self {
        let candidate = raw.map(str::trim).filter(|s| !s.is_empty());
        let tag = candidate.unwrap_or_else(|| default.trim());
        let tag = if tag.is_empty() { DEFAULT_LANGUAGE } else { tag };
        Self(tag.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Original response body kept for audit. Never interpreted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPayload(String);

impl RawPayload {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawPayload({} bytes)", self.0.len())
    }
}

/// A cached official description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub code: TaricCode,
    pub language: LanguageTag,
    /// May be empty, never null once stored.
    pub description: String,
    /// Remote origin, e.g. [`EU_TARIC_WSDL_SOURCE`].
    pub source: String,
    /// Time of the last successful remote fetch. `None` when the persisted
    /// timestamp could not be read; such entries are never fresh.
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<RawPayload>,
}

impl CacheEntry {
    /// Build an entry for a record fetched just now.
    pub fn fetched_now(
        code: TaricCode,
        language: LanguageTag,
        description: impl Into<String>,
        source: impl Into<String>,
        raw_payload: Option<RawPayload>,
    ) -> Self {
        Self {
            code,
            language,
            description: description.into(),
            source: source.into(),
            fetched_at: Some(Utc::now()),
            raw_payload,
        }
    }

    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = Some(fetched_at);
        self
    }

    /// Age of the entry relative to `now`, if the fetch time is known.
    pub fn age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.fetched_at.map(|fetched| now - fetched)
    }
}

/// Maximum accepted age of a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessWindow {
    Hours(u32),
    /// Any existing entry is fresh.
    NoExpiry,
}

impl FreshnessWindow {
    /// Map an optional hour count, where `None` means "no expiry".
    pub const fn from_hours(hours: Option<u32>) -> Self {
        match hours {
            Some(h) => Self::Hours(h),
            None => Self::NoExpiry,
        }
    }
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self::Hours(DEFAULT_MAX_AGE_HOURS)
    }
}

impl fmt::Display for FreshnessWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hours(h) => write!(f, "{h}h"),
            Self::NoExpiry => f.write_str("no-expiry"),
        }
    }
}

/// Outcome of a successful remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteLookup {
    Found(CacheEntry),
    /// The service answered but holds no record for the key.
    NotFound,
}
