//! Domain models.

pub mod classification;
pub mod config;
pub mod official_description;

pub use classification::{
    ClassificationRecord, Evaluation, NewClassification, OfficialMatch, OfficialMatchReview,
    ReviewFilter, ReviewItem, StoredEvaluation, MAX_CORRECT_DIGITS,
};
pub use config::{Config, DatabaseConfig, LogFormat, LoggingConfig, LookupConfig, RemoteConfig};
pub use official_description::{
    CacheEntry, FreshnessWindow, LanguageTag, RawPayload, RemoteLookup, TaricCode,
    DEFAULT_LANGUAGE, DEFAULT_MAX_AGE_HOURS, EU_TARIC_WSDL_SOURCE,
};
