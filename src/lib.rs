//! taric-official - official EU TARIC descriptions with a local cache
//!
//! Resolves the official goods description for a TARIC code and language,
//! serving it from a SQLite cache while fresh and refreshing it from the EU
//! TARIC SOAP service otherwise. Classifier answers can be stored and
//! reviewed against the official wording.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, port traits and errors
//! - **Adapters** (`adapters`): SQLite persistence and the TARIC SOAP client
//! - **Service Layer** (`services`): lookup orchestration and review workflow
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use taric_official::adapters::sqlite::{initialize_database, SqliteDescriptionCache};
//! use taric_official::adapters::taric::TaricSoapClient;
//! use taric_official::services::OfficialDescriptionService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = taric_official::infrastructure::ConfigLoader::load()?;
//!     let pool = initialize_database(&config.database).await?;
//!     let service = OfficialDescriptionService::new(
//!         Arc::new(SqliteDescriptionCache::new(pool)),
//!         Arc::new(TaricSoapClient::from_config(&config.remote)?),
//!     );
//!     let entry = service.get_official_description("8517120000", Some("de"), None).await?;
//!     println!("{entry:?}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    CacheEntry, Config, FreshnessWindow, LanguageTag, RawPayload, RemoteLookup, TaricCode,
};
pub use domain::{DomainError, DomainResult, RemoteLookupError};
pub use services::{LookupSettings, OfficialDescriptionService, ReviewService};
