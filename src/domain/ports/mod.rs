//! Port trait definitions (Hexagonal Architecture)
//!
//! - `DescriptionCache`: persisted official descriptions
//! - `RemoteLookupClient`: the official TARIC lookup service
//! - `ClassificationRepository`: classifier answers and their review

pub mod classification_repository;
pub mod description_cache;
pub mod remote_lookup;

pub use classification_repository::ClassificationRepository;
pub use description_cache::DescriptionCache;
pub use remote_lookup::RemoteLookupClient;
