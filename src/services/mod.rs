//! Application services built on the domain ports.

pub mod freshness;
pub mod official_description_service;
pub mod review_service;

pub use freshness::is_fresh;
pub use official_description_service::{LookupSettings, OfficialDescriptionService};
pub use review_service::{ReviewDetail, ReviewService, MAX_REVIEW_LIMIT};
