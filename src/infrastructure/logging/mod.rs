//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - pretty or JSON console output on stderr
//! - optional daily rolling JSON files

pub mod logger;

pub use logger::init_logging;
