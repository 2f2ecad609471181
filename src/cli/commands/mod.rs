//! Subcommand implementations and the wiring they share.

pub mod init;
pub mod lookup;
pub mod review;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::sqlite::{initialize_database, SqliteDescriptionCache};
use crate::adapters::taric::TaricSoapClient;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{LookupSettings, OfficialDescriptionService};

/// The lookup service as wired by the CLI.
pub type CliDescriptionService = OfficialDescriptionService<SqliteDescriptionCache, TaricSoapClient>;

/// Load the explicit config file if given, otherwise the project files.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub async fn open_database(config: &Config) -> Result<SqlitePool> {
    initialize_database(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))
}

pub fn description_service(config: &Config, pool: SqlitePool) -> Result<CliDescriptionService> {
    let cache = Arc::new(SqliteDescriptionCache::new(pool));
    let client = Arc::new(TaricSoapClient::from_config(&config.remote)?);
    Ok(OfficialDescriptionService::with_settings(
        cache,
        client,
        LookupSettings::from(&config.lookup),
    ))
}
