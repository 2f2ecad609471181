//! Implementation of the `taric-official lookup` command.

use anyhow::{Context, Result};
use clap::Args;

use super::{description_service, open_database};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{CacheEntry, Config, FreshnessWindow, LanguageTag};

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// TARIC code, e.g. 8517120000
    pub code: String,

    /// Language tag (defaults to the configured language)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Refetch cached entries older than this many hours
    #[arg(long, conflicts_with = "no_expiry")]
    pub max_age_hours: Option<u32>,

    /// Serve any cached entry regardless of age
    #[arg(long)]
    pub no_expiry: bool,
}

impl LookupArgs {
    /// Window requested on the command line, if any.
    pub fn window(&self) -> Option<FreshnessWindow> {
        if self.no_expiry {
            Some(FreshnessWindow::NoExpiry)
        } else {
            self.max_age_hours.map(FreshnessWindow::Hours)
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct LookupOutput {
    pub found: bool,
    pub code: String,
    pub language: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub fetched_at: Option<String>,
    pub raw_payload_bytes: Option<usize>,
}

impl LookupOutput {
    pub fn new(code: &str, language: &LanguageTag, entry: Option<CacheEntry>) -> Self {
        match entry {
            Some(entry) => Self {
                found: true,
                code: entry.code.to_string(),
                language: entry.language.to_string(),
                description: Some(entry.description),
                source: Some(entry.source),
                fetched_at: entry.fetched_at.map(|t| t.to_rfc3339()),
                raw_payload_bytes: entry.raw_payload.map(|p| p.len()),
            },
            None => Self {
                found: false,
                code: code.trim().to_string(),
                language: language.to_string(),
                description: None,
                source: None,
                fetched_at: None,
                raw_payload_bytes: None,
            },
        }
    }
}

impl CommandOutput for LookupOutput {
    fn to_human(&self) -> String {
        if !self.found {
            return format!(
                "Official description not available for {} ({})",
                self.code, self.language
            );
        }

        let mut lines = vec![
            format!("TARIC code: {}", self.code),
            format!("Language: {}", self.language),
        ];
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => {
                lines.push(format!("Description: {description}"));
            }
            _ => lines.push("Description: (empty)".to_string()),
        }
        if let Some(source) = &self.source {
            lines.push(format!("Source: {source}"));
        }
        lines.push(format!(
            "Fetched at: {}",
            self.fetched_at.as_deref().unwrap_or("unknown")
        ));
        if let Some(bytes) = self.raw_payload_bytes {
            lines.push(format!("Raw payload: {bytes} bytes"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: LookupArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let service = description_service(config, pool)?;

    let language = LanguageTag::normalize(args.lang.as_deref(), &service.settings().default_language);
    let entry = service
        .get_official_description(&args.code, args.lang.as_deref(), args.window())
        .await
        .context("Failed to look up official description")?;

    output(&LookupOutput::new(&args.code, &language, entry), json_mode);
    Ok(())
}
