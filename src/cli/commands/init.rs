//! Implementation of the `taric-official init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use super::open_database;
use crate::adapters::sqlite::Migrator;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::loader::CONFIG_FILE;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,

    /// Where to write the configuration file
    #[arg(long, default_value = CONFIG_FILE)]
    pub config_path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub config_written: bool,
    pub database_path: String,
    pub schema_version: i64,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("Configuration written to {}", self.config_path.display()));
        } else {
            lines.push(format!(
                "Configuration kept at {} (use --force to overwrite)",
                self.config_path.display()
            ));
        }
        lines.push(format!(
            "Database ready at {} (schema version {})",
            self.database_path, self.schema_version
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Render the configuration file written by `init`.
pub fn render_config(config: &Config) -> Result<String> {
    let body = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    Ok(format!(
        "# taric-official configuration\n# Environment overrides: TARIC_<SECTION>__<KEY>\n{body}"
    ))
}

pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let config_written = if args.config_path.exists() && !args.force {
        false
    } else {
        if let Some(parent) = args.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&args.config_path, render_config(config)?)
            .await
            .with_context(|| format!("Failed to write {}", args.config_path.display()))?;
        true
    };

    let pool = open_database(config).await?;
    let schema_version = Migrator::new(pool.clone())
        .get_current_version()
        .await
        .context("Failed to read schema version")?;
    pool.close().await;

    let out = InitOutput {
        success: true,
        message: "Project initialized successfully.".to_string(),
        config_path: args.config_path,
        config_written,
        database_path: config.database.path.clone(),
        schema_version,
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConfigLoader;

    #[test]
    fn test_rendered_config_loads_back() {
        let mut config = Config::default();
        config.lookup.default_language = "EN".to_string();
        config.lookup.default_max_age_hours = Some(72);

        let rendered = render_config(&config).unwrap();
        assert!(rendered.starts_with("# taric-official configuration"));

        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
        ConfigLoader::validate(&parsed).unwrap();
    }

    #[tokio::test]
    async fn test_init_writes_config_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("data/taric.db").to_string_lossy().into_owned();
        let config_path = dir.path().join("taric.yaml");

        let args = InitArgs {
            force: false,
            config_path: config_path.clone(),
        };
        execute(args, &config, true).await.unwrap();

        assert!(config_path.exists());
        assert!(dir.path().join("data/taric.db").exists());

        // A second run keeps the existing file.
        std::fs::write(&config_path, "# edited\n").unwrap();
        let args = InitArgs {
            force: false,
            config_path: config_path.clone(),
        };
        execute(args, &config, true).await.unwrap();
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "# edited\n");
    }
}
