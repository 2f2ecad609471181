//! SQLite database migration management.

use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        version: i64,
        #[source]
        source: sqlx::Error,
    },
    #[error("Failed to get schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

/// A column added with `ALTER TABLE` unless the table already has it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedColumn {
    pub table: &'static str,
    pub name: &'static str,
    pub sql_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    pub sql: String,
    /// Applied after `sql`, in the same transaction.
    pub added_columns: Vec<AddedColumn>,
}

pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every migration newer than the recorded schema version.
    /// Returns the number of migrations applied.
    pub async fn run_embedded_migrations(
        &self,
        migrations: Vec<Migration>,
    ) -> Result<usize, MigrationError> {
        self.ensure_migrations_table().await?;
        let current_version = self.get_current_version().await?;
        let pending: Vec<_> = migrations
            .into_iter()
            .filter(|m| m.version > current_version)
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        for migration in &pending {
            self.apply_migration(migration).await?;
            tracing::info!(
                version = migration.version,
                description = %migration.description,
                "applied migration"
            );
        }

        Ok(pending.len())
    }

    async fn ensure_migrations_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MigrationError::ExecutionError {
            version: 0,
            source: e,
        })?;
        Ok(())
    }

    pub async fn get_current_version(&self) -> Result<i64, MigrationError> {
        let result: Option<(i64,)> =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_optional(&self.pool)
                .await
                .map_err(MigrationError::VersionCheckError)?;
        Ok(result.map_or(0, |(v,)| v))
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), MigrationError> {
        let to_error = |e: sqlx::Error| MigrationError::ExecutionError {
            version: migration.version,
            source: e,
        };

        let mut tx = self.pool.begin().await.map_err(to_error)?;

        if !migration.sql.trim().is_empty() {
            sqlx::raw_sql(&migration.sql)
                .execute(&mut *tx)
                .await
                .map_err(to_error)?;
        }

        for column in &migration.added_columns {
            let (present,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?",
            )
            .bind(column.table)
            .bind(column.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(to_error)?;
            if present > 0 {
                continue;
            }

            let alter = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                column.table, column.name, column.sql_type
            );
            sqlx::query(&alter).execute(&mut *tx).await.map_err(to_error)?;
            tracing::debug!(table = column.table, column = column.name, "added column");
        }

        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(to_error)?;

        tx.commit().await.map_err(to_error)?;
        Ok(())
    }
}

pub fn official_description_cache_migration() -> Migration {
    Migration {
        version: 1,
        description: "Official description cache".to_string(),
        sql: include_str!("../../../migrations/001_official_description_cache.sql").to_string(),
        added_columns: Vec::new(),
    }
}

pub fn classification_review_migration() -> Migration {
    Migration {
        version: 2,
        description: "Classification results and review".to_string(),
        sql: include_str!("../../../migrations/002_classification_review.sql").to_string(),
        added_columns: Vec::new(),
    }
}

/// Official-match review columns on `taric_live`.
///
/// Databases created by the classification backend already hold the table
/// without these columns, so they are added one by one where missing.
pub fn official_match_columns_migration() -> Migration {
    let column = |name, sql_type| AddedColumn {
        table: "taric_live",
        name,
        sql_type,
    };
    Migration {
        version: 3,
        description: "Official match review columns".to_string(),
        sql: String::new(),
        added_columns: vec![
            column("official_match_score", "REAL"),
            column("official_match_label", "TEXT"),
            column("official_reviewed_by", "TEXT"),
            column("official_reviewed_at", "TEXT"),
        ],
    }
}

pub fn all_embedded_migrations() -> Vec<Migration> {
    vec![
        official_description_cache_migration(),
        classification_review_migration(),
        official_match_columns_migration(),
    ]
}
