//! Startup check that the submission tables exist after migrations ran

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

pub const SUBMISSION_TABLES: [&str; 3] = ["reminders", "uploads", "form_submissions"];

#[derive(Debug, Error)]
pub enum DatabaseValidationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct DatabaseValidator {
    pool: SqlitePool,
}

impl DatabaseValidator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn validate(&self) -> Result<ValidationResult, DatabaseValidationError> {
        let migrations_applied = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        let mut missing_tables = Vec::new();
        for table in SUBMISSION_TABLES {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?
                > 0;
            if !exists {
                missing_tables.push(table.to_string());
            }
        }

        let result = ValidationResult {
            migrations_applied: migrations_applied as usize,
            missing_tables,
        };
        if result.is_ok() {
            info!(migrations_applied, "{}", result.summary());
        } else {
            warn!(missing = ?result.missing_tables, "{}", result.summary());
        }
        Ok(result)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub migrations_applied: usize,
    pub missing_tables: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.missing_tables.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_ok() {
            format!(
                "Submission store OK - {} migrations applied",
                self.migrations_applied
            )
        } else {
            format!(
                "Submission store is missing tables: {}",
                self.missing_tables.join(", ")
            )
        }
    }
}
