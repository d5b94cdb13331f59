//! Database schema migrations.
//!
//! Uses a simple version table approach to track applied migrations.
//! Each migration is a SQL batch applied in its own transaction.

use tokio_rusqlite::{Connection, params};

use crate::error::StorageError;

/// Migration list: (version, SQL).
///
/// Migrations must be applied in order. All migrations are idempotent using
/// CREATE IF NOT EXISTS.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_feed_cache.sql"))];

/// Highest schema version this build knows how to read.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|(version, _)| *version).unwrap_or(0)
}

/// Run any pending migrations.
///
/// Creates the `_migrations` table if it doesn't exist, checks the current
/// version, and applies any migrations that haven't been run yet.
///
/// # Errors
///
/// Returns `StorageError::UnsupportedSchema` if the database was written by a
/// newer schema, or `StorageError::Database` if a migration fails to execute.
pub async fn run(conn: &Connection) -> Result<(), StorageError> {
    let applied = conn
        .call(|conn| -> Result<Vec<i64>, StorageError> {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS _migrations (
                    version INTEGER PRIMARY KEY,
                    applied_at TEXT NOT NULL
                )",
                [],
            )?;

            let current: i64 =
                conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

            let latest = latest_version();
            if current > latest {
                return Err(StorageError::UnsupportedSchema { found: current, latest });
            }

            let mut applied = Vec::new();
            for (version, sql) in MIGRATIONS {
                if *version > current {
                    let tx = conn.transaction()?;
                    tx.execute_batch(sql)
                        .map_err(|e| StorageError::MigrationFailed(format!("version {version}: {e}")))?;
                    tx.execute(
                        "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                        params![version, chrono::Utc::now().to_rfc3339()],
                    )?;
                    tx.commit()?;
                    applied.push(*version);
                }
            }

            Ok(applied)
        })
        .await
        .map_err(StorageError::from)?;

    if !applied.is_empty() {
        tracing::debug!(?applied, "applied feed store migrations");
    }

    Ok(())
}
