//! SQLite pool factory and runtime migration runner.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use bookstore_kernel::{settings::DatabaseSettings, Migration};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Open a pool for the configured database, creating the file when missing.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    if settings.url.contains(":memory:") {
        return connect_in_memory().await;
    }

    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.operation_timeout_ms))
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(target: "bookstore-db", url = %settings.url, "database pool ready");
    Ok(pool)
}

/// Single-connection in-memory database. Every connection to `:memory:` is its
/// own database, so the pool never grows or recycles its one connection.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(IN_MEMORY_URL)?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open in-memory database")?;

    tracing::info!(target: "bookstore-db", "in-memory database ready");
    Ok(pool)
}

/// Apply module migrations that have not been recorded yet. Returns how many ran.
pub async fn run_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            module     TEXT NOT NULL,
            id         TEXT NOT NULL,
            applied_at TEXT NOT NULL,
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create schema_migrations")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let done: Option<String> =
            sqlx::query_scalar("SELECT id FROM schema_migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await?;
        if done.is_some() {
            tracing::debug!(target: "bookstore-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        sqlx::query("INSERT INTO schema_migrations (module, id, applied_at) VALUES (?, ?, ?)")
            .bind(module)
            .bind(migration.id)
            .bind(chrono::Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(target: "bookstore-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
