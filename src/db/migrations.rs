//! Opening database files and creating the schema.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info};

/// Applied to every pooled connection, in order.
const CONNECTION_PRAGMAS: [&str; 3] = [
    "PRAGMA foreign_keys = ON",
    "PRAGMA busy_timeout = 5000",
    "PRAGMA synchronous = NORMAL",
];

/// Open (creating if needed) the SQLite database and ensure the schema exists.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = open_pool(&format!("sqlite:{}?mode=rwc", db_path)).await?;
    create_schema(&pool).await?;

    info!("Database ready at {}", db_path);
    Ok(pool)
}

/// Open an existing database file without touching its schema.
///
/// Fails if the file does not exist.
pub async fn connect_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = open_pool(&format!("sqlite:{}?mode=rw", db_path)).await?;
    debug!("Connected to existing database at {}", db_path);
    Ok(pool)
}

async fn open_pool(url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { prepare_connection(conn).await }))
        .connect(url)
        .await
}

/// Run every statement in `schema.sql`. Each one is `IF NOT EXISTS`, so
/// existing tables and their rows are left alone.
async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = include_str!("schema.sql")
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut applied = 0;
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
        applied += 1;
    }

    debug!(statements = applied, "Schema applied");
    Ok(())
}

async fn prepare_connection(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for pragma in CONNECTION_PRAGMAS {
        sqlx::query(pragma).execute(&mut *conn).await?;
    }

    // Reports the mode actually in effect, which stays "memory" for in-memory files.
    let mode: String = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?
        .get(0);
    debug!(journal_mode = %mode, "Connection prepared");

    Ok(())
}
