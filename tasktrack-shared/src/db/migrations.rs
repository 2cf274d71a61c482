/// Database schema migrations
///
/// The schema is embedded here and applied with `CREATE TABLE IF NOT EXISTS`,
/// so running migrations is idempotent and the database stays a single
/// self-contained file. Schema changes append statements to [`SCHEMA`].
///
/// # Schema
///
/// ```text
/// users  (id, username UNIQUE, password_hash, role, created_at)
/// tasks  (id, owner_id → users.id, title, description, status,
///         assignee, priority, created_at, updated_at)
/// ```

use sqlx::SqlitePool;
use tracing::info;

/// Schema statements, applied in order
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT    NOT NULL UNIQUE,
        password_hash TEXT    NOT NULL,
        role          TEXT    NOT NULL DEFAULT 'user',
        created_at    TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id    INTEGER NOT NULL REFERENCES users(id),
        title       TEXT    NOT NULL,
        description TEXT    NOT NULL DEFAULT '',
        status      TEXT    NOT NULL DEFAULT 'open',
        assignee    TEXT    NOT NULL,
        priority    INTEGER NOT NULL DEFAULT 3,
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
];

/// Applies the embedded schema to the database
///
/// Safe to call on every startup; existing tables are left untouched.
///
/// # Errors
///
/// Returns an error if any statement fails to execute.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Applying database schema");

    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema is up to date");
    Ok(())
}
