/// Task model and store operations
///
/// Tasks are the core entity of TaskTrack. Every task is owned by the user
/// who created it; non-admin access is scoped inside the SQL itself
/// (`WHERE id = ? AND owner_id = ?`), never by fetching a row and checking
/// ownership afterwards.
///
/// Filter values are bound parameters assembled from fixed clause literals,
/// and the sort column goes through the [`TaskSort`] allow-list, so no
/// request-supplied text can reach the query as SQL.
///
/// # Schema
///
/// ```text
/// CREATE TABLE tasks (
///     id          INTEGER PRIMARY KEY AUTOINCREMENT,
///     owner_id    INTEGER NOT NULL REFERENCES users(id),
///     title       TEXT    NOT NULL,
///     description TEXT    NOT NULL DEFAULT '',
///     status      TEXT    NOT NULL DEFAULT 'open',
///     assignee    TEXT    NOT NULL,
///     priority    INTEGER NOT NULL DEFAULT 3,
///     created_at  TEXT    NOT NULL,
///     updated_at  TEXT    NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Closed,
}

impl TaskStatus {
    /// Status name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Closed => "closed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Open
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TaskStatus::Open),
            "in_progress" => Ok(TaskStatus::InProgress),
            "closed" => Ok(TaskStatus::Closed),
            _ => Err(()),
        }
    }
}

/// Row visibility scope for store operations
///
/// Regular users operate on their own rows only; the restriction is part of
/// the query, so an id owned by someone else behaves exactly like an absent
/// id. Admin claims get [`OwnerScope::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerScope {
    /// Unscoped access (admin)
    All,

    /// Rows must match this owner
    Owner(i64),
}

/// Sort column allow-list
///
/// Unrecognized sort keys fall back to [`TaskSort::CreatedAt`]; the raw
/// request value is never spliced into the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    CreatedAt,
    UpdatedAt,
    Priority,
    Status,
    Title,
}

impl TaskSort {
    /// Resolves a request-supplied sort key against the allow-list
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("created_at") => TaskSort::CreatedAt,
            Some("updated_at") => TaskSort::UpdatedAt,
            Some("priority") => TaskSort::Priority,
            Some("status") => TaskSort::Status,
            Some("title") => TaskSort::Title,
            _ => TaskSort::CreatedAt,
        }
    }

    /// Column name used in ORDER BY; always one of the fixed literals above
    pub fn column(&self) -> &'static str {
        match self {
            TaskSort::CreatedAt => "created_at",
            TaskSort::UpdatedAt => "updated_at",
            TaskSort::Priority => "priority",
            TaskSort::Status => "status",
            TaskSort::Title => "title",
        }
    }
}

/// Optional list filters; each one becomes a bound `AND` clause
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub priority: Option<i64>,
}

/// Task record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (SQLite rowid)
    pub id: i64,

    /// User who created the task
    pub owner_id: i64,

    pub title: String,

    pub description: String,

    pub status: TaskStatus,

    /// Informational assignee name; not the ownership key
    pub assignee: String,

    /// Priority, 1 (highest) to 5 (lowest)
    pub priority: i64,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee: String,
    pub priority: i64,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub priority: Option<i64>,
}

/// Counts per status, for the stats endpoint
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TaskStats {
    pub open: i64,
    pub in_progress: i64,
    pub closed: i64,
}

const COLUMNS: &str =
    "id, owner_id, title, description, status, assignee, priority, created_at, updated_at";

impl Task {
    /// Lists tasks visible in `scope`, filtered and sorted
    pub async fn list(
        pool: &SqlitePool,
        scope: OwnerScope,
        filter: &TaskFilter,
        sort: TaskSort,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut sql = format!("SELECT {COLUMNS} FROM tasks WHERE 1=1");
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if filter.assignee.is_some() {
            sql.push_str(" AND assignee = ?");
        }
        if filter.priority.is_some() {
            sql.push_str(" AND priority = ?");
        }
        if matches!(scope, OwnerScope::Owner(_)) {
            sql.push_str(" AND owner_id = ?");
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(sort.column());
        sql.push_str(", id");

        let mut query = sqlx::query_as::<_, Task>(&sql);
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(assignee) = &filter.assignee {
            query = query.bind(assignee.clone());
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }
        if let OwnerScope::Owner(owner_id) = scope {
            query = query.bind(owner_id);
        }

        query.fetch_all(pool).await
    }

    /// Finds a task by ID within `scope`
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: i64,
        scope: OwnerScope,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sql = format!("SELECT {COLUMNS} FROM tasks WHERE id = ?");
        if matches!(scope, OwnerScope::Owner(_)) {
            sql.push_str(" AND owner_id = ?");
        }

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(id);
        if let OwnerScope::Owner(owner_id) = scope {
            query = query.bind(owner_id);
        }

        query.fetch_optional(pool).await
    }

    /// Creates a task owned by `owner_id`
    ///
    /// Both timestamps are set to the same server-side instant.
    pub async fn create(
        pool: &SqlitePool,
        owner_id: i64,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO tasks (owner_id, title, description, status, assignee, priority, \
             created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.assignee)
            .bind(data.priority)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Applies a partial update within `scope`
    ///
    /// `updated_at` is refreshed unconditionally, even for an empty update.
    /// Returns `None` when the id is absent or owned by someone outside the
    /// scope; the two cases are indistinguishable on purpose.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        scope: OwnerScope,
        data: &UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sql = String::from(
            "UPDATE tasks SET \
             title = COALESCE(?, title), \
             description = COALESCE(?, description), \
             status = COALESCE(?, status), \
             assignee = COALESCE(?, assignee), \
             priority = COALESCE(?, priority), \
             updated_at = ? \
             WHERE id = ?",
        );
        if matches!(scope, OwnerScope::Owner(_)) {
            sql.push_str(" AND owner_id = ?");
        }
        sql.push_str(&format!(" RETURNING {COLUMNS}"));

        let mut query = sqlx::query_as::<_, Task>(&sql)
            .bind(data.title.clone())
            .bind(data.description.clone())
            .bind(data.status)
            .bind(data.assignee.clone())
            .bind(data.priority)
            .bind(Utc::now())
            .bind(id);
        if let OwnerScope::Owner(owner_id) = scope {
            query = query.bind(owner_id);
        }

        query.fetch_optional(pool).await
    }

    /// Deletes a task within `scope`; returns whether a row was removed
    pub async fn delete(
        pool: &SqlitePool,
        id: i64,
        scope: OwnerScope,
    ) -> Result<bool, sqlx::Error> {
        let mut sql = String::from("DELETE FROM tasks WHERE id = ?");
        if matches!(scope, OwnerScope::Owner(_)) {
            sql.push_str(" AND owner_id = ?");
        }

        let mut query = sqlx::query(&sql).bind(id);
        if let OwnerScope::Owner(owner_id) = scope {
            query = query.bind(owner_id);
        }

        let result = query.execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Applies the same scoped update to each id; returns how many rows changed
    ///
    /// Ids outside the scope are skipped, matching the single-item outcome.
    pub async fn update_many(
        pool: &SqlitePool,
        ids: &[i64],
        scope: OwnerScope,
        data: &UpdateTask,
    ) -> Result<u64, sqlx::Error> {
        let mut updated = 0;
        for &id in ids {
            if Self::update(pool, id, scope, data).await?.is_some() {
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Deletes each id within `scope`; returns how many rows were removed
    pub async fn delete_many(
        pool: &SqlitePool,
        ids: &[i64],
        scope: OwnerScope,
    ) -> Result<u64, sqlx::Error> {
        let mut deleted = 0;
        for &id in ids {
            if Self::delete(pool, id, scope).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Counts tasks per status within `scope`
    pub async fn stats(pool: &SqlitePool, scope: OwnerScope) -> Result<TaskStats, sqlx::Error> {
        let mut sql = String::from("SELECT status, COUNT(*) FROM tasks");
        if matches!(scope, OwnerScope::Owner(_)) {
            sql.push_str(" WHERE owner_id = ?");
        }
        sql.push_str(" GROUP BY status");

        let mut query = sqlx::query_as::<_, (TaskStatus, i64)>(&sql);
        if let OwnerScope::Owner(owner_id) = scope {
            query = query.bind(owner_id);
        }

        let rows = query.fetch_all(pool).await?;

        let mut stats = TaskStats::default();
        for (status, count) in rows {
            match status {
                TaskStatus::Open => stats.open = count,
                TaskStatus::InProgress => stats.in_progress = count,
                TaskStatus::Closed => stats.closed = count,
            }
        }
        Ok(stats)
    }
}
