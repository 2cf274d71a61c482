/// Task endpoints
///
/// All routes here sit behind the JWT middleware layer; handlers read the
/// caller's [`AuthContext`] from request extensions and derive an
/// [`OwnerScope`] from it, so regular users only ever touch rows they own
/// while admin tokens are unscoped. Deletion (single and bulk) additionally
/// requires the admin role.
///
/// # Endpoints
///
/// - `GET    /api/tasks?status=&assignee=&priority=&sort=`
/// - `GET    /api/tasks/stats`
/// - `GET    /api/tasks/:id`
/// - `POST   /api/tasks`
/// - `PUT    /api/tasks/:id`
/// - `DELETE /api/tasks/:id` (admin)
/// - `POST   /api/tasks/bulk/update`
/// - `POST   /api/tasks/bulk/delete` (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskFilter, TaskSort, TaskStats, TaskStatus, UpdateTask},
};
use validator::Validate;

/// Create-task request body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    #[validate(length(min = 1, max = 100, message = "Assignee must be 1-100 characters"))]
    pub assignee: String,

    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: i64,
}

fn default_priority() -> i64 {
    3
}

/// Update-task request body; omitted fields keep their current value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    #[validate(length(min = 1, max = 100, message = "Assignee must be 1-100 characters"))]
    pub assignee: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: Option<i64>,
}

impl UpdateTaskRequest {
    fn into_update(self) -> UpdateTask {
        UpdateTask {
            title: self.title,
            description: self.description,
            status: self.status,
            assignee: self.assignee,
            priority: self.priority,
        }
    }
}

/// List query parameters
///
/// Values arrive as raw strings so empty parameters (`?status=&sort=`) read
/// as "no filter" instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
}

impl ListTasksQuery {
    fn into_filter(self) -> Result<(TaskFilter, TaskSort), ApiError> {
        let status = match non_empty(self.status) {
            Some(raw) => Some(raw.parse::<TaskStatus>().map_err(|_| {
                ApiError::BadRequest(format!("Unknown status filter: {}", raw))
            })?),
            None => None,
        };

        let priority = match non_empty(self.priority) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                ApiError::BadRequest(format!("Priority filter must be an integer: {}", raw))
            })?),
            None => None,
        };

        // unknown sort keys fall back to the default column
        let sort = TaskSort::from_param(self.sort.as_deref());

        Ok((
            TaskFilter {
                status,
                assignee: non_empty(self.assignee),
                priority,
            },
            sort,
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// List response
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    pub data: Vec<Task>,
    pub total: usize,
}

/// Create response
#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub id: i64,
}

/// Bulk update request body
#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpdateRequest {
    #[validate(length(min = 1, max = 100, message = "ids must contain 1-100 entries"))]
    pub ids: Vec<i64>,

    #[validate(nested)]
    pub updates: UpdateTaskRequest,
}

/// Bulk delete request body
#[derive(Debug, Deserialize, Validate)]
pub struct BulkIdsRequest {
    #[validate(length(min = 1, max = 100, message = "ids must contain 1-100 entries"))]
    pub ids: Vec<i64>,
}

/// Bulk update response
#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    /// Rows actually changed within the caller's scope
    pub updated: u64,
}

/// `GET /api/tasks` — list tasks with optional filters and sort
pub async fn list_tasks(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ListTasksResponse>> {
    let (filter, sort) = query.into_filter()?;

    let tasks = Task::list(&state.db, auth.scope(), &filter, sort).await?;
    let total = tasks.len();

    Ok(Json(ListTasksResponse { data: tasks, total }))
}

/// `GET /api/tasks/stats` — counts per status
pub async fn task_stats(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
) -> ApiResult<Json<TaskStats>> {
    let stats = Task::stats(&state.db, auth.scope()).await?;
    Ok(Json(stats))
}

/// `GET /api/tasks/:id`
pub async fn get_task(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id, auth.scope())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// `POST /api/tasks`
pub async fn create_task(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        auth.user_id,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignee: req.assignee,
            priority: req.priority,
        },
    )
    .await?;

    tracing::debug!(task_id = task.id, owner_id = auth.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(CreateTaskResponse { id: task.id })))
}

/// `PUT /api/tasks/:id` — partial update
pub async fn update_task(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::update(&state.db, id, auth.scope(), &req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// `DELETE /api/tasks/:id` — admin only
pub async fn delete_task(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;

    let deleted = Task::delete(&state.db, id, auth.scope()).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::debug!(task_id = id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/tasks/bulk/update` — bounded list of ids, same scoping as the
/// single-item route
pub async fn bulk_update_tasks(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BulkUpdateRequest>,
) -> ApiResult<Json<BulkUpdateResponse>> {
    req.validate()?;

    let updated = Task::update_many(
        &state.db,
        &req.ids,
        auth.scope(),
        &req.updates.into_update(),
    )
    .await?;

    Ok(Json(BulkUpdateResponse { updated }))
}

/// `POST /api/tasks/bulk/delete` — admin only
pub async fn bulk_delete_tasks(
    Extension(auth): Extension<AuthContext>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BulkIdsRequest>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;
    req.validate()?;

    let deleted = Task::delete_many(&state.db, &req.ids, auth.scope()).await?;

    tracing::debug!(requested = req.ids.len(), deleted, "Bulk delete");

    Ok(StatusCode::NO_CONTENT)
}
