//! Todo routes: dashboard listing and owner-guarded mutations.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::todo::{CreateTodo, Todo, UpdateTodo};
use crate::services::stats::{self as stats_service, StatsSnapshot};
use crate::services::todo::{self as todo_service, TodoFilters};
use crate::AppState;

/// Path used when generating pagination links.
const TODOS_PATH: &str = "/api/v1/todos";

/// Listing payload: one page of todos, dashboard stats over the whole
/// collection, and the filter state echoed back to the client.
#[derive(Debug, Serialize)]
pub struct TodoListPage {
    pub todos: PagedResult<Todo>,
    pub stats: StatsSnapshot,
    pub filters: TodoFilters,
}

/// GET /api/v1/todos — search, filter, paginate, plus dashboard stats.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<TodoFilters>,
) -> Result<Json<ApiResponse<TodoListPage>>, AppError> {
    let (todos, stats) = tokio::try_join!(
        todo_service::list(&state.db, current_user.id, &filters, &pagination, TODOS_PATH),
        stats_service::compute_stats(&state.db, current_user.id),
    )?;

    Ok(ApiResponse::success(TodoListPage {
        todos,
        stats,
        filters,
    }))
}

/// POST /api/v1/todos — create a todo owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateTodo>,
) -> Result<Json<ApiResponse<Todo>>, AppError> {
    let todo = todo_service::create(&state.db, current_user.id, &body).await?;
    Ok(ApiResponse::success(todo))
}

/// PUT /api/v1/todos/{id} — update a todo's editable fields.
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTodo>,
) -> Result<Json<ApiResponse<Todo>>, AppError> {
    let todo = todo_service::update(&state.db, id, current_user.id, &body).await?;
    Ok(ApiResponse::success(todo))
}

/// PATCH /api/v1/todos/{id}/toggle — flip the completion flag.
pub async fn toggle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Todo>>, AppError> {
    let todo = todo_service::toggle(&state.db, id, current_user.id).await?;
    Ok(ApiResponse::success(todo))
}

/// DELETE /api/v1/todos/{id} — permanent removal.
pub async fn destroy(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    todo_service::delete(&state.db, id, current_user.id).await?;
    Ok(ApiResponse::success("Todo deleted"))
}
