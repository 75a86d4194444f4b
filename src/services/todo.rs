//! Todo service: search/filter/paginate listing and owner-guarded mutations.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PageUrl, PagedResult, Pagination};
use crate::models::todo::{CreateTodo, Priority, Todo, UpdateTodo};

/// Completion filter for list queries; `All` applies no predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// The `completed` predicate value this filter selects, if any.
    pub fn as_completed(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(false),
            Self::Completed => Some(true),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Priority filter for list queries; `All` applies no predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    /// The priority this filter selects, if any.
    pub fn as_priority(self) -> Option<Priority> {
        match self {
            Self::All => None,
            Self::Low => Some(Priority::Low),
            Self::Medium => Some(Priority::Medium),
            Self::High => Some(Priority::High),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Filters for listing todos. Status and priority are applied server-side
/// together with search, so one page of results is always internally
/// consistent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoFilters {
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub priority: PriorityFilter,
}

impl TodoFilters {
    /// The search term, with empty and whitespace-only input treated as absent.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Echo the active filters into pagination link generation.
    fn apply_to(&self, mut url: PageUrl) -> PageUrl {
        if let Some(term) = self.search_term() {
            url = url.with_param("search", term);
        }
        if self.status != StatusFilter::All {
            url = url.with_param("status", self.status.as_str());
        }
        if self.priority != PriorityFilter::All {
            url = url.with_param("priority", self.priority.as_str());
        }
        url
    }
}

/// List one page of the owner's todos, newest first.
///
/// Ordering is `created_at DESC` with `id DESC` as the tie-break; todo
/// ids are UUIDv7, so ties resolve in insertion order.
pub async fn list(
    pool: &PgPool,
    owner_id: Uuid,
    filters: &TodoFilters,
    pagination: &Pagination,
    base_path: &str,
) -> Result<PagedResult<Todo>, AppError> {
    let mut conditions = vec!["user_id = $1".to_string()];
    let mut param_index = 1u32;

    if filters.search_term().is_some() {
        param_index += 1;
        conditions.push(format!(
            "(title ILIKE ${param_index} OR description ILIKE ${param_index})"
        ));
    }
    if filters.status.as_completed().is_some() {
        param_index += 1;
        conditions.push(format!("completed = ${param_index}"));
    }
    if filters.priority.as_priority().is_some() {
        param_index += 1;
        conditions.push(format!("priority = ${param_index}"));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));
    let count_sql = format!("SELECT COUNT(*) FROM todos {where_clause}");
    let data_sql = format!(
        "SELECT * FROM todos {where_clause} \
         ORDER BY created_at DESC, id DESC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner_id);
    let mut data_query = sqlx::query_as::<_, Todo>(&data_sql).bind(owner_id);

    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if let Some(term) = filters.search_term() {
        let pattern = format!("%{term}%");
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }
    if let Some(completed) = filters.status.as_completed() {
        bind_both!(completed);
    }
    if let Some(priority) = filters.priority.as_priority() {
        bind_both!(priority);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    let url = filters.apply_to(PageUrl::new(base_path));
    Ok(PagedResult::new(items, total, pagination, &url))
}

/// Verify the requester owns the todo. Ownership violations are fatal for
/// the request, not recoverable.
pub fn require_ownership(todo: &Todo, requester_id: Uuid) -> Result<(), AppError> {
    if todo.user_id != requester_id {
        return Err(AppError::Forbidden(
            "This todo belongs to another user".to_string(),
        ));
    }
    Ok(())
}

/// Fetch a todo by id, without an ownership check.
async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Todo, AppError> {
    sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))
}

/// Fetch a todo the requester owns.
pub async fn find_owned(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<Todo, AppError> {
    let todo = find_by_id(pool, id).await?;
    require_ownership(&todo, owner_id)?;
    Ok(todo)
}

/// Create a todo owned by `owner_id`. Starts uncompleted.
pub async fn create(pool: &PgPool, owner_id: Uuid, input: &CreateTodo) -> Result<Todo, AppError> {
    input.validate_fields()?;

    let todo = sqlx::query_as::<_, Todo>(
        r#"
        INSERT INTO todos (id, user_id, title, description, priority, start_date, end_date, completed)
        VALUES ($1, $2, $3, $4, $5, $6, $7, false)
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(owner_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.priority)
    .bind(input.start_date)
    .bind(input.end_date)
    .fetch_one(pool)
    .await?;

    Ok(todo)
}

/// Update a todo's editable fields. `id`, `user_id`, and `created_at`
/// never change; `completed` only changes when the payload carries it.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    input: &UpdateTodo,
) -> Result<Todo, AppError> {
    input.validate_fields()?;
    let existing = find_owned(pool, id, owner_id).await?;

    let todo = sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos SET
            title = $2,
            description = $3,
            priority = $4,
            start_date = $5,
            end_date = $6,
            completed = COALESCE($7, completed),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.priority)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.completed)
    .fetch_one(pool)
    .await?;

    Ok(todo)
}

/// Flip the completion flag, touching nothing else.
pub async fn toggle(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<Todo, AppError> {
    let existing = find_owned(pool, id, owner_id).await?;

    let todo = sqlx::query_as::<_, Todo>(
        "UPDATE todos SET completed = NOT completed, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(existing.id)
    .fetch_one(pool)
    .await?;

    Ok(todo)
}

/// Permanently delete a todo. No soft-delete, no recovery.
pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
    let existing = find_owned(pool, id, owner_id).await?;

    sqlx::query("DELETE FROM todos WHERE id = $1")
        .bind(existing.id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn todo_owned_by(owner: Uuid) -> Todo {
        Todo {
            id: Uuid::now_v7(),
            user_id: owner,
            title: "Water the plants".to_string(),
            description: None,
            priority: Priority::Medium,
            start_date: Utc::now(),
            end_date: Utc::now(),
            completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn ownership_guard_accepts_owner() {
        let owner = Uuid::new_v4();
        let todo = todo_owned_by(owner);
        assert!(require_ownership(&todo, owner).is_ok());
    }

    #[test]
    fn ownership_guard_rejects_other_user() {
        let todo = todo_owned_by(Uuid::new_v4());
        let err = require_ownership(&todo, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn blank_search_is_treated_as_absent() {
        let filters = TodoFilters {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.search_term(), None);

        let filters = TodoFilters {
            search: Some("  proj ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.search_term(), Some("proj"));
    }

    #[test]
    fn status_filter_maps_to_completed_predicate() {
        assert_eq!(StatusFilter::All.as_completed(), None);
        assert_eq!(StatusFilter::Active.as_completed(), Some(false));
        assert_eq!(StatusFilter::Completed.as_completed(), Some(true));
    }

    #[test]
    fn priority_filter_maps_to_priority_predicate() {
        assert_eq!(PriorityFilter::All.as_priority(), None);
        assert_eq!(PriorityFilter::High.as_priority(), Some(Priority::High));
    }

    #[test]
    fn filters_deserialize_from_query_params() {
        let filters: TodoFilters =
            serde_json::from_str(r#"{"search": "proj", "status": "completed", "priority": "high"}"#)
                .unwrap();
        assert_eq!(filters.search_term(), Some("proj"));
        assert_eq!(filters.status, StatusFilter::Completed);
        assert_eq!(filters.priority, PriorityFilter::High);

        // Every field is optional.
        let filters: TodoFilters = serde_json::from_str("{}").unwrap();
        assert_eq!(filters.status, StatusFilter::All);
        assert_eq!(filters.priority, PriorityFilter::All);
    }

    #[test]
    fn page_links_carry_active_filters() {
        let filters = TodoFilters {
            search: Some("weekly report".to_string()),
            status: StatusFilter::Active,
            priority: PriorityFilter::All,
        };
        let url = filters.apply_to(PageUrl::new("/api/v1/todos"));
        assert_eq!(
            url.page(3),
            "/api/v1/todos?search=weekly+report&status=active&page=3"
        );
    }

    #[test]
    fn default_filters_add_no_link_params() {
        let url = TodoFilters::default().apply_to(PageUrl::new("/api/v1/todos"));
        assert_eq!(url.page(1), "/api/v1/todos?page=1");
    }
}
