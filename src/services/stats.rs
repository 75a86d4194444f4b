//! Dashboard statistics: current totals and week-over-week deltas.

use chrono::{DateTime, Duration, NaiveTime, Utc, Weekday};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Aggregate counts for one owner, with percentage change versus the
/// prior calendar week.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total: i64,
    pub completed: i64,
    pub active: i64,
    pub high_priority: i64,
    pub total_change: i64,
    pub completed_change: i64,
    pub active_change: i64,
    pub high_priority_change: i64,
}

/// One set of counts over a todo collection.
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct TodoCounts {
    pub total: i64,
    pub completed: i64,
    pub active: i64,
    pub high_priority: i64,
}

impl StatsSnapshot {
    /// Assemble the snapshot from current and prior-week counts.
    fn from_counts(current: TodoCounts, prior: TodoCounts) -> Self {
        Self {
            total: current.total,
            completed: current.completed,
            active: current.active,
            high_priority: current.high_priority,
            total_change: percent_change(current.total, prior.total),
            completed_change: percent_change(current.completed, prior.completed),
            active_change: percent_change(current.active, prior.active),
            high_priority_change: percent_change(current.high_priority, prior.high_priority),
        }
    }
}

/// Week-over-week change in percent, rounded half away from zero.
///
/// A prior count of zero yields exactly 0 rather than a division error,
/// so a jump from zero to N also reports 0% — intentional, documented
/// dashboard behavior.
fn percent_change(current: i64, prior: i64) -> i64 {
    if prior == 0 {
        return 0;
    }
    ((current - prior) as f64 / prior as f64 * 100.0).round() as i64
}

/// Start of the week (Monday 00:00:00 UTC) containing `now`.
fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .week(Weekday::Mon)
        .first_day()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// The prior calendar week as a half-open interval `[monday - 7d, monday)`.
///
/// The exclusive upper bound at this week's Monday 00:00 admits every
/// instant up to and including the prior Sunday 23:59:59.999999, matching
/// an inclusive Monday-to-Sunday week at the store's timestamp precision.
pub fn prior_week_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let current = week_start(now);
    (current - Duration::days(7), current)
}

/// Compute the dashboard snapshot over the owner's entire collection
/// (never the filtered/paginated view).
pub async fn compute_stats(pool: &PgPool, owner_id: Uuid) -> Result<StatsSnapshot, AppError> {
    let (prior_start, prior_end) = prior_week_window(Utc::now());
    let (current, prior) = tokio::try_join!(
        fetch_current_counts(pool, owner_id),
        fetch_prior_week_counts(pool, owner_id, prior_start, prior_end),
    )?;
    Ok(StatsSnapshot::from_counts(current, prior))
}

/// Count all of the owner's todos with conditional aggregation.
async fn fetch_current_counts(pool: &PgPool, owner_id: Uuid) -> Result<TodoCounts, AppError> {
    let row = sqlx::query_as::<_, TodoCounts>(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN completed THEN 1 ELSE 0 END), 0) AS completed,
            COALESCE(SUM(CASE WHEN NOT completed THEN 1 ELSE 0 END), 0) AS active,
            COALESCE(SUM(CASE WHEN priority = 'high' THEN 1 ELSE 0 END), 0) AS high_priority
        FROM todos
        WHERE user_id = $1
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Same counts restricted to todos created within the prior-week window.
async fn fetch_prior_week_counts(
    pool: &PgPool,
    owner_id: Uuid,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<TodoCounts, AppError> {
    let row = sqlx::query_as::<_, TodoCounts>(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN completed THEN 1 ELSE 0 END), 0) AS completed,
            COALESCE(SUM(CASE WHEN NOT completed THEN 1 ELSE 0 END), 0) AS active,
            COALESCE(SUM(CASE WHEN priority = 'high' THEN 1 ELSE 0 END), 0) AS high_priority
        FROM todos
        WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
        "#,
    )
    .bind(owner_id)
    .bind(window_start)
    .bind(window_end)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
