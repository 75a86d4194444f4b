//! Dashboard routes: aggregated statistics for the overview page.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::stats::{self as stats_service, StatsSnapshot};
use crate::AppState;

/// GET /api/v1/dashboard/stats — counts and week-over-week deltas for the
/// caller's entire todo collection.
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<StatsSnapshot>>, AppError> {
    let stats = stats_service::compute_stats(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(stats))
}
