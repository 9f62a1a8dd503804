//! Usage analytics endpoints (admin only)

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Entry in the most-borrowed ranking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MostBorrowedBook {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub borrow_count: i64,
}

/// One borrow in a monthly report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyBorrowEntry {
    pub id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub book_id: i32,
    pub title: String,
    pub isbn: String,
    pub user_id: i32,
    pub user_name: String,
}

/// Monthly usage report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub total_borrowed: i64,
    pub users_involved: i64,
    pub borrows: Vec<MonthlyBorrowEntry>,
}

/// Monthly report query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthlyReportQuery {
    /// Month (1-12), defaults to the current month
    pub month: Option<u32>,
    /// Year, defaults to the current year
    pub year: Option<i32>,
}

/// Top 10 most borrowed books
#[utoipa::path(
    get,
    path = "/analytics/most-borrowed",
    tag = "analytics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Most borrowed books", body = Vec<MostBorrowedBook>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn most_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MostBorrowedBook>>> {
    claims.require_admin()?;

    let books = state.services.analytics.most_borrowed().await?;
    Ok(Json(books))
}

/// Monthly usage report
#[utoipa::path(
    get,
    path = "/analytics/monthly-report",
    tag = "analytics",
    security(("bearer_auth" = [])),
    params(MonthlyReportQuery),
    responses(
        (status = 200, description = "Monthly usage report", body = MonthlyReport),
        (status = 400, description = "Invalid month"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn monthly_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MonthlyReportQuery>,
) -> AppResult<Json<MonthlyReport>> {
    claims.require_admin()?;

    let report = state
        .services
        .analytics
        .monthly_report(query.month, query.year)
        .await?;
    Ok(Json(report))
}
