//! Fine calculation endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Fine calculation for a single borrow record
#[derive(Serialize, ToSchema)]
pub struct FineResponse {
    pub overdue_days: i64,
    #[schema(value_type = f64)]
    pub fine: Decimal,
}

/// Total fine across the caller's open borrows
#[derive(Serialize, ToSchema)]
pub struct TotalFineResponse {
    #[schema(value_type = f64)]
    pub total_fine: Decimal,
}

/// Calculate the live fine for a borrow record
#[utoipa::path(
    get,
    path = "/fines/{borrow_id}",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(
        ("borrow_id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Fine calculated", body = FineResponse),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn calculate_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<FineResponse>> {
    let (overdue_days, fine) = state.services.borrows.calculate_fine(borrow_id).await?;

    Ok(Json(FineResponse { overdue_days, fine }))
}

/// Total fines owed by the caller
#[utoipa::path(
    get,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Total fine", body = TotalFineResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn total_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<TotalFineResponse>> {
    let total_fine = state.services.borrows.total_fine(claims.user_id).await?;

    Ok(Json(TotalFineResponse { total_fine }))
}
