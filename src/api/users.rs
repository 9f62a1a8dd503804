//! User account endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        borrow::BorrowDetails,
        user::{UpdateAccountStatus, User},
    },
};

use super::AuthenticatedUser;

/// Open borrows with the live total fine
#[derive(Serialize, ToSchema)]
pub struct UserBorrowsResponse {
    pub borrowed_books: Vec<BorrowDetails>,
    #[schema(value_type = f64)]
    pub total_fine: Decimal,
}

/// Account status change confirmation
#[derive(Serialize, ToSchema)]
pub struct AccountStatusResponse {
    pub message: String,
    pub user: User,
}

/// Get user details (self or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    claims.require_self(id)?;

    let user = state.services.auth.get_user(id).await?;
    Ok(Json(user))
}

/// List the user's open borrows with accrued fines (self or admin)
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Open borrows and total fine", body = UserBorrowsResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<UserBorrowsResponse>> {
    claims.require_self(id)?;

    let (borrowed_books, total_fine) = state.services.borrows.track_user_borrows(id).await?;

    Ok(Json(UserBorrowsResponse {
        borrowed_books,
        total_fine,
    }))
}

/// Disable or re-enable a user account (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}/account-status",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateAccountStatus,
    responses(
        (status = 200, description = "Account status updated", body = AccountStatusResponse),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_account_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAccountStatus>,
) -> AppResult<Json<AccountStatusResponse>> {
    claims.require_admin()?;

    let user = state
        .services
        .auth
        .set_account_status(id, request.disabled)
        .await?;

    let action = if request.disabled { "disabled" } else { "enabled" };

    Ok(Json(AccountStatusResponse {
        message: format!("User account has been {}", action),
        user,
    }))
}
