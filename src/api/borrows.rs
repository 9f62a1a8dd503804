//! Borrowing workflow endpoints

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrow::{BorrowLimit, CreateBorrow, ReturnBorrow},
};

use super::AuthenticatedUser;

/// Borrow response with the calculated due date
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Borrow record ID
    pub id: i32,
    /// Due date (ISO 8601 format)
    pub due_date: DateTime<Utc>,
    /// Status message
    pub message: String,
}

/// Return response with the recorded fine
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    /// Fine owed for the returned loan
    #[schema(value_type = f64)]
    pub fine: Decimal,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 404, description = "Book not available"),
        (status = 422, description = "Borrowing limit reached")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let borrow = state
        .services
        .borrows
        .borrow_book(claims.user_id, request.book_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            id: borrow.id,
            due_date: borrow.due_date,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = ReturnBorrow,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Borrowing record not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ReturnBorrow>,
) -> AppResult<Json<ReturnResponse>> {
    let fine = state
        .services
        .borrows
        .return_book(claims.user_id, request.book_id)
        .await?;

    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
        fine,
    }))
}

/// Check the caller's borrowing limit
#[utoipa::path(
    get,
    path = "/borrow/limit",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowing limit summary", body = BorrowLimit),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn check_limit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BorrowLimit>> {
    let limit = state.services.borrows.check_limit(claims.user_id).await?;
    Ok(Json(limit))
}
