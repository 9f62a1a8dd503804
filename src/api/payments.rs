//! Fine payment and invoicing endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::transaction::{Invoice, PayFine, Transaction},
};

use super::AuthenticatedUser;

/// Payment response with the recorded transaction
#[derive(Serialize, ToSchema)]
pub struct PaymentResponse {
    pub message: String,
    pub transaction: Transaction,
}

/// Pay the fine on a borrow record
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    security(("bearer_auth" = [])),
    request_body = PayFine,
    responses(
        (status = 200, description = "Fine paid", body = PaymentResponse),
        (status = 404, description = "Borrowing record not found"),
        (status = 422, description = "No fine due or insufficient payment")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<PayFine>,
) -> AppResult<Json<PaymentResponse>> {
    let transaction = state
        .services
        .payments
        .pay_fine(claims.user_id, request.borrowed_book_id, request.amount)
        .await?;

    Ok(Json(PaymentResponse {
        message: "Fine paid successfully".to_string(),
        transaction,
    }))
}

/// Generate an invoice for a past transaction
#[utoipa::path(
    get,
    path = "/payments/{id}/invoice",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Invoice", body = Invoice),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn generate_invoice(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Invoice>> {
    let invoice = state.services.payments.generate_invoice(id).await?;
    Ok(Json(invoice))
}
