//! Payment transaction and invoice models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Payment transaction from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    pub borrowed_book_id: i32,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
}

/// Pay fine request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PayFine {
    pub borrowed_book_id: i32,
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

/// Invoice built from a transaction with user and book summaries
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Invoice {
    pub transaction_id: i32,
    pub user: InvoiceUser,
    pub book: InvoiceBook,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceBook {
    pub title: String,
    pub isbn: String,
}
