//! Transactions repository for database operations

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::transaction::{Invoice, InvoiceBook, InvoiceUser, Transaction},
};

#[derive(Clone)]
pub struct TransactionsRepository {
    pool: Pool<Postgres>,
}

impl TransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Settle the fine on a borrow record and record the payment, atomically.
    /// The row lock keeps concurrent payments from both passing the fine check.
    pub async fn settle_fine(
        &self,
        user_id: i32,
        borrowed_book_id: i32,
        amount: Decimal,
    ) -> AppResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        let fine: Decimal = sqlx::query_scalar(
            "SELECT fine FROM borrowed_books WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(borrowed_book_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Borrowing record not found".to_string()))?;

        if fine <= Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "No fines to pay for this record".to_string(),
            ));
        }

        if amount < fine {
            return Err(AppError::BusinessRule(format!(
                "Insufficient payment. Fine is {}.",
                fine
            )));
        }

        sqlx::query("UPDATE borrowed_books SET fine = 0 WHERE id = $1")
            .bind(borrowed_book_id)
            .execute(&mut *tx)
            .await?;

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, borrowed_book_id, amount, payment_date)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(borrowed_book_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    /// Build an invoice from a transaction joined with user and book
    pub async fn get_invoice(&self, id: i32) -> AppResult<Invoice> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.amount, t.payment_date,
                   u.name as user_name, u.email as user_email,
                   b.title as book_title, b.isbn as book_isbn
            FROM transactions t
            JOIN users u ON t.user_id = u.id
            JOIN borrowed_books bb ON t.borrowed_book_id = bb.id
            JOIN books b ON bb.book_id = b.id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

        Ok(Invoice {
            transaction_id: row.get("id"),
            user: InvoiceUser {
                name: row.get("user_name"),
                email: row.get("user_email"),
            },
            book: InvoiceBook {
                title: row.get("book_title"),
                isbn: row.get("book_isbn"),
            },
            amount: row.get("amount"),
            payment_date: row.get("payment_date"),
        })
    }
}
