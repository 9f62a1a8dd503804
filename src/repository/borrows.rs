//! Borrows repository for database operations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{fine_amount, BorrowDetails, BorrowedBook, ReminderLoan},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowedBook> {
        sqlx::query_as::<_, BorrowedBook>("SELECT * FROM borrowed_books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", id)))
    }

    /// Count unreturned borrows for a user
    pub async fn count_open(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowed_books WHERE user_id = $1 AND returned_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Find the open borrow for a (user, book) pair
    pub async fn find_open(&self, user_id: i32, book_id: i32) -> AppResult<Option<BorrowedBook>> {
        let borrow = sqlx::query_as::<_, BorrowedBook>(
            r#"
            SELECT * FROM borrowed_books
            WHERE user_id = $1 AND book_id = $2 AND returned_at IS NULL
            ORDER BY borrowed_at
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(borrow)
    }

    /// Create a borrow and decrement the book's shelf count, atomically
    pub async fn create(
        &self,
        user_id: i32,
        book_id: i32,
        due_date: DateTime<Utc>,
    ) -> AppResult<BorrowedBook> {
        let mut tx = self.pool.begin().await?;

        // Guards against racing borrows draining the last copy
        let decremented = sqlx::query(
            "UPDATE books SET copies = copies - 1 WHERE id = $1 AND copies > 0 AND deleted_at IS NULL",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not available".to_string()));
        }

        let borrow = sqlx::query_as::<_, BorrowedBook>(
            r#"
            INSERT INTO borrowed_books (user_id, book_id, due_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(borrow)
    }

    /// Close a borrow with its fine and put the copy back on the shelf
    pub async fn mark_returned(
        &self,
        id: i32,
        returned_at: DateTime<Utc>,
        fine: Decimal,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let book_id: i32 = sqlx::query_scalar(
            r#"
            UPDATE borrowed_books SET returned_at = $1, fine = $2
            WHERE id = $3 AND returned_at IS NULL
            RETURNING book_id
            "#,
        )
        .bind(returned_at)
        .bind(fine)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Borrowing record not found".to_string()))?;

        sqlx::query("UPDATE books SET copies = copies + 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Open borrows for a user
    pub async fn open_for_user(&self, user_id: i32) -> AppResult<Vec<BorrowedBook>> {
        let borrows = sqlx::query_as::<_, BorrowedBook>(
            r#"
            SELECT * FROM borrowed_books
            WHERE user_id = $1 AND returned_at IS NULL
            ORDER BY due_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrows)
    }

    /// Open borrows for a user joined with book summaries
    pub async fn open_for_user_with_books(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT bb.id, bb.book_id, bb.borrowed_at, bb.due_date, b.title, b.isbn
            FROM borrowed_books bb
            JOIN books b ON bb.book_id = b.id
            WHERE bb.user_id = $1 AND bb.returned_at IS NULL
            ORDER BY bb.due_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();

        let result = rows
            .into_iter()
            .map(|row| {
                let due_date: DateTime<Utc> = row.get("due_date");
                BorrowDetails {
                    id: row.get("id"),
                    book_id: row.get("book_id"),
                    title: row.get("title"),
                    isbn: row.get("isbn"),
                    borrowed_at: row.get("borrowed_at"),
                    due_date,
                    is_overdue: due_date < now,
                    accrued_fine: fine_amount(due_date, now),
                }
            })
            .collect();

        Ok(result)
    }

    /// Unreturned loans falling due within the window, with borrower contacts
    pub async fn due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ReminderLoan>> {
        let loans = sqlx::query_as::<_, ReminderLoan>(
            r#"
            SELECT bb.id as borrow_id, u.name as user_name, u.email as user_email,
                   b.title as book_title, bb.due_date
            FROM borrowed_books bb
            JOIN users u ON bb.user_id = u.id
            JOIN books b ON bb.book_id = b.id
            WHERE bb.returned_at IS NULL AND bb.due_date >= $1 AND bb.due_date <= $2
            ORDER BY bb.due_date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Unreturned loans past their due date, with borrower contacts
    pub async fn overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<ReminderLoan>> {
        let loans = sqlx::query_as::<_, ReminderLoan>(
            r#"
            SELECT bb.id as borrow_id, u.name as user_name, u.email as user_email,
                   b.title as book_title, bb.due_date
            FROM borrowed_books bb
            JOIN users u ON bb.user_id = u.id
            JOIN books b ON bb.book_id = b.id
            WHERE bb.returned_at IS NULL AND bb.due_date < $1
            ORDER BY bb.due_date
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }
}
