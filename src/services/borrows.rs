//! Borrowing workflow and fine calculation service

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{
        fine_amount, overdue_days, BorrowDetails, BorrowLimit, BorrowedBook, BORROW_LIMIT,
        LOAN_DAYS,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a user; enforces the three-book cap and availability
    pub async fn borrow_book(&self, user_id: i32, book_id: i32) -> AppResult<BorrowedBook> {
        let open = self.repository.borrows.count_open(user_id).await?;
        if open >= BORROW_LIMIT {
            return Err(AppError::BusinessRule(
                "Borrowing limit reached. Return a book to borrow another.".to_string(),
            ));
        }

        let book = self.repository.books.get_by_id(book_id).await?;
        if book.deleted_at.is_some() || book.copies <= 0 {
            return Err(AppError::NotFound("Book not available".to_string()));
        }

        let due_date = Utc::now() + Duration::days(LOAN_DAYS);
        self.repository.borrows.create(user_id, book_id, due_date).await
    }

    /// Return the user's open borrow of a book, recording the accrued fine
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<Decimal> {
        let borrow = self
            .repository
            .borrows
            .find_open(user_id, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Borrowing record not found".to_string()))?;

        let now = Utc::now();
        let fine = fine_amount(borrow.due_date, now);

        self.repository
            .borrows
            .mark_returned(borrow.id, now, fine)
            .await?;

        Ok(fine)
    }

    /// Borrowing limit summary for a user
    pub async fn check_limit(&self, user_id: i32) -> AppResult<BorrowLimit> {
        let borrowed_count = self.repository.borrows.count_open(user_id).await?;

        Ok(BorrowLimit {
            borrowing_limit: BORROW_LIMIT,
            borrowed_count,
            remaining: (BORROW_LIMIT - borrowed_count).max(0),
        })
    }

    /// Live fine for a single borrow record: (overdue days, fine)
    pub async fn calculate_fine(&self, borrow_id: i32) -> AppResult<(i64, Decimal)> {
        let borrow = self.repository.borrows.get_by_id(borrow_id).await?;

        // A returned loan accrues nothing further
        if borrow.returned_at.is_some() {
            return Ok((0, Decimal::ZERO));
        }

        let now = Utc::now();
        Ok((
            overdue_days(borrow.due_date, now),
            fine_amount(borrow.due_date, now),
        ))
    }

    /// Sum of live fines over the user's open borrows
    pub async fn total_fine(&self, user_id: i32) -> AppResult<Decimal> {
        let borrows = self.repository.borrows.open_for_user(user_id).await?;
        let now = Utc::now();

        Ok(borrows
            .iter()
            .map(|b| fine_amount(b.due_date, now))
            .sum())
    }

    /// Open borrows with book summaries plus the live total fine
    pub async fn track_user_borrows(
        &self,
        user_id: i32,
    ) -> AppResult<(Vec<BorrowDetails>, Decimal)> {
        self.repository.users.get_by_id(user_id).await?;

        let borrows = self
            .repository
            .borrows
            .open_for_user_with_books(user_id)
            .await?;
        let total = borrows.iter().map(|b| b.accrued_fine).sum();

        Ok((borrows, total))
    }
}
