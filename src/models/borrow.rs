//! Borrow (loan) model and fine arithmetic

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Maximum number of concurrent unreturned borrows per user
pub const BORROW_LIMIT: i64 = 3;

/// Loan duration in days
pub const LOAN_DAYS: i64 = 14;

/// Fine charged per overdue day, in dollars
pub const DAILY_FINE: Decimal = Decimal::ONE;

/// Borrow record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowedBook {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    /// Fine recorded at return time
    #[schema(value_type = f64)]
    pub fine: Decimal,
}

/// Borrow record with book summary for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub book_id: i32,
    pub title: String,
    pub isbn: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub is_overdue: bool,
    /// Fine accrued so far at $1/day
    #[schema(value_type = f64)]
    pub accrued_fine: Decimal,
}

/// Open loan joined with borrower contact details, for the reminder sweep
#[derive(Debug, Clone, FromRow)]
pub struct ReminderLoan {
    pub borrow_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub book_title: String,
    pub due_date: DateTime<Utc>,
}

/// Borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrow {
    pub book_id: i32,
}

/// Return request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnBorrow {
    pub book_id: i32,
}

/// Borrowing limit summary for a user
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowLimit {
    pub borrowing_limit: i64,
    pub borrowed_count: i64,
    pub remaining: i64,
}

/// Whole days a loan is past due, never negative
pub fn overdue_days(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - due_date).num_days().max(0)
}

/// Fine owed for a loan at $1 per overdue day
pub fn fine_amount(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Decimal {
    Decimal::from(overdue_days(due_date, now)) * DAILY_FINE
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn no_fine_before_due_date() {
        let now = Utc::now();
        let due = now + Duration::days(3);
        assert_eq!(overdue_days(due, now), 0);
        assert_eq!(fine_amount(due, now), Decimal::ZERO);
    }

    #[test]
    fn no_fine_on_due_date() {
        let now = Utc::now();
        assert_eq!(overdue_days(now, now), 0);
    }

    #[test]
    fn fine_is_one_dollar_per_whole_day() {
        let now = Utc::now();
        let due = now - Duration::days(5);
        assert_eq!(overdue_days(due, now), 5);
        assert_eq!(fine_amount(due, now), Decimal::from(5));
    }

    #[test]
    fn partial_days_are_floored() {
        let now = Utc::now();
        let due = now - Duration::hours(26);
        assert_eq!(overdue_days(due, now), 1);
        assert_eq!(fine_amount(due, now), Decimal::ONE);
    }
}
