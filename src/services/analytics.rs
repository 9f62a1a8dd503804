//! Usage analytics service

use chrono::{Datelike, TimeZone, Utc};
use sqlx::Row;

use crate::{
    api::analytics::{MonthlyBorrowEntry, MonthlyReport, MostBorrowedBook},
    error::{AppError, AppResult},
    repository::Repository,
    services::redis::RedisService,
};

/// Cache key prefix for analytics reads
const CACHE_PREFIX: &str = "analytics";

/// Number of books in the most-borrowed ranking
const MOST_BORROWED_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Repository,
    redis: RedisService,
}

impl AnalyticsService {
    pub fn new(repository: Repository, redis: RedisService) -> Self {
        Self { repository, redis }
    }

    /// Top books by all-time borrow count
    pub async fn most_borrowed(&self) -> AppResult<Vec<MostBorrowedBook>> {
        let cache_key = format!("{}:most-borrowed", CACHE_PREFIX);

        if let Some(cached) = self.redis.cache_get(&cache_key).await {
            return Ok(cached);
        }

        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.isbn, COUNT(bb.id) as borrow_count
            FROM borrowed_books bb
            JOIN books b ON bb.book_id = b.id
            GROUP BY b.id, b.title, b.isbn
            ORDER BY borrow_count DESC
            LIMIT $1
            "#,
        )
        .bind(MOST_BORROWED_LIMIT)
        .fetch_all(&self.repository.pool)
        .await?;

        let books: Vec<MostBorrowedBook> = rows
            .into_iter()
            .map(|row| MostBorrowedBook {
                id: row.get("id"),
                title: row.get("title"),
                isbn: row.get("isbn"),
                borrow_count: row.get("borrow_count"),
            })
            .collect();

        self.redis.cache_set(&cache_key, &books).await;

        Ok(books)
    }

    /// Usage report for a month; defaults to the current month
    pub async fn monthly_report(
        &self,
        month: Option<u32>,
        year: Option<i32>,
    ) -> AppResult<MonthlyReport> {
        let now = Utc::now();
        let month = month.unwrap_or(now.month());
        let year = year.unwrap_or(now.year());

        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest("Month must be between 1 and 12".to_string()));
        }

        let cache_key = format!("{}:monthly:{}:{}", CACHE_PREFIX, year, month);
        if let Some(cached) = self.redis.cache_get(&cache_key).await {
            return Ok(cached);
        }

        let start = Utc
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::BadRequest("Invalid month or year".to_string()))?;
        let end = if month == 12 {
            Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
        } else {
            Utc.with_ymd_and_hms(year, month + 1, 1, 0, 0, 0)
        }
        .single()
        .ok_or_else(|| AppError::BadRequest("Invalid month or year".to_string()))?;

        let rows = sqlx::query(
            r#"
            SELECT bb.id, bb.borrowed_at, bb.due_date, bb.returned_at,
                   b.id as book_id, b.title, b.isbn,
                   u.id as user_id, u.name as user_name
            FROM borrowed_books bb
            JOIN books b ON bb.book_id = b.id
            JOIN users u ON bb.user_id = u.id
            WHERE bb.borrowed_at >= $1 AND bb.borrowed_at < $2
            ORDER BY bb.borrowed_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.repository.pool)
        .await?;

        let borrows: Vec<MonthlyBorrowEntry> = rows
            .into_iter()
            .map(|row| MonthlyBorrowEntry {
                id: row.get("id"),
                borrowed_at: row.get("borrowed_at"),
                due_date: row.get("due_date"),
                returned_at: row.get("returned_at"),
                book_id: row.get("book_id"),
                title: row.get("title"),
                isbn: row.get("isbn"),
                user_id: row.get("user_id"),
                user_name: row.get("user_name"),
            })
            .collect();

        let total_borrowed = borrows.len() as i64;
        let users_involved = borrows
            .iter()
            .map(|b| b.user_id)
            .collect::<std::collections::HashSet<_>>()
            .len() as i64;

        let report = MonthlyReport {
            month,
            year,
            total_borrowed,
            users_involved,
            borrows,
        };

        self.redis.cache_set(&cache_key, &report).await;

        Ok(report)
    }
}
