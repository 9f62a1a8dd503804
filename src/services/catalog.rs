//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{BookDetails, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
    services::redis::RedisService,
};

/// Cache key prefix for catalog reads
const CACHE_PREFIX: &str = "books";

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    redis: RedisService,
}

impl CatalogService {
    pub fn new(repository: Repository, redis: RedisService) -> Self {
        Self { repository, redis }
    }

    /// Search books, read-through cached
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<BookDetails>, i64)> {
        let cache_key = format!(
            "{}:search:{}:{}:{}:{}:{}:{}",
            CACHE_PREFIX,
            query.title.as_deref().unwrap_or(""),
            query.isbn.as_deref().unwrap_or(""),
            query.author.as_deref().unwrap_or(""),
            query.category.as_deref().unwrap_or(""),
            query.page.unwrap_or(1),
            query.per_page.unwrap_or(20),
        );

        if let Some(cached) = self.redis.cache_get(&cache_key).await {
            return Ok(cached);
        }

        let result = self.repository.books.search(query).await?;
        self.redis.cache_set(&cache_key, &result).await;

        Ok(result)
    }

    /// Look up a single book by ISBN or exact title, read-through cached
    pub async fn get_book(&self, isbn_or_title: &str) -> AppResult<BookDetails> {
        let cache_key = format!("{}:get:{}", CACHE_PREFIX, isbn_or_title.to_lowercase());

        if let Some(cached) = self.redis.cache_get(&cache_key).await {
            return Ok(cached);
        }

        let book = self.repository.books.get_by_isbn_or_title(isbn_or_title).await?;
        self.redis.cache_set(&cache_key, &book).await;

        Ok(book)
    }

    /// Add a book to the catalog
    pub async fn create_book(&self, book: CreateBook) -> AppResult<BookDetails> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict("ISBN already exists".to_string()));
        }

        let created = self.repository.books.create(&book).await?;
        self.redis.invalidate_prefix(CACHE_PREFIX).await;

        Ok(created)
    }

    /// Update a book
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<BookDetails> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(ref isbn) = update.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict("ISBN already exists".to_string()));
            }
        }

        let updated = self.repository.books.update(id, &update).await?;
        self.redis.invalidate_prefix(CACHE_PREFIX).await;

        Ok(updated)
    }

    /// Soft delete a book
    pub async fn delete_book(&self, id: i32, force: bool) -> AppResult<()> {
        self.repository.books.soft_delete(id, force).await?;
        self.redis.invalidate_prefix(CACHE_PREFIX).await;
        Ok(())
    }
}
