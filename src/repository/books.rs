//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
};

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID (including soft-deleted ones)
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get a visible book by exact ISBN, falling back to exact title
    pub async fn get_by_isbn_or_title(&self, key: &str) -> AppResult<BookDetails> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE deleted_at IS NULL AND (isbn = $1 OR LOWER(title) = LOWER($1))
            ORDER BY (isbn = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book '{}' not found", key)))?;

        self.to_details(book).await
    }

    /// Check if ISBN already exists on a visible book
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND deleted_at IS NULL AND id != $2)",
            )
            .bind(isbn)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND deleted_at IS NULL)",
            )
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// Search visible books with pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<BookDetails>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = vec!["b.deleted_at IS NULL".to_string()];
        let mut params: Vec<String> = Vec::new();

        if let Some(ref title) = query.title {
            params.push(format!("%{}%", escape_like(&title.to_lowercase())));
            conditions.push(format!("LOWER(b.title) LIKE ${}", params.len()));
        }

        if let Some(ref isbn) = query.isbn {
            params.push(isbn.clone());
            conditions.push(format!("b.isbn = ${}", params.len()));
        }

        if let Some(ref author) = query.author {
            params.push(format!("%{}%", escape_like(&author.to_lowercase())));
            conditions.push(format!(
                "EXISTS(SELECT 1 FROM book_authors ba JOIN authors a ON ba.author_id = a.id \
                 WHERE ba.book_id = b.id AND LOWER(a.name) LIKE ${})",
                params.len()
            ));
        }

        if let Some(ref category) = query.category {
            params.push(format!("%{}%", escape_like(&category.to_lowercase())));
            conditions.push(format!(
                "EXISTS(SELECT 1 FROM book_categories bc JOIN categories c ON bc.category_id = c.id \
                 WHERE bc.book_id = b.id AND LOWER(c.name) LIKE ${})",
                params.len()
            ));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_query = format!("SELECT COUNT(*) FROM books b {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT b.* FROM books b {} ORDER BY b.title LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut select_builder = sqlx::query_as::<_, Book>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let books = select_builder.fetch_all(&self.pool).await?;

        let mut result = Vec::with_capacity(books.len());
        for book in books {
            result.push(self.to_details(book).await?);
        }

        Ok((result, total))
    }

    /// Create a book, connecting or creating its authors and categories
    pub async fn create(&self, book: &CreateBook) -> AppResult<BookDetails> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, isbn, copies) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.copies)
        .fetch_one(&mut *tx)
        .await?;

        for name in &book.authors {
            let author_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO authors (name) VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(created.id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;
        }

        for name in &book.categories {
            let category_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO categories (name) VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO book_categories (book_id, category_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(created.id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.to_details(created).await
    }

    /// Update a book, re-linking authors/categories when provided
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<BookDetails> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($1, title),
                isbn = COALESCE($2, isbn),
                copies = COALESCE($3, copies)
            WHERE id = $4 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&update.title)
        .bind(&update.isbn)
        .bind(update.copies)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if let Some(ref authors) = update.authors {
            sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for name in authors {
                let author_id: i32 = sqlx::query_scalar(
                    r#"
                    INSERT INTO authors (name) VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id
                    "#,
                )
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(author_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        if let Some(ref categories) = update.categories {
            sqlx::query("DELETE FROM book_categories WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for name in categories {
                let category_id: i32 = sqlx::query_scalar(
                    r#"
                    INSERT INTO categories (name) VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id
                    "#,
                )
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query("INSERT INTO book_categories (book_id, category_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(category_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        self.to_details(updated).await
    }

    /// Soft delete a book; refuse while copies are out unless forced
    pub async fn soft_delete(&self, id: i32, force: bool) -> AppResult<()> {
        let visible: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if !visible {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        if !force {
            let borrowed: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM borrowed_books WHERE book_id = $1 AND returned_at IS NULL)",
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

            if borrowed {
                return Err(AppError::Conflict(
                    "Book has unreturned copies".to_string(),
                ));
            }
        }

        sqlx::query("UPDATE books SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Attach author and category names to a book row
    async fn to_details(&self, book: Book) -> AppResult<BookDetails> {
        let authors: Vec<String> = sqlx::query(
            r#"
            SELECT a.name FROM authors a
            JOIN book_authors ba ON ba.author_id = a.id
            WHERE ba.book_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| row.get("name"))
        .collect();

        let categories: Vec<String> = sqlx::query(
            r#"
            SELECT c.name FROM categories c
            JOIN book_categories bc ON bc.category_id = c.id
            WHERE bc.book_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| row.get("name"))
        .collect();

        Ok(BookDetails {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            copies: book.copies,
            authors,
            categories,
            created_at: book.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_match_literally() {
        assert_eq!(escape_like("100% rust"), "100\\% rust");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain title"), "plain title");
    }
}
