//! SQLite Book Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::database::{db_error, write_error};
use super::DbPool;
use crate::application::ports::{
    BookRecord, BookRepositoryPort, BookStatus, NewBookRecord, RepositoryError,
};

/// SQLite Book Repository
pub struct SqliteBookRepository {
    pool: DbPool,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BookRow {
    id: i64,
    title: String,
    description: Option<String>,
    genre: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

pub(super) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

impl TryFrom<BookRow> for BookRecord {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(BookRecord {
            id: row.id,
            title: row.title,
            description: row.description,
            genre: row.genre,
            status: BookStatus::from_str(&row.status).unwrap_or_default(),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

const BOOK_COLUMNS: &str = "id, title, description, genre, status, created_at, updated_at";

#[async_trait]
impl BookRepositoryPort for SqliteBookRepository {
    async fn insert(&self, book: &NewBookRecord) -> Result<BookRecord, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (title, description, genre, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.genre)
        .bind(book.status.as_str())
        .bind(book.created_at.to_rfc3339())
        .bind(book.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, || format!("Book '{}' already exists", book.title)))?;

        Ok(BookRecord {
            id: result.last_insert_rowid(),
            title: book.title.clone(),
            description: book.description.clone(),
            genre: book.genre.clone(),
            status: book.status,
            created_at: book.created_at,
            updated_at: book.created_at,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BookRecord>, RepositoryError> {
        let row: Option<BookRow> =
            sqlx::query_as(&format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(BookRecord::try_from).transpose()
    }

    async fn find_all(&self, status: Option<BookStatus>) -> Result<Vec<BookRecord>, RepositoryError> {
        let rows: Vec<BookRow> = match status {
            Some(status) => sqlx::query_as(&format!(
                "SELECT {} FROM books WHERE status = ? ORDER BY created_at DESC, id DESC",
                BOOK_COLUMNS
            ))
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as(&format!(
                "SELECT {} FROM books ORDER BY created_at DESC, id DESC",
                BOOK_COLUMNS
            ))
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(db_error)?;

        rows.into_iter().map(BookRecord::try_from).collect()
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        // 使用事务确保原子性（外键已声明 ON DELETE CASCADE，这里显式删除章节）
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM chapters WHERE book_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Book {}", id)));
        }

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }
}
