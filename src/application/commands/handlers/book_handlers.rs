//! Book Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{CreateBook, DeleteBook};
use crate::application::error::ApplicationError;
use crate::application::ports::{BookLockPort, BookRecord, BookRepositoryPort, NewBookRecord};
use crate::domain::Title;

// ============================================================================
// CreateBook
// ============================================================================

/// CreateBook Handler
pub struct CreateBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl CreateBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, command: CreateBook) -> Result<BookRecord, ApplicationError> {
        let title = Title::new(command.title).map_err(ApplicationError::validation)?;

        let book = self
            .book_repo
            .insert(&NewBookRecord {
                title: title.into_inner(),
                description: command.description,
                genre: command.genre,
                status: command.status.unwrap_or_default(),
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            book_id = book.id,
            title = %book.title,
            status = book.status.as_str(),
            "Book created"
        );

        Ok(book)
    }
}

// ============================================================================
// DeleteBook
// ============================================================================

/// DeleteBook Handler
///
/// 持有书级锁删除，删除后从注册表中移除该书的锁
pub struct DeleteBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    book_locks: Arc<dyn BookLockPort>,
}

impl DeleteBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>, book_locks: Arc<dyn BookLockPort>) -> Self {
        Self {
            book_repo,
            book_locks,
        }
    }

    pub async fn handle(&self, command: DeleteBook) -> Result<(), ApplicationError> {
        let book_id = command.book_id;

        // 检查书籍是否存在
        let book = self
            .book_repo
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", book_id))?;

        let guard = self.book_locks.lock(book_id).await;
        self.book_repo.delete(book_id).await?;
        drop(guard);
        self.book_locks.forget(book_id);

        tracing::info!(book_id = book_id, title = %book.title, "Book deleted");

        Ok(())
    }
}
