//! Application State
//!
//! 持有端口实现以及所有 Command/Query Handlers

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CreateBookHandler, CreateChapterHandler, DeleteBookHandler, DeleteChapterHandler,
    ReorderChaptersHandler, UpdateChapterHandler,
    // Query handlers
    GetBookHandler, GetChapterHandler, ListBooksHandler, ListChaptersHandler,
    NextChapterNumberHandler,
    // Ports
    BookLockPort, BookRepositoryPort, ChapterRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub book_repo: Arc<dyn BookRepositoryPort>,
    pub chapter_repo: Arc<dyn ChapterRepositoryPort>,
    pub book_locks: Arc<dyn BookLockPort>,

    // ========== Command Handlers ==========
    pub create_book_handler: CreateBookHandler,
    pub delete_book_handler: DeleteBookHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub reorder_chapters_handler: ReorderChaptersHandler,

    // ========== Query Handlers ==========
    pub get_book_handler: GetBookHandler,
    pub list_books_handler: ListBooksHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub next_chapter_number_handler: NextChapterNumberHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        book_locks: Arc<dyn BookLockPort>,
    ) -> Self {
        Self {
            // Command handlers
            create_book_handler: CreateBookHandler::new(book_repo.clone()),
            delete_book_handler: DeleteBookHandler::new(
                book_repo.clone(),
                book_locks.clone(),
            ),
            create_chapter_handler: CreateChapterHandler::new(
                book_repo.clone(),
                chapter_repo.clone(),
                book_locks.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(
                chapter_repo.clone(),
                book_locks.clone(),
            ),
            delete_chapter_handler: DeleteChapterHandler::new(
                chapter_repo.clone(),
                book_locks.clone(),
            ),
            reorder_chapters_handler: ReorderChaptersHandler::new(
                book_repo.clone(),
                chapter_repo.clone(),
                book_locks.clone(),
            ),

            // Query handlers
            get_book_handler: GetBookHandler::new(book_repo.clone()),
            list_books_handler: ListBooksHandler::new(book_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(chapter_repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(
                book_repo.clone(),
                chapter_repo.clone(),
            ),
            next_chapter_number_handler: NextChapterNumberHandler::new(
                book_repo.clone(),
                chapter_repo.clone(),
            ),

            // Ports
            book_repo,
            chapter_repo,
            book_locks,
        }
    }
}
