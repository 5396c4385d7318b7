//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、BookLock）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Book commands
    CreateBook,
    DeleteBook,
    // Chapter commands
    CreateChapter,
    DeleteChapter,
    ReorderChapters,
    UpdateChapter,
    // Handlers
    handlers::{
        CreateBookHandler, CreateChapterHandler, DeleteBookHandler, DeleteChapterHandler,
        ReorderChaptersHandler, UpdateChapterHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Book lock
    BookLockGuard,
    BookLockPort,
    // Repositories
    BookRecord,
    BookRepositoryPort,
    BookStatus,
    ChapterRecord,
    ChapterRepositoryPort,
    NewBookRecord,
    NewChapterRecord,
    RepositoryError,
};

pub use queries::{
    // Book queries
    GetBook,
    ListBooks,
    // Chapter queries
    GetChapter,
    ListChapters,
    NextChapterNumber,
    // Handlers
    handlers::{
        GetBookHandler, GetChapterHandler, ListBooksHandler, ListChaptersHandler,
        NextChapterNumberHandler,
    },
};
