//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod book_lock;
mod repositories;

pub use book_lock::{BookLockGuard, BookLockPort};
pub use repositories::{
    BookRecord, BookRepositoryPort, BookStatus, ChapterRecord, ChapterRepositoryPort,
    NewBookRecord, NewChapterRecord, RepositoryError,
};
