//! Book Queries

use crate::application::ports::BookStatus;

/// 获取书籍详情查询
#[derive(Debug, Clone)]
pub struct GetBook {
    pub book_id: i64,
}

/// 列出书籍查询
#[derive(Debug, Clone, Default)]
pub struct ListBooks {
    pub status: Option<BookStatus>,
}
