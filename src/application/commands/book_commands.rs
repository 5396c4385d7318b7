//! Book Commands

use crate::application::ports::BookStatus;

/// 创建书籍命令
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub status: Option<BookStatus>,
}

/// 删除书籍命令（级联删除章节）
#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub book_id: i64,
}
