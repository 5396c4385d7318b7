//! Chapter Queries

/// 获取章节详情查询
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: i64,
}

/// 列出书籍章节查询
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub book_id: i64,
    pub published_only: bool,
}

/// 下一个可用章节编号查询
#[derive(Debug, Clone)]
pub struct NextChapterNumber {
    pub book_id: i64,
}
