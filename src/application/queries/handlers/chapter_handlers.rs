//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookRepositoryPort, ChapterRecord, ChapterRepositoryPort};
use crate::application::queries::{GetChapter, ListChapters, NextChapterNumber};
use crate::domain::chapter::next_chapter_number;

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterRecord, ApplicationError> {
        self.chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            book_repo,
            chapter_repo,
        }
    }

    /// 按编号升序返回
    pub async fn handle(&self, query: ListChapters) -> Result<Vec<ChapterRecord>, ApplicationError> {
        // 验证书籍存在
        self.book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id))?;

        Ok(self
            .chapter_repo
            .find_by_book(query.book_id, query.published_only)
            .await?)
    }
}

/// NextChapterNumber Handler
///
/// 结果仅供参考，创建章节时调用方仍可显式指定任意未占用的编号
pub struct NextChapterNumberHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl NextChapterNumberHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            book_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, query: NextChapterNumber) -> Result<i64, ApplicationError> {
        self.book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id))?;

        let current_max = self.chapter_repo.max_chapter_number(query.book_id).await?;
        Ok(next_chapter_number(current_max))
    }
}
