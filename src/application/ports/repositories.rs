//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::chapter::{ChapterContent, ContentType, Publication, ReorderPlan};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Book Repository
// ============================================================================

/// 书籍状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    /// 草稿
    Draft,
    /// 连载中
    Ongoing,
    /// 已完结
    Completed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Draft => "draft",
            BookStatus::Ongoing => "ongoing",
            BookStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(BookStatus::Draft),
            "ongoing" => Some(BookStatus::Ongoing),
            "completed" => Some(BookStatus::Completed),
            _ => None,
        }
    }
}

impl Default for BookStatus {
    fn default() -> Self {
        BookStatus::Draft
    }
}

/// 待插入的书籍（ID 由数据库分配）
#[derive(Debug, Clone)]
pub struct NewBookRecord {
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub status: BookStatus,
    pub created_at: DateTime<Utc>,
}

/// 书籍实体（用于持久化）
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub status: BookStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book Repository Port
#[async_trait]
pub trait BookRepositoryPort: Send + Sync {
    /// 插入书籍，返回带 ID 的记录
    async fn insert(&self, book: &NewBookRecord) -> Result<BookRecord, RepositoryError>;

    /// 根据 ID 查找书籍
    async fn find_by_id(&self, id: i64) -> Result<Option<BookRecord>, RepositoryError>;

    /// 获取书籍列表（新建的在前），可按状态过滤
    async fn find_all(&self, status: Option<BookStatus>) -> Result<Vec<BookRecord>, RepositoryError>;

    /// 删除书籍及其全部章节
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 待插入的章节
#[derive(Debug, Clone)]
pub struct NewChapterRecord {
    pub book_id: i64,
    pub chapter_number: i64,
    pub title: String,
    pub content: ChapterContent,
    pub word_count: usize,
    pub publication: Publication,
    pub created_at: DateTime<Utc>,
}

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: i64,
    pub book_id: i64,
    pub chapter_number: i64,
    pub title: String,
    pub content: ChapterContent,
    pub word_count: usize,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChapterRecord {
    pub fn content_type(&self) -> ContentType {
        self.content.content_type()
    }

    pub fn publication(&self) -> Publication {
        Publication {
            is_published: self.is_published,
            published_at: self.published_at,
        }
    }
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 插入章节；编号冲突返回 `Duplicate`
    async fn insert(&self, chapter: &NewChapterRecord) -> Result<ChapterRecord, RepositoryError>;

    /// 更新章节的全部可变字段；编号冲突返回 `Duplicate`
    async fn update(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: i64) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 获取书籍的章节，按编号升序
    async fn find_by_book(
        &self,
        book_id: i64,
        published_only: bool,
    ) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 查找书内持有指定编号的章节
    async fn find_by_number(
        &self,
        book_id: i64,
        chapter_number: i64,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 书内最大编号，空书返回 None
    async fn max_chapter_number(&self, book_id: i64) -> Result<Option<i64>, RepositoryError>;

    /// 删除章节（不重排其余章节）
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 在单个事务内按两阶段写入重排计划
    async fn apply_reorder(&self, plan: &ReorderPlan) -> Result<(), RepositoryError>;
}
