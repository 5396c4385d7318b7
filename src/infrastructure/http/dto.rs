//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{BookRecord, ChapterRecord};
use crate::domain::chapter::ContentType;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Book DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    /// draft | ongoing | completed
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookIdRequest {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBooksParams {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BookRecord> for BookResponse {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            genre: record.genre,
            status: record.status.as_str().to_string(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub book_id: i64,
    pub title: String,
    pub chapter_number: i64,
    #[serde(default)]
    pub content_type: ContentType,
    pub content_data: Value,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub chapter_number: Option<i64>,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub content_data: Option<Value>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterIdRequest {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListChaptersRequest {
    pub book_id: i64,
    #[serde(default)]
    pub published_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReorderChaptersRequest {
    pub book_id: i64,
    pub chapter_id: i64,
    pub new_chapter_number: i64,
}

#[derive(Debug, Deserialize)]
pub struct NextChapterNumberRequest {
    pub book_id: i64,
}

/// 章节详情（含内容）
#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub id: i64,
    pub book_id: i64,
    pub chapter_number: i64,
    pub title: String,
    pub content_type: ContentType,
    pub content_data: Value,
    pub word_count: usize,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterRecord> for ChapterResponse {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            chapter_number: record.chapter_number,
            content_type: record.content_type(),
            content_data: record.content.to_value(),
            title: record.title,
            word_count: record.word_count,
            is_published: record.is_published,
            published_at: record.published_at.map(|t| t.to_rfc3339()),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 章节摘要（列表用，不含内容）
#[derive(Debug, Serialize)]
pub struct ChapterSummaryResponse {
    pub id: i64,
    pub book_id: i64,
    pub chapter_number: i64,
    pub title: String,
    pub content_type: ContentType,
    pub word_count: usize,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterRecord> for ChapterSummaryResponse {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            chapter_number: record.chapter_number,
            content_type: record.content_type(),
            title: record.title,
            word_count: record.word_count,
            is_published: record.is_published,
            published_at: record.published_at.map(|t| t.to_rfc3339()),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterListResponse {
    pub book_id: i64,
    pub total: usize,
    pub chapters: Vec<ChapterSummaryResponse>,
}

impl ChapterListResponse {
    pub fn new(book_id: i64, records: Vec<ChapterRecord>) -> Self {
        let chapters: Vec<ChapterSummaryResponse> =
            records.into_iter().map(ChapterSummaryResponse::from).collect();
        Self {
            book_id,
            total: chapters.len(),
            chapters,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextChapterNumberResponse {
    pub book_id: i64,
    pub next_chapter_number: i64,
}
