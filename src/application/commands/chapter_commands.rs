//! Chapter Commands

use serde_json::Value;

use crate::domain::chapter::ContentType;

/// 创建章节命令
///
/// `chapter_number` 由调用方显式给出，书内已存在时拒绝
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub book_id: i64,
    pub title: String,
    pub chapter_number: i64,
    pub content_type: ContentType,
    pub content_data: Value,
    pub is_published: bool,
}

/// 更新章节命令（字段为 None 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct UpdateChapter {
    pub chapter_id: i64,
    pub title: Option<String>,
    pub chapter_number: Option<i64>,
    pub content_type: Option<ContentType>,
    pub content_data: Option<Value>,
    pub is_published: Option<bool>,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: i64,
}

/// 章节移动命令
#[derive(Debug, Clone)]
pub struct ReorderChapters {
    pub book_id: i64,
    pub chapter_id: i64,
    /// 目标位置（从 1 开始）
    pub new_chapter_number: i64,
}
