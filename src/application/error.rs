//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::domain::chapter::ChapterError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到（或章节不属于指定书籍）
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: i64,
    },

    /// 参数越界
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 章节编号冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: i64) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建编号冲突错误
    pub fn chapter_number_taken(chapter_number: i64) -> Self {
        Self::Conflict(format!(
            "Chapter number {} already exists for this book",
            chapter_number
        ))
    }
}

impl From<crate::application::ports::RepositoryError> for ApplicationError {
    fn from(err: crate::application::ports::RepositoryError) -> Self {
        use crate::application::ports::RepositoryError;

        match err {
            RepositoryError::Duplicate(msg) => Self::Conflict(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<ChapterError> for ApplicationError {
    fn from(err: ChapterError) -> Self {
        match err {
            ChapterError::ChapterNotInBook { chapter_id, .. } => {
                Self::not_found("Chapter", chapter_id)
            }
            ChapterError::PositionOutOfRange { .. } => Self::InvalidArgument(err.to_string()),
            ChapterError::InvalidContent(msg) => Self::ValidationError(msg),
            ChapterError::InvalidNumber(_) => Self::ValidationError(err.to_string()),
        }
    }
}
