//! Shared Value Object - Title

use serde::{Deserialize, Serialize};

/// 标题最大字符数
pub const MAX_TITLE_CHARS: usize = 200;

/// 书籍 / 章节标题
///
/// 不变量: 去除首尾空白后非空，且不超过 200 个字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("title cannot be empty");
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err("title cannot exceed 200 characters");
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
