//! Chapter Context - Value Objects

use serde::{Deserialize, Serialize};

use super::ChapterError;

/// 章节编号（从 1 开始）
///
/// 书内唯一由存储层的 UNIQUE(book_id, chapter_number) 约束保证，
/// 这里只保证取值为正。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChapterNumber(i64);

impl ChapterNumber {
    pub fn new(number: i64) -> Result<Self, ChapterError> {
        if number < 1 {
            return Err(ChapterError::InvalidNumber(number));
        }
        Ok(Self(number))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_number_must_be_positive() {
        assert_eq!(ChapterNumber::new(1).unwrap().value(), 1);
        assert_eq!(ChapterNumber::new(0), Err(ChapterError::InvalidNumber(0)));
        assert_eq!(ChapterNumber::new(-3), Err(ChapterError::InvalidNumber(-3)));
    }
}
