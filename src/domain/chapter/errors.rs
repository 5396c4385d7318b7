//! Chapter Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChapterError {
    #[error("Chapter {chapter_id} not found in book {book_id}")]
    ChapterNotInBook { book_id: i64, chapter_id: i64 },

    #[error("Position {position} is out of range (book has {total} chapters)")]
    PositionOutOfRange { position: i64, total: usize },

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid chapter number: {0} (must be >= 1)")]
    InvalidNumber(i64),
}
