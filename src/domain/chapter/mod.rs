//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节内容校验与字数统计
//! - 书内章节编号的唯一性与重排
//! - 发布状态迁移

mod content;
mod errors;
mod publication;
mod sequencer;
mod value_objects;

pub use content::{
    count_words, field_text, ChapterContent, ContentType, InteractiveContent, SimpleContent,
    WORD_BEARING_NODE_KEYS,
};
pub use errors::ChapterError;
pub use publication::Publication;
pub use sequencer::{next_chapter_number, plan_move, ChapterSlot, ReorderPlan, PLACEHOLDER_OFFSET};
pub use value_objects::ChapterNumber;
