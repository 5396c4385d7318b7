//! Domain Layer - 领域层
//!
//! 章节上下文:
//! - 章节编号的排序与重排（Sequencer）
//! - 章节内容模型（普通文本 / 互动节点图）及字数统计
//! - 发布状态迁移

pub mod chapter;

// 书籍与章节共用的标题值对象
mod title;

pub use title::Title;
