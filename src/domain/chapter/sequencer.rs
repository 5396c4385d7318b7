//! Chapter Context - Sequencer
//!
//! 章节移动的纯计算部分。存储层需要按两个阶段落盘:
//! 1. 所有章节写入占位编号 `-(rank + PLACEHOLDER_OFFSET)`
//! 2. 所有章节写入最终编号 `rank`
//!
//! 两阶段必须在同一事务内完成，否则 UNIQUE(book_id, chapter_number)
//! 会在逐行更新时与尚未移走的旧编号冲突。

use super::ChapterError;

/// 占位编号偏移量，保证占位值远离任何合法编号
pub const PLACEHOLDER_OFFSET: i64 = 1000;

/// 参与排序的章节（只需 ID 与当前编号）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSlot {
    pub chapter_id: i64,
    pub chapter_number: i64,
}

/// 重排计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    book_id: i64,
    /// 新顺序下的章节 ID
    order: Vec<i64>,
    noop: bool,
}

impl ReorderPlan {
    pub fn book_id(&self) -> i64 {
        self.book_id
    }

    pub fn order(&self) -> &[i64] {
        &self.order
    }

    /// 目标位置等于当前编号，无需写入
    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// 第一阶段: (chapter_id, 占位编号)
    pub fn placeholder_assignments(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.ranked().map(|(id, rank)| (id, -(rank + PLACEHOLDER_OFFSET)))
    }

    /// 第二阶段: (chapter_id, 最终编号)
    pub fn final_assignments(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.ranked()
    }

    fn ranked(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.order
            .iter()
            .zip(1_i64..)
            .map(|(id, rank)| (*id, rank))
    }
}

/// 计算把 `chapter_id` 移动到 `new_position`（从 1 开始）后的顺序
///
/// 其余章节之间的相对顺序保持不变。
pub fn plan_move(
    book_id: i64,
    chapters: &[ChapterSlot],
    chapter_id: i64,
    new_position: i64,
) -> Result<ReorderPlan, ChapterError> {
    let mut ordered = chapters.to_vec();
    ordered.sort_by_key(|slot| (slot.chapter_number, slot.chapter_id));

    let current_index = ordered
        .iter()
        .position(|slot| slot.chapter_id == chapter_id)
        .ok_or(ChapterError::ChapterNotInBook {
            book_id,
            chapter_id,
        })?;

    let total = ordered.len();
    if new_position < 1 || new_position > total as i64 {
        return Err(ChapterError::PositionOutOfRange {
            position: new_position,
            total,
        });
    }

    let noop = ordered[current_index].chapter_number == new_position;
    if !noop {
        let moved = ordered.remove(current_index);
        ordered.insert((new_position - 1) as usize, moved);
    }

    Ok(ReorderPlan {
        book_id,
        order: ordered.into_iter().map(|slot| slot.chapter_id).collect(),
        noop,
    })
}

/// 下一个可用编号: 当前最大编号 + 1，空书为 1
pub fn next_chapter_number(current_max: Option<i64>) -> i64 {
    current_max.unwrap_or(0).max(0) + 1
}
