//! Chapter Context - Publication State

use chrono::{DateTime, Utc};

/// 发布状态
///
/// 不变量: `published_at` 非空当且仅当 `is_published` 为真
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl Publication {
    /// 新建章节时的发布状态
    pub fn initial(publish: bool, now: DateTime<Utc>) -> Self {
        Self {
            is_published: publish,
            published_at: publish.then_some(now),
        }
    }

    /// 状态迁移
    ///
    /// false -> true 记录发布时间；true -> false 清空；状态不变时保留原时间
    pub fn transition(self, publish: bool, now: DateTime<Utc>) -> Self {
        match (self.is_published, publish) {
            (false, true) => Self {
                is_published: true,
                published_at: Some(now),
            },
            (true, false) => Self {
                is_published: false,
                published_at: None,
            },
            _ => self,
        }
    }
}
