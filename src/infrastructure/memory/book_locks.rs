//! In-Memory Book Lock Registry

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{BookLockGuard, BookLockPort};

/// 书级锁注册表
///
/// 每本书一把异步互斥锁，首次使用时创建，书籍删除时移除，
/// 因此条目数不超过现存书籍数。锁只在本进程内生效，
/// 跨进程部署时需要依赖数据库的事务隔离。
pub struct InMemoryBookLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl InMemoryBookLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 已创建锁的书籍数量
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }
}

impl Default for InMemoryBookLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookLockPort for InMemoryBookLocks {
    async fn lock(&self, book_id: i64) -> BookLockGuard {
        // 先克隆出 Arc 再等待，避免持有 DashMap 分片锁跨 await
        let mutex = self
            .locks
            .entry(book_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = mutex.lock_owned().await;
        tracing::trace!(book_id = book_id, "Book lock acquired");
        guard
    }

    fn forget(&self, book_id: i64) {
        // 注册表外没有克隆时才移除，持有者和等待者都各持一份 Arc
        let removed = self
            .locks
            .remove_if(&book_id, |_, mutex| Arc::strong_count(mutex) == 1)
            .is_some();

        tracing::trace!(
            book_id = book_id,
            removed = removed,
            remaining = self.len(),
            "Book lock released"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_book_is_serialized() {
        let locks = Arc::new(InMemoryBookLocks::new());
        let guard = locks.lock(1).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(1).await;
            })
        };

        // 第一把锁未释放前，第二个请求必须等待
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_books_do_not_contend() {
        let locks = InMemoryBookLocks::new();
        let _first = locks.lock(1).await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_forget_removes_idle_entry() {
        let locks = InMemoryBookLocks::new();
        drop(locks.lock(1).await);
        drop(locks.lock(2).await);
        assert_eq!(locks.len(), 2);

        locks.forget(1);
        assert_eq!(locks.len(), 1);

        // 未登记的书籍直接忽略
        locks.forget(99);
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_forget_keeps_entry_while_held() {
        let locks = Arc::new(InMemoryBookLocks::new());
        let guard = locks.lock(1).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // 持有者与等待者仍在，条目不能被移除，否则新来的任务会拿到另一把锁
        locks.forget(1);
        assert_eq!(locks.len(), 1);

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();

        locks.forget(1);
        assert_eq!(locks.len(), 0);
    }
}
