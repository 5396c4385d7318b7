//! Book Lock Port
//!
//! 同一本书的章节重排必须串行执行；不同书之间互不影响。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

/// 书级锁守卫，drop 时释放
pub type BookLockGuard = OwnedMutexGuard<()>;

/// Book Lock Port
#[async_trait]
pub trait BookLockPort: Send + Sync {
    /// 获取书级独占锁，等待直到可用
    async fn lock(&self, book_id: i64) -> BookLockGuard;

    /// 书籍删除后释放其锁；仍有任务持有或等待时保留
    fn forget(&self, book_id: i64);
}
