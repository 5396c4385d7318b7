//! Chapter Command Handlers
//!
//! 编号冲突检查在写入前完成；存储层的 UNIQUE 约束作为最后一道防线。
//! 所有写章节行的命令都持有书级锁，且在锁内读取章节，
//! 避免用重排前读到的旧编号覆盖重排结果。

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{CreateChapter, DeleteChapter, ReorderChapters, UpdateChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookLockPort, BookRepositoryPort, ChapterRecord, ChapterRepositoryPort, NewChapterRecord,
};
use crate::domain::chapter::{plan_move, ChapterContent, ChapterNumber, ChapterSlot, Publication};
use crate::domain::Title;

/// 确认书籍存在
async fn ensure_book_exists(
    book_repo: &dyn BookRepositoryPort,
    book_id: i64,
) -> Result<(), ApplicationError> {
    book_repo
        .find_by_id(book_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApplicationError::not_found("Book", book_id))
}

async fn find_chapter(
    chapter_repo: &dyn ChapterRepositoryPort,
    chapter_id: i64,
) -> Result<ChapterRecord, ApplicationError> {
    chapter_repo
        .find_by_id(chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))
}

/// 确认编号未被同书其它章节占用
async fn ensure_number_free(
    chapter_repo: &dyn ChapterRepositoryPort,
    book_id: i64,
    chapter_number: i64,
    except_chapter_id: Option<i64>,
) -> Result<(), ApplicationError> {
    match chapter_repo.find_by_number(book_id, chapter_number).await? {
        Some(existing) if Some(existing.id) != except_chapter_id => {
            Err(ApplicationError::chapter_number_taken(chapter_number))
        }
        _ => Ok(()),
    }
}

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
pub struct CreateChapterHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    book_locks: Arc<dyn BookLockPort>,
}

impl CreateChapterHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        book_locks: Arc<dyn BookLockPort>,
    ) -> Self {
        Self {
            book_repo,
            chapter_repo,
            book_locks,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ApplicationError> {
        let book_id = command.book_id;
        ensure_book_exists(self.book_repo.as_ref(), book_id).await?;

        let title = Title::new(command.title).map_err(ApplicationError::validation)?;
        let number = ChapterNumber::new(command.chapter_number)?;
        let content = ChapterContent::parse(command.content_type, &command.content_data)?;
        let word_count = content.word_count();

        let _guard = self.book_locks.lock(book_id).await;
        ensure_number_free(self.chapter_repo.as_ref(), book_id, number.value(), None).await?;

        let now = Utc::now();
        let chapter = self
            .chapter_repo
            .insert(&NewChapterRecord {
                book_id,
                chapter_number: number.value(),
                title: title.into_inner(),
                content,
                word_count,
                publication: Publication::initial(command.is_published, now),
                created_at: now,
            })
            .await?;

        tracing::info!(
            book_id = book_id,
            chapter_id = chapter.id,
            chapter_number = chapter.chapter_number,
            content_type = %chapter.content_type(),
            word_count = chapter.word_count,
            "Chapter created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler
pub struct UpdateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    book_locks: Arc<dyn BookLockPort>,
}

impl UpdateChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        book_locks: Arc<dyn BookLockPort>,
    ) -> Self {
        Self {
            chapter_repo,
            book_locks,
        }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let chapter_id = command.chapter_id;
        let book_id = find_chapter(self.chapter_repo.as_ref(), chapter_id)
            .await?
            .book_id;

        // 整行写回，必须在锁内重新读取
        let _guard = self.book_locks.lock(book_id).await;
        let mut chapter = find_chapter(self.chapter_repo.as_ref(), chapter_id).await?;

        if let Some(title) = command.title {
            chapter.title = Title::new(title)
                .map_err(ApplicationError::validation)?
                .into_inner();
        }

        // 内容或类型任一变化都要重新校验并重算字数
        if command.content_type.is_some() || command.content_data.is_some() {
            let content_type = command
                .content_type
                .unwrap_or_else(|| chapter.content_type());
            let data = command
                .content_data
                .unwrap_or_else(|| chapter.content.to_value());
            let content = ChapterContent::parse(content_type, &data)?;
            chapter.word_count = content.word_count();
            chapter.content = content;
        }

        let now = Utc::now();
        if let Some(publish) = command.is_published {
            let publication = chapter.publication().transition(publish, now);
            chapter.is_published = publication.is_published;
            chapter.published_at = publication.published_at;
        }
        chapter.updated_at = now;

        if let Some(number) = command.chapter_number {
            let number = ChapterNumber::new(number)?.value();
            if number != chapter.chapter_number {
                ensure_number_free(
                    self.chapter_repo.as_ref(),
                    chapter.book_id,
                    number,
                    Some(chapter.id),
                )
                .await?;
                chapter.chapter_number = number;
            }
        }

        self.chapter_repo.update(&chapter).await?;

        tracing::info!(
            book_id = chapter.book_id,
            chapter_id = chapter.id,
            chapter_number = chapter.chapter_number,
            word_count = chapter.word_count,
            is_published = chapter.is_published,
            "Chapter updated"
        );

        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
///
/// 删除后留下的编号空洞不会自动填补，下一次重排时收拢
pub struct DeleteChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    book_locks: Arc<dyn BookLockPort>,
}

impl DeleteChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        book_locks: Arc<dyn BookLockPort>,
    ) -> Self {
        Self {
            chapter_repo,
            book_locks,
        }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ApplicationError> {
        let chapter_id = command.chapter_id;
        let chapter = find_chapter(self.chapter_repo.as_ref(), chapter_id).await?;

        let _guard = self.book_locks.lock(chapter.book_id).await;
        self.chapter_repo.delete(chapter_id).await?;

        tracing::info!(
            book_id = chapter.book_id,
            chapter_id = chapter_id,
            chapter_number = chapter.chapter_number,
            "Chapter deleted"
        );

        Ok(())
    }
}

// ============================================================================
// ReorderChapters
// ============================================================================

/// ReorderChapters Handler - 把一个章节移动到新位置并重排整本书
pub struct ReorderChaptersHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    book_locks: Arc<dyn BookLockPort>,
}

impl ReorderChaptersHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        book_locks: Arc<dyn BookLockPort>,
    ) -> Self {
        Self {
            book_repo,
            chapter_repo,
            book_locks,
        }
    }

    /// 返回重排后的完整章节列表（按新编号升序）
    pub async fn handle(
        &self,
        command: ReorderChapters,
    ) -> Result<Vec<ChapterRecord>, ApplicationError> {
        let book_id = command.book_id;
        ensure_book_exists(self.book_repo.as_ref(), book_id).await?;

        // 从读取章节列表到提交重排，全程持有书级锁
        let _guard = self.book_locks.lock(book_id).await;

        let chapters = self.chapter_repo.find_by_book(book_id, false).await?;
        let slots: Vec<ChapterSlot> = chapters
            .iter()
            .map(|c| ChapterSlot {
                chapter_id: c.id,
                chapter_number: c.chapter_number,
            })
            .collect();

        let plan = plan_move(
            book_id,
            &slots,
            command.chapter_id,
            command.new_chapter_number,
        )?;

        if plan.is_noop() {
            tracing::debug!(
                book_id = book_id,
                chapter_id = command.chapter_id,
                "Chapter already at requested position"
            );
            return Ok(chapters);
        }

        self.chapter_repo.apply_reorder(&plan).await?;
        let reordered = self.chapter_repo.find_by_book(book_id, false).await?;

        tracing::info!(
            book_id = book_id,
            chapter_id = command.chapter_id,
            new_chapter_number = command.new_chapter_number,
            total = reordered.len(),
            "Chapters reordered"
        );

        Ok(reordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    use crate::application::ports::RepositoryError;
    use crate::domain::chapter::ReorderPlan;

    use crate::application::commands::CreateBook;
    use crate::application::commands::handlers::CreateBookHandler;
    use crate::domain::chapter::ContentType;
    use crate::infrastructure::memory::InMemoryBookLocks;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteBookRepository,
        SqliteChapterRepository,
    };

    struct Fixture {
        book_repo: Arc<dyn BookRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        locks: Arc<dyn BookLockPort>,
    }

    impl Fixture {
        async fn new() -> Self {
            let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
            run_migrations(&pool).await.unwrap();
            Self {
                book_repo: Arc::new(SqliteBookRepository::new(pool.clone())),
                chapter_repo: Arc::new(SqliteChapterRepository::new(pool)),
                locks: Arc::new(InMemoryBookLocks::new()),
            }
        }

        async fn book(&self) -> i64 {
            CreateBookHandler::new(self.book_repo.clone())
                .handle(CreateBook {
                    title: "The Forking Path".to_string(),
                    description: None,
                    genre: None,
                    status: None,
                })
                .await
                .unwrap()
                .id
        }

        fn create_handler(&self) -> CreateChapterHandler {
            CreateChapterHandler::new(
                self.book_repo.clone(),
                self.chapter_repo.clone(),
                self.locks.clone(),
            )
        }

        fn update_handler(&self) -> UpdateChapterHandler {
            UpdateChapterHandler::new(self.chapter_repo.clone(), self.locks.clone())
        }

        fn reorder_handler(&self) -> ReorderChaptersHandler {
            ReorderChaptersHandler::new(
                self.book_repo.clone(),
                self.chapter_repo.clone(),
                self.locks.clone(),
            )
        }

        async fn chapter(&self, book_id: i64, number: i64, text: &str) -> ChapterRecord {
            self.create_handler()
                .handle(simple_chapter(book_id, number, text))
                .await
                .unwrap()
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum PausePoint {
        FindById,
        Update,
    }

    /// 在指定调用处暂停一次的仓储，用于构造并发交错
    struct PausingChapterRepo {
        inner: Arc<dyn ChapterRepositoryPort>,
        at: PausePoint,
        armed: AtomicBool,
        reached: Notify,
        release: Notify,
    }

    impl PausingChapterRepo {
        fn new(inner: Arc<dyn ChapterRepositoryPort>, at: PausePoint) -> Arc<Self> {
            Arc::new(Self {
                inner,
                at,
                armed: AtomicBool::new(true),
                reached: Notify::new(),
                release: Notify::new(),
            })
        }

        async fn pause(&self, point: PausePoint) {
            if self.at == point && self.armed.swap(false, Ordering::SeqCst) {
                self.reached.notify_one();
                self.release.notified().await;
            }
        }
    }

    #[async_trait]
    impl ChapterRepositoryPort for PausingChapterRepo {
        async fn insert(&self, chapter: &NewChapterRecord) -> Result<ChapterRecord, RepositoryError> {
            self.inner.insert(chapter).await
        }

        async fn update(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
            self.pause(PausePoint::Update).await;
            self.inner.update(chapter).await
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<ChapterRecord>, RepositoryError> {
            self.pause(PausePoint::FindById).await;
            self.inner.find_by_id(id).await
        }

        async fn find_by_book(
            &self,
            book_id: i64,
            published_only: bool,
        ) -> Result<Vec<ChapterRecord>, RepositoryError> {
            self.inner.find_by_book(book_id, published_only).await
        }

        async fn find_by_number(
            &self,
            book_id: i64,
            chapter_number: i64,
        ) -> Result<Option<ChapterRecord>, RepositoryError> {
            self.inner.find_by_number(book_id, chapter_number).await
        }

        async fn max_chapter_number(&self, book_id: i64) -> Result<Option<i64>, RepositoryError> {
            self.inner.max_chapter_number(book_id).await
        }

        async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
            self.inner.delete(id).await
        }

        async fn apply_reorder(&self, plan: &ReorderPlan) -> Result<(), RepositoryError> {
            self.inner.apply_reorder(plan).await
        }
    }

    async fn numbering(fx: &Fixture, book_id: i64) -> Vec<(i64, i64)> {
        fx.chapter_repo
            .find_by_book(book_id, false)
            .await
            .unwrap()
            .iter()
            .map(|c| (c.id, c.chapter_number))
            .collect()
    }

    fn simple_chapter(book_id: i64, number: i64, text: &str) -> CreateChapter {
        CreateChapter {
            book_id,
            title: format!("Chapter {}", number),
            chapter_number: number,
            content_type: ContentType::Simple,
            content_data: json!({ "text": text }),
            is_published: false,
        }
    }

    #[tokio::test]
    async fn test_create_computes_word_count() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;

        let chapter = fx.chapter(book_id, 1, "a b c").await;
        assert_eq!(chapter.word_count, 3);
        assert!(!chapter.is_published);
        assert!(chapter.published_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_number() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        fx.chapter(book_id, 1, "first").await;

        let err = fx
            .create_handler()
            .handle(simple_chapter(book_id, 1, "second"))
            .await
            .unwrap_err();
        match err {
            ApplicationError::Conflict(msg) => assert!(msg.contains("Chapter number 1")),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_for_missing_book() {
        let fx = Fixture::new().await;
        let err = fx
            .create_handler()
            .handle(simple_chapter(404, 1, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { resource_type: "Book", id: 404 }));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_content() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;

        let mut command = simple_chapter(book_id, 1, "x");
        command.content_data = json!({});
        let err = fx.create_handler().handle(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let mut command = simple_chapter(book_id, 1, "x");
        command.content_type = ContentType::Interactive;
        command.content_data = json!({ "nodes": "not-a-list" });
        let err = fx.create_handler().handle(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_recomputes_word_count() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let chapter = fx.chapter(book_id, 1, "a b c").await;

        let updated = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: chapter.id,
                content_data: Some(json!({ "text": "a b" })),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.word_count, 2);

        // 切换为互动类型时按新类型校验
        let updated = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: chapter.id,
                content_type: Some(ContentType::Interactive),
                content_data: Some(json!({ "nodes": [{ "text": "a b" }, { "dialogue": "c" }] })),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.content_type(), ContentType::Interactive);
        assert_eq!(updated.word_count, 3);
    }

    #[tokio::test]
    async fn test_update_type_only_revalidates_existing_data() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let chapter = fx.chapter(book_id, 1, "plain text").await;

        let err = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: chapter.id,
                content_type: Some(ContentType::Interactive),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let stored = fx.chapter_repo.find_by_id(chapter.id).await.unwrap().unwrap();
        assert_eq!(stored.content_type(), ContentType::Simple);
    }

    #[tokio::test]
    async fn test_publish_transitions() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let chapter = fx.chapter(book_id, 1, "draft").await;

        let published = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: chapter.id,
                is_published: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(published.is_published);
        assert!(published.published_at.is_some());

        let unpublished = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: chapter.id,
                is_published: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!unpublished.is_published);
        assert!(unpublished.published_at.is_none());

        let stored = fx.chapter_repo.find_by_id(chapter.id).await.unwrap().unwrap();
        assert!(stored.published_at.is_none());
    }

    #[tokio::test]
    async fn test_update_number_conflict() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let first = fx.chapter(book_id, 1, "one").await;
        fx.chapter(book_id, 2, "two").await;

        let err = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: first.id,
                chapter_number: Some(2),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));

        // 改成自己当前的编号不算冲突
        let same = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: first.id,
                chapter_number: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(same.chapter_number, 1);

        let moved = fx
            .update_handler()
            .handle(UpdateChapter {
                chapter_id: first.id,
                chapter_number: Some(7),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(moved.chapter_number, 7);
    }

    #[tokio::test]
    async fn test_reorder_moves_last_to_second() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let a = fx.chapter(book_id, 1, "a").await;
        let b = fx.chapter(book_id, 2, "b").await;
        let c = fx.chapter(book_id, 3, "c").await;
        let d = fx.chapter(book_id, 4, "d").await;

        let chapters = fx
            .reorder_handler()
            .handle(ReorderChapters {
                book_id,
                chapter_id: d.id,
                new_chapter_number: 2,
            })
            .await
            .unwrap();

        let order: Vec<(i64, i64)> = chapters.iter().map(|c| (c.id, c.chapter_number)).collect();
        assert_eq!(order, vec![(a.id, 1), (d.id, 2), (b.id, 3), (c.id, 4)]);
    }

    #[tokio::test]
    async fn test_reorder_to_current_position_is_noop() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let a = fx.chapter(book_id, 1, "a").await;
        let b = fx.chapter(book_id, 2, "b").await;

        let chapters = fx
            .reorder_handler()
            .handle(ReorderChapters {
                book_id,
                chapter_id: b.id,
                new_chapter_number: 2,
            })
            .await
            .unwrap();
        let ids: Vec<i64> = chapters.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_reorder_out_of_range_leaves_numbers_untouched() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let a = fx.chapter(book_id, 1, "a").await;
        fx.chapter(book_id, 2, "b").await;

        for position in [0, 3, -1] {
            let err = fx
                .reorder_handler()
                .handle(ReorderChapters {
                    book_id,
                    chapter_id: a.id,
                    new_chapter_number: position,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::InvalidArgument(_)));
        }

        let numbers: Vec<i64> = fx
            .chapter_repo
            .find_by_book(book_id, false)
            .await
            .unwrap()
            .iter()
            .map(|c| c.chapter_number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_reorder_chapter_from_other_book() {
        let fx = Fixture::new().await;
        let book_a = fx.book().await;
        let book_b = fx.book().await;
        fx.chapter(book_a, 1, "a").await;
        let foreign = fx.chapter(book_b, 1, "b").await;

        let err = fx
            .reorder_handler()
            .handle(ReorderChapters {
                book_id: book_a,
                chapter_id: foreign.id,
                new_chapter_number: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { resource_type: "Chapter", .. }));
    }

    #[tokio::test]
    async fn test_reorder_closes_gap_left_by_delete() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let a = fx.chapter(book_id, 1, "a").await;
        let b = fx.chapter(book_id, 2, "b").await;
        let c = fx.chapter(book_id, 3, "c").await;

        DeleteChapterHandler::new(fx.chapter_repo.clone(), fx.locks.clone())
            .handle(DeleteChapter { chapter_id: b.id })
            .await
            .unwrap();

        let chapters = fx
            .reorder_handler()
            .handle(ReorderChapters {
                book_id,
                chapter_id: c.id,
                new_chapter_number: 1,
            })
            .await
            .unwrap();
        let order: Vec<(i64, i64)> = chapters.iter().map(|c| (c.id, c.chapter_number)).collect();
        assert_eq!(order, vec![(c.id, 1), (a.id, 2)]);
    }

    #[tokio::test]
    async fn test_title_edit_started_before_reorder_keeps_new_order() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let a = fx.chapter(book_id, 1, "a").await;
        let b = fx.chapter(book_id, 2, "b").await;
        let c = fx.chapter(book_id, 3, "c").await;
        DeleteChapterHandler::new(fx.chapter_repo.clone(), fx.locks.clone())
            .handle(DeleteChapter { chapter_id: b.id })
            .await
            .unwrap();
        let (a, c) = (a.id, c.id);

        // 标题修改在首次读取章节时暂停
        let repo = PausingChapterRepo::new(fx.chapter_repo.clone(), PausePoint::FindById);
        let update = {
            let handler = UpdateChapterHandler::new(repo.clone(), fx.locks.clone());
            tokio::spawn(async move {
                handler
                    .handle(UpdateChapter {
                        chapter_id: c,
                        title: Some("Renamed".to_string()),
                        ..Default::default()
                    })
                    .await
            })
        };
        repo.reached.notified().await;

        fx.reorder_handler()
            .handle(ReorderChapters {
                book_id,
                chapter_id: c,
                new_chapter_number: 1,
            })
            .await
            .unwrap();
        assert_eq!(numbering(&fx, book_id).await, vec![(c, 1), (a, 2)]);

        repo.release.notify_one();
        let updated = update.await.unwrap().unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.chapter_number, 1);

        assert_eq!(numbering(&fx, book_id).await, vec![(c, 1), (a, 2)]);
    }

    #[tokio::test]
    async fn test_reorder_waits_for_in_flight_update() {
        let fx = Fixture::new().await;
        let book_id = fx.book().await;
        let a = fx.chapter(book_id, 1, "a").await.id;
        let b = fx.chapter(book_id, 2, "b").await.id;

        // 修改在写回前暂停，此时已持有书级锁
        let repo = PausingChapterRepo::new(fx.chapter_repo.clone(), PausePoint::Update);
        let update = {
            let handler = UpdateChapterHandler::new(repo.clone(), fx.locks.clone());
            tokio::spawn(async move {
                handler
                    .handle(UpdateChapter {
                        chapter_id: a,
                        is_published: Some(true),
                        ..Default::default()
                    })
                    .await
            })
        };
        repo.reached.notified().await;

        let reorder = {
            let handler = fx.reorder_handler();
            tokio::spawn(async move {
                handler
                    .handle(ReorderChapters {
                        book_id,
                        chapter_id: b,
                        new_chapter_number: 1,
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!reorder.is_finished());

        repo.release.notify_one();
        update.await.unwrap().unwrap();
        reorder.await.unwrap().unwrap();

        assert_eq!(numbering(&fx, book_id).await, vec![(b, 1), (a, 2)]);
        let stored = fx.chapter_repo.find_by_id(a).await.unwrap().unwrap();
        assert!(stored.is_published);
    }
}
