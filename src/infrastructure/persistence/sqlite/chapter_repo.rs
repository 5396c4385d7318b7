//! SQLite Chapter Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::book_repo::parse_timestamp;
use super::database::{db_error, write_error};
use super::DbPool;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, NewChapterRecord, RepositoryError,
};
use crate::domain::chapter::{ChapterContent, ContentType, ReorderPlan};

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: i64,
    book_id: i64,
    chapter_number: i64,
    title: String,
    content_type: String,
    content_data: String,
    word_count: i64,
    is_published: bool,
    published_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        let content_type = ContentType::from_str(&row.content_type).ok_or_else(|| {
            RepositoryError::SerializationError(format!(
                "unknown content_type '{}' for chapter {}",
                row.content_type, row.id
            ))
        })?;
        let data: serde_json::Value = serde_json::from_str(&row.content_data)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let content = ChapterContent::parse(content_type, &data)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(ChapterRecord {
            id: row.id,
            book_id: row.book_id,
            chapter_number: row.chapter_number,
            title: row.title,
            content,
            word_count: row.word_count.max(0) as usize,
            is_published: row.is_published,
            published_at: row.published_at.as_deref().map(parse_timestamp).transpose()?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

const CHAPTER_COLUMNS: &str = "id, book_id, chapter_number, title, content_type, content_data, \
                               word_count, is_published, published_at, created_at, updated_at";

fn number_taken(chapter_number: i64) -> impl FnOnce() -> String {
    move || format!("Chapter number {} already exists for this book", chapter_number)
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn insert(&self, chapter: &NewChapterRecord) -> Result<ChapterRecord, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO chapters (
                book_id, chapter_number, title, content_type, content_data,
                word_count, is_published, published_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chapter.book_id)
        .bind(chapter.chapter_number)
        .bind(&chapter.title)
        .bind(chapter.content.content_type().as_str())
        .bind(chapter.content.to_value().to_string())
        .bind(chapter.word_count as i64)
        .bind(chapter.publication.is_published)
        .bind(chapter.publication.published_at.map(|t| t.to_rfc3339()))
        .bind(chapter.created_at.to_rfc3339())
        .bind(chapter.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, number_taken(chapter.chapter_number)))?;

        Ok(ChapterRecord {
            id: result.last_insert_rowid(),
            book_id: chapter.book_id,
            chapter_number: chapter.chapter_number,
            title: chapter.title.clone(),
            content: chapter.content.clone(),
            word_count: chapter.word_count,
            is_published: chapter.publication.is_published,
            published_at: chapter.publication.published_at,
            created_at: chapter.created_at,
            updated_at: chapter.created_at,
        })
    }

    async fn update(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE chapters
            SET chapter_number = ?, title = ?, content_type = ?, content_data = ?,
                word_count = ?, is_published = ?, published_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(chapter.chapter_number)
        .bind(&chapter.title)
        .bind(chapter.content_type().as_str())
        .bind(chapter.content.to_value().to_string())
        .bind(chapter.word_count as i64)
        .bind(chapter.is_published)
        .bind(chapter.published_at.map(|t| t.to_rfc3339()))
        .bind(chapter.updated_at.to_rfc3339())
        .bind(chapter.id)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, number_taken(chapter.chapter_number)))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Chapter {}", chapter.id)));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> =
            sqlx::query_as(&format!("SELECT {} FROM chapters WHERE id = ?", CHAPTER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_by_book(
        &self,
        book_id: i64,
        published_only: bool,
    ) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let filter = if published_only {
            " AND is_published = 1"
        } else {
            ""
        };
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE book_id = ?{} ORDER BY chapter_number",
            CHAPTER_COLUMNS, filter
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn find_by_number(
        &self,
        book_id: i64,
        chapter_number: i64,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE book_id = ? AND chapter_number = ?",
            CHAPTER_COLUMNS
        ))
        .bind(book_id)
        .bind(chapter_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn max_chapter_number(&self, book_id: i64) -> Result<Option<i64>, RepositoryError> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(chapter_number) FROM chapters WHERE book_id = ?")
                .bind(book_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(max)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Chapter {}", id)));
        }

        Ok(())
    }

    async fn apply_reorder(&self, plan: &ReorderPlan) -> Result<(), RepositoryError> {
        if plan.is_noop() {
            return Ok(());
        }

        let book_id = plan.book_id();
        // 任一步失败时 tx 被 drop，整体回滚
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 阶段一: 全部写入负数占位编号，腾出 1..=N
        for (chapter_id, placeholder) in plan.placeholder_assignments() {
            let result = sqlx::query(
                "UPDATE chapters SET chapter_number = ? WHERE id = ? AND book_id = ?",
            )
            .bind(placeholder)
            .bind(chapter_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, number_taken(placeholder)))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound(format!(
                    "Chapter {} in book {}",
                    chapter_id, book_id
                )));
            }
        }

        // 阶段二: 写入最终编号
        let now = Utc::now().to_rfc3339();
        for (chapter_id, number) in plan.final_assignments() {
            sqlx::query(
                "UPDATE chapters SET chapter_number = ?, updated_at = ? WHERE id = ? AND book_id = ?",
            )
            .bind(number)
            .bind(&now)
            .bind(chapter_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, number_taken(number)))?;
        }

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(
            book_id = book_id,
            chapters = plan.order().len(),
            "Two-phase renumbering committed"
        );

        Ok(())
    }
}
