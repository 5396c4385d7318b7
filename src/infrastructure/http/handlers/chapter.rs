//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CreateChapter, DeleteChapter, GetChapter, ListChapters, NextChapterNumber, ReorderChapters,
    UpdateChapter,
};
use crate::infrastructure::http::dto::{
    ApiResponse, ChapterIdRequest, ChapterListResponse, ChapterResponse, CreateChapterRequest,
    Empty, ListChaptersRequest, NextChapterNumberRequest, NextChapterNumberResponse,
    ReorderChaptersRequest, UpdateChapterRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建章节
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let chapter = state
        .create_chapter_handler
        .handle(CreateChapter {
            book_id: req.book_id,
            title: req.title,
            chapter_number: req.chapter_number,
            content_type: req.content_type,
            content_data: req.content_data,
            is_published: req.is_published,
        })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 获取章节详情（含内容）
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterIdRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let chapter = state
        .get_chapter_handler
        .handle(GetChapter { chapter_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 列出书籍的章节
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListChaptersRequest>,
) -> Result<Json<ApiResponse<ChapterListResponse>>, ApiError> {
    let chapters = state
        .list_chapters_handler
        .handle(ListChapters {
            book_id: req.book_id,
            published_only: req.published_only,
        })
        .await?;

    Ok(Json(ApiResponse::success(ChapterListResponse::new(
        req.book_id,
        chapters,
    ))))
}

/// 更新章节
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let chapter = state
        .update_chapter_handler
        .handle(UpdateChapter {
            chapter_id: req.id,
            title: req.title,
            chapter_number: req.chapter_number,
            content_type: req.content_type,
            content_data: req.content_data,
            is_published: req.is_published,
        })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 删除章节
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_chapter_handler
        .handle(DeleteChapter { chapter_id: req.id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 移动章节到新位置，返回重排后的完整章节列表
pub async fn reorder_chapters(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReorderChaptersRequest>,
) -> Result<Json<ApiResponse<ChapterListResponse>>, ApiError> {
    let chapters = state
        .reorder_chapters_handler
        .handle(ReorderChapters {
            book_id: req.book_id,
            chapter_id: req.chapter_id,
            new_chapter_number: req.new_chapter_number,
        })
        .await?;

    Ok(Json(ApiResponse::success(ChapterListResponse::new(
        req.book_id,
        chapters,
    ))))
}

/// 下一个可用章节号
pub async fn next_chapter_number(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NextChapterNumberRequest>,
) -> Result<Json<ApiResponse<NextChapterNumberResponse>>, ApiError> {
    let next = state
        .next_chapter_number_handler
        .handle(NextChapterNumber {
            book_id: req.book_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(NextChapterNumberResponse {
        book_id: req.book_id,
        next_chapter_number: next,
    })))
}
