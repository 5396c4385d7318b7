//! Book HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{BookStatus, CreateBook, DeleteBook, GetBook, ListBooks};
use crate::infrastructure::http::dto::{
    ApiResponse, BookIdRequest, BookResponse, CreateBookRequest, Empty, ListBooksParams,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

fn parse_status(raw: Option<&str>) -> Result<Option<BookStatus>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => BookStatus::from_str(s)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid book status: {}", s))),
    }
}

/// 创建书籍
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookRequest>,
) -> Result<Json<ApiResponse<BookResponse>>, ApiError> {
    let status = parse_status(req.status.as_deref())?;

    let book = state
        .create_book_handler
        .handle(CreateBook {
            title: req.title,
            description: req.description,
            genre: req.genre,
            status,
        })
        .await?;

    Ok(Json(ApiResponse::success(book.into())))
}

/// 获取书籍详情
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookIdRequest>,
) -> Result<Json<ApiResponse<BookResponse>>, ApiError> {
    let book = state
        .get_book_handler
        .handle(GetBook { book_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(book.into())))
}

/// 列出书籍，可按状态过滤
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<ApiResponse<Vec<BookResponse>>>, ApiError> {
    let status = parse_status(params.status.as_deref())?;

    let books = state.list_books_handler.handle(ListBooks { status }).await?;

    Ok(Json(ApiResponse::success(
        books.into_iter().map(BookResponse::from).collect(),
    )))
}

/// 删除书籍（连同其全部章节）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_book_handler
        .handle(DeleteBook { book_id: req.id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}
