//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                  GET   健康检查
//! - /api/book/create           POST  创建书籍
//! - /api/book/get              POST  获取书籍详情
//! - /api/book/list             GET   列出书籍（?status= 过滤）
//! - /api/book/delete           POST  删除书籍及其章节
//! - /api/chapter/create        POST  创建章节
//! - /api/chapter/get           POST  获取章节详情
//! - /api/chapter/list          POST  列出书籍的章节
//! - /api/chapter/update        POST  更新章节
//! - /api/chapter/delete        POST  删除章节
//! - /api/chapter/reorder       POST  移动章节并重排
//! - /api/chapter/next_number   POST  下一个可用章节号

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/book", book_routes())
        .nest("/chapter", chapter_routes())
}

/// Book 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_book))
        .route("/get", post(handlers::get_book))
        .route("/list", get(handlers::list_books))
        .route("/delete", post(handlers::delete_book))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_chapter))
        .route("/get", post(handlers::get_chapter))
        .route("/list", post(handlers::list_chapters))
        .route("/update", post(handlers::update_chapter))
        .route("/delete", post(handlers::delete_chapter))
        .route("/reorder", post(handlers::reorder_chapters))
        .route("/next_number", post(handlers::next_chapter_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::infrastructure::memory::InMemoryBookLocks;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteBookRepository,
        SqliteChapterRepository,
    };

    async fn app() -> Router {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let state = AppState::new(
            Arc::new(SqliteBookRepository::new(pool.clone())),
            Arc::new(SqliteChapterRepository::new(pool)),
            Arc::new(InMemoryBookLocks::new()),
        );
        create_routes().with_state(Arc::new(state))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Value {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> Value {
        call(app, Method::POST, uri, Some(body)).await
    }

    async fn create_book(app: &Router) -> i64 {
        let resp = post_json(app, "/api/book/create", json!({ "title": "Lanterns" })).await;
        assert_eq!(resp["errno"], 0);
        resp["data"]["id"].as_i64().unwrap()
    }

    async fn create_chapter(app: &Router, book_id: i64, number: i64) -> i64 {
        let resp = post_json(
            app,
            "/api/chapter/create",
            json!({
                "book_id": book_id,
                "title": format!("Chapter {}", number),
                "chapter_number": number,
                "content_data": { "text": "one two three" }
            }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{}", resp);
        resp["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let app = app().await;
        let resp = call(&app, Method::GET, "/api/ping", None).await;
        assert_eq!(resp["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_and_get_chapter() {
        let app = app().await;
        let book_id = create_book(&app).await;

        let resp = post_json(
            &app,
            "/api/chapter/create",
            json!({
                "book_id": book_id,
                "title": "Crossroads",
                "chapter_number": 1,
                "content_type": "interactive",
                "content_data": {
                    "nodes": [
                        { "id": "start", "text": "You wake up", "choices": [{ "text": "Go left", "next": "left" }] },
                        { "id": "left", "text": "A dark hall" }
                    ],
                    "entry": "start"
                },
                "is_published": true
            }),
        )
        .await;

        assert_eq!(resp["errno"], 0, "{}", resp);
        let data = &resp["data"];
        assert_eq!(data["content_type"], "interactive");
        assert_eq!(data["word_count"], 6);
        assert_eq!(data["is_published"], true);
        assert!(data["published_at"].is_string());
        assert_eq!(data["content_data"]["entry"], "start");

        let id = data["id"].as_i64().unwrap();
        let fetched = post_json(&app, "/api/chapter/get", json!({ "id": id })).await;
        assert_eq!(fetched["data"]["title"], "Crossroads");
        assert_eq!(fetched["data"]["content_data"]["nodes"][1]["id"], "left");
    }

    #[tokio::test]
    async fn test_invalid_content_is_bad_request() {
        let app = app().await;
        let book_id = create_book(&app).await;

        let resp = post_json(
            &app,
            "/api/chapter/create",
            json!({
                "book_id": book_id,
                "title": "Broken",
                "chapter_number": 1,
                "content_type": "simple",
                "content_data": { "body": "no text key" }
            }),
        )
        .await;

        assert_eq!(resp["errno"], 400);
        assert_eq!(
            resp["error"],
            "Simple chapters must have 'text' field in content_data"
        );
        assert!(resp["data"].is_null());
    }

    #[tokio::test]
    async fn test_duplicate_number_is_conflict() {
        let app = app().await;
        let book_id = create_book(&app).await;
        create_chapter(&app, book_id, 1).await;

        let resp = post_json(
            &app,
            "/api/chapter/create",
            json!({
                "book_id": book_id,
                "title": "Again",
                "chapter_number": 1,
                "content_data": { "text": "x" }
            }),
        )
        .await;

        assert_eq!(resp["errno"], 409);
    }

    #[tokio::test]
    async fn test_missing_resources_are_not_found() {
        let app = app().await;

        let resp = post_json(&app, "/api/book/get", json!({ "id": 77 })).await;
        assert_eq!(resp["errno"], 404);

        let resp = post_json(&app, "/api/chapter/get", json!({ "id": 77 })).await;
        assert_eq!(resp["errno"], 404);

        let resp = post_json(&app, "/api/chapter/next_number", json!({ "book_id": 77 })).await;
        assert_eq!(resp["errno"], 404);
    }

    #[tokio::test]
    async fn test_reorder_returns_renumbered_list() {
        let app = app().await;
        let book_id = create_book(&app).await;
        let a = create_chapter(&app, book_id, 1).await;
        let b = create_chapter(&app, book_id, 2).await;
        let c = create_chapter(&app, book_id, 3).await;

        let resp = post_json(
            &app,
            "/api/chapter/reorder",
            json!({ "book_id": book_id, "chapter_id": c, "new_chapter_number": 1 }),
        )
        .await;

        assert_eq!(resp["errno"], 0, "{}", resp);
        assert_eq!(resp["data"]["total"], 3);
        let chapters = resp["data"]["chapters"].as_array().unwrap();
        let order: Vec<(i64, i64)> = chapters
            .iter()
            .map(|ch| {
                (
                    ch["id"].as_i64().unwrap(),
                    ch["chapter_number"].as_i64().unwrap(),
                )
            })
            .collect();
        assert_eq!(order, vec![(c, 1), (a, 2), (b, 3)]);
        assert!(chapters[0].get("content_data").is_none());
    }

    #[tokio::test]
    async fn test_reorder_out_of_range() {
        let app = app().await;
        let book_id = create_book(&app).await;
        let a = create_chapter(&app, book_id, 1).await;

        let resp = post_json(
            &app,
            "/api/chapter/reorder",
            json!({ "book_id": book_id, "chapter_id": a, "new_chapter_number": 5 }),
        )
        .await;

        assert_eq!(resp["errno"], 400);
    }

    #[tokio::test]
    async fn test_list_published_only_and_next_number() {
        let app = app().await;
        let book_id = create_book(&app).await;
        create_chapter(&app, book_id, 1).await;
        let second = create_chapter(&app, book_id, 4).await;

        let resp = post_json(
            &app,
            "/api/chapter/update",
            json!({ "id": second, "is_published": true }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{}", resp);

        let all = post_json(&app, "/api/chapter/list", json!({ "book_id": book_id })).await;
        assert_eq!(all["data"]["total"], 2);

        let published = post_json(
            &app,
            "/api/chapter/list",
            json!({ "book_id": book_id, "published_only": true }),
        )
        .await;
        assert_eq!(published["data"]["total"], 1);
        assert_eq!(published["data"]["chapters"][0]["id"], second);

        let next = post_json(&app, "/api/chapter/next_number", json!({ "book_id": book_id })).await;
        assert_eq!(next["data"]["next_chapter_number"], 5);
    }

    #[tokio::test]
    async fn test_book_list_and_delete() {
        let app = app().await;
        let book_id = create_book(&app).await;
        create_chapter(&app, book_id, 1).await;

        let resp = post_json(
            &app,
            "/api/book/create",
            json!({ "title": "Finished", "status": "completed" }),
        )
        .await;
        assert_eq!(resp["data"]["status"], "completed");

        let list = call(&app, Method::GET, "/api/book/list", None).await;
        assert_eq!(list["data"].as_array().unwrap().len(), 2);

        let filtered = call(&app, Method::GET, "/api/book/list?status=completed", None).await;
        assert_eq!(filtered["data"].as_array().unwrap().len(), 1);

        let bad = call(&app, Method::GET, "/api/book/list?status=archived", None).await;
        assert_eq!(bad["errno"], 400);

        let resp = post_json(&app, "/api/book/delete", json!({ "id": book_id })).await;
        assert_eq!(resp["errno"], 0);

        let resp = post_json(&app, "/api/chapter/list", json!({ "book_id": book_id })).await;
        assert_eq!(resp["errno"], 404);
    }
}
