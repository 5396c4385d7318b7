//! Inkbranch - 章节编排与互动内容服务

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use inkbranch::config::{load_config, print_config, AppConfig};
use inkbranch::infrastructure::http::{AppState, HttpServer, ServerConfig};
use inkbranch::infrastructure::memory::InMemoryBookLocks;
use inkbranch::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteBookRepository, SqliteChapterRepository,
};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},inkbranch={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Inkbranch - chapter sequencer v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 确保数据目录存在
    if !config.database.is_in_memory() {
        if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // 初始化数据库
    // 内存库每个连接各自独立，只能用单连接
    let db_config = if config.database.is_in_memory() {
        DatabaseConfig::in_memory()
    } else {
        DatabaseConfig {
            database_url: config.database.database_url(),
            max_connections: config.database.max_connections,
        }
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器与书籍锁
    let book_repo = Arc::new(SqliteBookRepository::new(pool.clone()));
    let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
    let book_locks = InMemoryBookLocks::new().arc();

    let state = AppState::new(book_repo, chapter_repo, book_locks);

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_body_bytes: config.server.max_body_bytes,
        cors_origins: config.server.cors_origins.clone(),
    };
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}
