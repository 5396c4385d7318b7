//! Inkbranch - 网文平台的章节编排与互动内容服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Chapter Context: 章节内容模型、发布状态、章节排序
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Book/Chapter Repository, BookLock）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API
//! - Memory: 按书籍划分的写锁
//! - Persistence: SQLite 存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
