//! Memory Layer - 内存实现
//!
//! 进程内的书级锁

mod book_locks;

pub use book_locks::InMemoryBookLocks;
