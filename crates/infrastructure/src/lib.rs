//! 基础设施层
//!
//! 领域层 Repository 接口的 PostgreSQL 实现，以及连接池与
//! 读路径重试工具。

pub mod db;
pub mod retry;

pub use db::repositories::{PostgresMessageRepository, PostgresRoomRepository};
pub use db::{create_pool, DbPool};
pub use retry::{retry_read, ReadRetry};
