//! 存储实现
//!
//! 内存版 Repository 实现，供单元测试与单节点部署使用；
//! 生产实现见 infrastructure crate。

pub mod memory;

pub use memory::{MemoryMessageRepository, MemoryRoomRepository};
