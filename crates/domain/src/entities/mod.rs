//! 领域实体定义

pub mod message;
pub mod room;
