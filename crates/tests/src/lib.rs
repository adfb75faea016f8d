//! 跨层场景测试框架
//!
//! 提供把四个应用服务装配到内存存储上的测试环境。

pub mod test_utils;

pub use test_utils::*;
