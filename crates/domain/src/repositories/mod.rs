//! Repository接口定义
//!
//! 定义数据访问层的抽象接口，遵循清洁架构原则：内层定义接口，外层实现接口。

pub mod message_repository;
pub mod room_repository;

pub use message_repository::MessageRepository;
pub use room_repository::RoomRepository;

/// 分页参数（页码从 0 开始）
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.page_size as u64
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

/// 分页结果
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, pagination: Pagination) -> Self {
        let consumed = pagination.offset() + items.len() as u64;
        Self {
            items,
            total_count,
            page: pagination.page,
            page_size: pagination.page_size,
            has_next: consumed < total_count,
        }
    }
}
