//! 历史查询与排序服务
//!
//! 消息存储只保证"时间升序 + 同秒插入序"的检索顺序；本服务在查询
//! 窗口内补上从 0 开始的连续序号。序号相对于返回窗口，不是全局
//! 下标——同一查询重复执行必须得到相同的序列。

use std::sync::Arc;

use config::HistoryConfig;
use domain::repositories::{MessageRepository, Pagination, RoomRepository};
use domain::{DomainError, Message, RoomId, RoomKind};
use serde::{Deserialize, Serialize};

use crate::errors::{ApplicationError, ApplicationResult};

/// 历史查询请求（offset/size 分页，页码从 0 开始）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub kind: RoomKind,
    pub room_id: RoomId,
    pub page: u32,
    pub size: u32,
}

/// 带窗口内序号的消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 窗口内序号，0 起始、连续
    pub order: u32,
    pub message: Message,
}

/// 历史分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
}

pub struct HistoryServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub config: HistoryConfig,
}

pub struct HistoryService {
    deps: HistoryServiceDependencies,
}

impl HistoryService {
    pub fn new(deps: HistoryServiceDependencies) -> Self {
        Self { deps }
    }

    /// 查询房间历史
    ///
    /// `size` 超过配置上限时收敛到上限；越界的页返回空序列而非错误。
    pub async fn get_history(&self, query: HistoryQuery) -> ApplicationResult<HistoryPage> {
        if query.size == 0 {
            return Err(ApplicationError::Validation("size 必须大于 0".to_string()));
        }
        let size = query.size.min(self.deps.config.max_page_size);

        self.deps
            .room_repository
            .find_by_id(query.kind, &query.room_id)
            .await?
            .ok_or_else(|| DomainError::room_not_found(query.kind, query.room_id.to_string()))?;

        let page = self
            .deps
            .message_repository
            .find_by_room(&query.room_id, Pagination::new(query.page, size))
            .await?;

        let entries = page
            .items
            .into_iter()
            .enumerate()
            .map(|(i, message)| HistoryEntry {
                order: i as u32,
                message,
            })
            .collect();

        Ok(HistoryPage {
            entries,
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            has_next: page.has_next,
        })
    }
}
