//! 计数器变更服务
//!
//! 对 LIST 消息的子回答应用点击：浏览计数每次 +1，点赞计数按
//! 期望状态切换、重复同向调用幂等。按消息ID的串行化由 Repository
//! 实现保证（内存版写锁 / 数据库版行锁），点击写入属于非幂等写，
//! 失败时不自动重试，避免重复计数。

use std::sync::Arc;

use domain::repositories::MessageRepository;
use domain::{MessageId, MessageKind};
use serde::{Deserialize, Serialize};

use crate::errors::ApplicationResult;

/// 点击请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickRequest {
    pub message_id: MessageId,
    pub kind: MessageKind,
    pub question_id: String,
    pub like_status: bool,
}

/// 点击后的计数器快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickResult {
    pub views: u64,
    pub likes: u64,
}

pub struct ClickServiceDependencies {
    pub message_repository: Arc<dyn MessageRepository>,
}

pub struct ClickService {
    deps: ClickServiceDependencies,
}

impl ClickService {
    pub fn new(deps: ClickServiceDependencies) -> Self {
        Self { deps }
    }

    /// 应用一次点击
    ///
    /// 消息（按 ID + 类别）或子回答不存在时返回未找到错误，
    /// 且不留下任何部分变更。
    pub async fn apply_click(&self, request: ClickRequest) -> ApplicationResult<ClickResult> {
        let outcome = self
            .deps
            .message_repository
            .apply_click(
                &request.message_id,
                request.kind,
                &request.question_id,
                request.like_status,
            )
            .await?;

        tracing::debug!(
            message_id = %request.message_id,
            question_id = %request.question_id,
            views = outcome.views,
            likes = outcome.likes,
            "点击已应用"
        );

        Ok(ClickResult {
            views: outcome.views,
            likes: outcome.likes,
        })
    }
}
