//! 消息发送服务
//!
//! 校验房间存在后落库。LIST 消息（欢迎/推荐）的创建走"按 ID + 类别
//! 查重"的幂等路径：已存在即无操作成功，保证同一 ID 至多一条。

use std::sync::Arc;

use domain::repositories::{MessageRepository, RoomRepository};
use domain::{AnswerSummary, DomainError, Message, MessageId, MessageKind, RoomId, RoomKind, SenderType};

use crate::clock::Clock;
use crate::errors::ApplicationResult;

/// 发送文本消息请求
#[derive(Debug, Clone)]
pub struct SendTextRequest {
    pub kind: RoomKind,
    pub room_id: RoomId,
    pub sender_type: SenderType,
    pub sender_nickname: String,
    pub body: String,
}

/// 发送子回答列表消息请求
///
/// `message_id` 由调用方提供，是幂等创建的去重键。
#[derive(Debug, Clone)]
pub struct SendListRequest {
    pub kind: RoomKind,
    pub room_id: RoomId,
    pub message_id: MessageId,
    pub sender_type: SenderType,
    pub sender_nickname: String,
    pub answers: Vec<AnswerSummary>,
}

pub struct MessageServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct MessageService {
    deps: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    /// 发送文本消息，返回存储分配的消息ID
    pub async fn send_text(&self, request: SendTextRequest) -> ApplicationResult<MessageId> {
        self.ensure_room_exists(request.kind, &request.room_id).await?;

        let message = Message::new_text(
            request.room_id,
            request.sender_type,
            request.sender_nickname,
            request.body,
            self.deps.clock.now(),
        )?;
        let stored = self.deps.message_repository.insert(message).await?;
        Ok(stored.id)
    }

    /// 幂等创建子回答列表消息
    ///
    /// 同一 `message_id` 已存在 LIST 消息时视为无操作成功，
    /// 返回既有消息的ID。
    pub async fn send_list(&self, request: SendListRequest) -> ApplicationResult<MessageId> {
        self.ensure_room_exists(request.kind, &request.room_id).await?;

        if let Some(existing) = self
            .deps
            .message_repository
            .find_by_id_and_kind(&request.message_id, MessageKind::List)
            .await?
        {
            tracing::debug!(message_id = %existing.id, "列表消息已存在，幂等返回");
            return Ok(existing.id);
        }

        let message = Message::new_list(
            request.message_id,
            request.room_id,
            request.sender_type,
            request.sender_nickname,
            request.answers,
            self.deps.clock.now(),
        )?;
        let stored = self.deps.message_repository.insert(message).await?;
        Ok(stored.id)
    }

    async fn ensure_room_exists(&self, kind: RoomKind, room_id: &RoomId) -> ApplicationResult<()> {
        self.deps
            .room_repository
            .find_by_id(kind, room_id)
            .await?
            .ok_or_else(|| DomainError::room_not_found(kind, room_id.to_string()))?;
        Ok(())
    }
}
