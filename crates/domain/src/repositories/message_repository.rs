//! 消息Repository接口定义

use crate::entities::message::{ClickOutcome, Message, MessageId, MessageKind};
use crate::entities::room::RoomId;
use crate::errors::DomainResult;
use crate::repositories::{PaginatedResult, Pagination};
use async_trait::async_trait;

/// 消息Repository接口
///
/// 消息存储不保证全局顺序；`find_by_room` 必须按发送时间升序返回，
/// 同一秒内的消息以存储层插入顺序为决定性 tie-break。
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 插入一条消息
    async fn insert(&self, message: Message) -> DomainResult<Message>;

    /// 按 ID + 载荷类别查找消息（LIST 消息幂等创建前的查重入口）
    async fn find_by_id_and_kind(
        &self,
        id: &MessageId,
        kind: MessageKind,
    ) -> DomainResult<Option<Message>>;

    /// 分页获取房间消息
    ///
    /// 排序：`created_at` 升序，同秒按插入顺序升序。
    /// 超出范围的页返回空列表而非错误。
    async fn find_by_room(
        &self,
        room_id: &RoomId,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResult<Message>>;

    /// 删除房间全部消息，返回删除条数
    async fn delete_by_room(&self, room_id: &RoomId) -> DomainResult<u64>;

    /// 对 LIST 消息的某个子回答应用一次点击
    ///
    /// 实现必须按消息ID串行化读-改-写（行锁或等价手段），
    /// 并发点击不得丢失更新；失败时不留下部分变更。
    async fn apply_click(
        &self,
        id: &MessageId,
        kind: MessageKind,
        question_id: &str,
        like_status: bool,
    ) -> DomainResult<ClickOutcome>;
}
