//! 房间Repository接口定义

use crate::entities::room::{Room, RoomId, RoomKind};
use crate::errors::DomainResult;
use async_trait::async_trait;

/// 房间Repository接口
///
/// 同一个接口服务两类房间（私聊 / 机器人），由实现按 `RoomKind`
/// 映射到各自的存储分区；两个分区互不引用。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 持久化新房间
    ///
    /// 同一无序昵称对在同一分区中至多存在一个房间；并发首次接触时，
    /// 实现必须依靠存储级唯一约束让后到者收到 `Conflict`，
    /// 而不是靠"先查后写"。
    async fn create(&self, room: Room) -> DomainResult<Room>;

    /// 根据ID查找房间
    async fn find_by_id(&self, kind: RoomKind, id: &RoomId) -> DomainResult<Option<Room>>;

    /// 根据无序昵称对查找房间（(a, b) 与 (b, a) 等价）
    async fn find_by_pair(
        &self,
        kind: RoomKind,
        nickname_a: &str,
        nickname_b: &str,
    ) -> DomainResult<Option<Room>>;

    /// 查找某昵称发起的全部房间（机器人房间按发起方可查）
    async fn find_by_initiator(
        &self,
        kind: RoomKind,
        initiator_nickname: &str,
    ) -> DomainResult<Vec<Room>>;

    /// 删除房间行，返回是否确有删除
    async fn delete(&self, kind: RoomKind, id: &RoomId) -> DomainResult<bool>;
}
