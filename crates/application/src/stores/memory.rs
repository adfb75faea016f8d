//! 内存版 Repository 实现
//!
//! 以 `tokio::sync::RwLock` 保护的内存结构实现领域层的 Repository
//! 接口。写锁天然串行化同一进程内的变更，因此昵称对唯一性检查与
//! 点击的读-改-写在这里都是原子的；消息按房间保存在插入顺序的
//! Vec 中，稳定排序即可得到"同秒按插入顺序"的决定性历史。

use async_trait::async_trait;
use domain::errors::{DomainError, DomainResult};
use domain::repositories::{
    MessageRepository, PaginatedResult, Pagination, RoomRepository,
};
use domain::{
    ClickOutcome, Message, MessageId, MessageKind, PairKey, Room, RoomId, RoomKind,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 内存版房间存储
#[derive(Default)]
pub struct MemoryRoomRepository {
    inner: RwLock<RoomPartitions>,
}

#[derive(Default)]
struct RoomPartitions {
    /// (分区, 房间ID) -> 房间
    rooms: HashMap<(RoomKind, String), Room>,
    /// (分区, 无序昵称对) -> 房间ID，充当存储级唯一约束
    pair_index: HashMap<(RoomKind, PairKey), String>,
}

impl MemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for MemoryRoomRepository {
    async fn create(&self, room: Room) -> DomainResult<Room> {
        let mut inner = self.inner.write().await;
        let pair = (room.kind, room.pair_key());
        if inner.pair_index.contains_key(&pair) {
            return Err(DomainError::conflict(
                room.kind.display_name(),
                format!("{}|{}", pair.1.lo, pair.1.hi),
            ));
        }
        if inner
            .rooms
            .contains_key(&(room.kind, room.id.as_str().to_string()))
        {
            return Err(DomainError::conflict(
                room.kind.display_name(),
                room.id.to_string(),
            ));
        }

        inner
            .pair_index
            .insert(pair, room.id.as_str().to_string());
        inner
            .rooms
            .insert((room.kind, room.id.as_str().to_string()), room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, kind: RoomKind, id: &RoomId) -> DomainResult<Option<Room>> {
        let inner = self.inner.read().await;
        Ok(inner.rooms.get(&(kind, id.as_str().to_string())).cloned())
    }

    async fn find_by_pair(
        &self,
        kind: RoomKind,
        nickname_a: &str,
        nickname_b: &str,
    ) -> DomainResult<Option<Room>> {
        let inner = self.inner.read().await;
        let key = (kind, PairKey::new(nickname_a, nickname_b));
        let room = inner
            .pair_index
            .get(&key)
            .and_then(|id| inner.rooms.get(&(kind, id.clone())))
            .cloned();
        Ok(room)
    }

    async fn find_by_initiator(
        &self,
        kind: RoomKind,
        initiator_nickname: &str,
    ) -> DomainResult<Vec<Room>> {
        let inner = self.inner.read().await;
        let mut rooms: Vec<Room> = inner
            .rooms
            .values()
            .filter(|r| r.kind == kind && r.initiator_nickname == initiator_nickname)
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rooms)
    }

    async fn delete(&self, kind: RoomKind, id: &RoomId) -> DomainResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.rooms.remove(&(kind, id.as_str().to_string())) {
            Some(room) => {
                inner.pair_index.remove(&(kind, room.pair_key()));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// 内存版消息存储
///
/// 每个房间一个插入顺序的 Vec，模拟文档存储"仅插入序可依赖"的特性。
#[derive(Default)]
pub struct MemoryMessageRepository {
    messages_by_room: RwLock<HashMap<String, Vec<Message>>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut list: Vec<Message>) -> Vec<Message> {
        // 稳定排序：同秒消息保持插入顺序
        list.sort_by_key(|m| m.created_at);
        list
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn insert(&self, message: Message) -> DomainResult<Message> {
        let mut map = self.messages_by_room.write().await;
        let room_messages = map
            .entry(message.room_id.as_str().to_string())
            .or_default();
        if room_messages.iter().any(|m| m.id == message.id) {
            return Err(DomainError::conflict("消息", message.id.to_string()));
        }
        room_messages.push(message.clone());
        Ok(message)
    }

    async fn find_by_id_and_kind(
        &self,
        id: &MessageId,
        kind: MessageKind,
    ) -> DomainResult<Option<Message>> {
        let map = self.messages_by_room.read().await;
        Ok(map
            .values()
            .flatten()
            .find(|m| m.id == *id && m.kind() == kind)
            .cloned())
    }

    async fn find_by_room(
        &self,
        room_id: &RoomId,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResult<Message>> {
        let map = self.messages_by_room.read().await;
        let list = Self::sorted(map.get(room_id.as_str()).cloned().unwrap_or_default());
        let total = list.len() as u64;

        let start = pagination.offset() as usize;
        let end = std::cmp::min(start + pagination.limit() as usize, list.len());
        let items = if start < list.len() {
            list[start..end].to_vec()
        } else {
            vec![]
        };
        Ok(PaginatedResult::new(items, total, pagination))
    }

    async fn delete_by_room(&self, room_id: &RoomId) -> DomainResult<u64> {
        let mut map = self.messages_by_room.write().await;
        Ok(map
            .remove(room_id.as_str())
            .map(|v| v.len() as u64)
            .unwrap_or(0))
    }

    async fn apply_click(
        &self,
        id: &MessageId,
        kind: MessageKind,
        question_id: &str,
        like_status: bool,
    ) -> DomainResult<ClickOutcome> {
        // 写锁覆盖整个读-改-写，进程内并发点击不会丢失更新
        let mut map = self.messages_by_room.write().await;
        let message = map
            .values_mut()
            .flatten()
            .find(|m| m.id == *id && m.kind() == kind)
            .ok_or_else(|| DomainError::message_not_found(id.to_string()))?;
        message.apply_click(question_id, like_status)
    }
}
