//! 房间生命周期服务
//!
//! 负责房间的取得或创建、查找与级联删除。同一无序昵称对首次接触时
//! 创建房间，后续接触复用既有房间；并发首次接触依靠存储级唯一约束
//! 兜底，冲突方重读后返回胜者。

use std::sync::Arc;

use domain::repositories::{MessageRepository, RoomRepository};
use domain::{DomainError, Room, RoomId, RoomKind};

use crate::clock::Clock;
use crate::errors::{ApplicationError, ApplicationResult};
use crate::room_id::RoomIdGenerator;

/// 删除房间请求
#[derive(Debug, Clone)]
pub struct DeleteRoomRequest {
    pub kind: RoomKind,
    pub initiator_nickname: String,
    pub recipient_nickname: String,
    pub room_id: RoomId,
}

pub struct RoomServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub id_generator: Arc<dyn RoomIdGenerator>,
    pub clock: Arc<dyn Clock>,
}

pub struct RoomService {
    deps: RoomServiceDependencies,
}

impl RoomService {
    pub fn new(deps: RoomServiceDependencies) -> Self {
        Self { deps }
    }

    /// 取得或创建房间
    ///
    /// 对同一无序昵称对幂等：已存在则复用，否则生成不透明ID创建。
    /// 创建撞上唯一约束（并发首次接触）时重读并返回已有房间。
    pub async fn get_or_create_room(
        &self,
        kind: RoomKind,
        initiator_nickname: &str,
        recipient_nickname: &str,
    ) -> ApplicationResult<Room> {
        if let Some(existing) = self
            .deps
            .room_repository
            .find_by_pair(kind, initiator_nickname, recipient_nickname)
            .await?
        {
            return Ok(existing);
        }

        let room = Room::new(
            self.deps.id_generator.generate(),
            kind,
            initiator_nickname,
            recipient_nickname,
            self.deps.clock.now(),
        )?;

        match self.deps.room_repository.create(room).await {
            Ok(created) => {
                tracing::info!(room_id = %created.id, kind = %kind, "房间已创建");
                Ok(created)
            }
            Err(DomainError::Conflict { .. }) => {
                // 并发首次接触：对方已建好，读出胜者
                self.deps
                    .room_repository
                    .find_by_pair(kind, initiator_nickname, recipient_nickname)
                    .await?
                    .ok_or_else(|| {
                        ApplicationError::Conflict(format!(
                            "房间创建冲突后未找到既有房间: {initiator_nickname}/{recipient_nickname}"
                        ))
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 根据ID查找房间
    pub async fn find_room(&self, kind: RoomKind, room_id: &RoomId) -> ApplicationResult<Room> {
        self.deps
            .room_repository
            .find_by_id(kind, room_id)
            .await?
            .ok_or_else(|| DomainError::room_not_found(kind, room_id.to_string()).into())
    }

    /// 查找某昵称发起的全部房间
    pub async fn list_rooms_by_initiator(
        &self,
        kind: RoomKind,
        initiator_nickname: &str,
    ) -> ApplicationResult<Vec<Room>> {
        Ok(self
            .deps
            .room_repository
            .find_by_initiator(kind, initiator_nickname)
            .await?)
    }

    /// 删除房间及其全部消息
    ///
    /// 两步删除且无跨存储事务：先删消息，后删房间行。消息删除成功
    /// 而房间行删除失败时，留下的是"空但存在"的房间——记录告警并
    /// 仍然返回成功，等待后台清理，不视为数据丢失。
    pub async fn delete_room(&self, request: DeleteRoomRequest) -> ApplicationResult<()> {
        for (field, value) in [
            ("initiator_nickname", request.initiator_nickname.as_str()),
            ("recipient_nickname", request.recipient_nickname.as_str()),
            ("room_id", request.room_id.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(ApplicationError::Validation(format!("{field} 不能为空")));
            }
        }

        let room = self.find_room(request.kind, &request.room_id).await?;
        if !room.has_participant(&request.initiator_nickname)
            || !room.has_participant(&request.recipient_nickname)
        {
            return Err(ApplicationError::Validation(format!(
                "昵称与房间参与者不匹配: {}",
                request.room_id
            )));
        }

        let removed = self
            .deps
            .message_repository
            .delete_by_room(&request.room_id)
            .await?;
        tracing::debug!(room_id = %request.room_id, removed, "房间消息已级联删除");

        match self
            .deps
            .room_repository
            .delete(request.kind, &request.room_id)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                // 消息已删、房间行残留：可恢复的不一致，不向调用方报错
                tracing::warn!(
                    room_id = %request.room_id,
                    error = %e,
                    "房间行删除失败，留下空房间等待后台清理"
                );
                Ok(())
            }
        }
    }
}
