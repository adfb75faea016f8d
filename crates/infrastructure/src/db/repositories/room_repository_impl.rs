//! 房间Repository实现
//!
//! 两类房间各占一张结构相同的表，由 `RoomKind` 选表。无序昵称对的
//! 唯一性由表上的表达式唯一索引保证（见 migrations），并发首次
//! 接触时后到的 INSERT 收到 23505，映射为领域层的 `Conflict`。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    errors::{DomainError, DomainResult},
    repositories::RoomRepository,
    Room, RoomId, RoomKind,
};
use sqlx::{query, query_as, FromRow};
use std::sync::Arc;

use crate::db::DbPool;
use crate::retry::{retry_read, ReadRetry};

/// PostgreSQL 唯一约束冲突
const UNIQUE_VIOLATION: &str = "23505";

/// 数据库房间模型
#[derive(Debug, Clone, FromRow)]
struct DbRoom {
    pub room_id: String,
    pub initiator_nickname: String,
    pub recipient_nickname: String,
    pub created_at: DateTime<Utc>,
}

impl DbRoom {
    fn into_room(self, kind: RoomKind) -> DomainResult<Room> {
        Room::new(
            RoomId::new(self.room_id),
            kind,
            self.initiator_nickname,
            self.recipient_nickname,
            self.created_at,
        )
    }
}

/// 房间Repository实现
pub struct PostgresRoomRepository {
    pool: Arc<DbPool>,
    retry: ReadRetry,
}

impl PostgresRoomRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            retry: ReadRetry::default(),
        }
    }

    fn table(kind: RoomKind) -> &'static str {
        match kind {
            RoomKind::Peer => "rooms",
            RoomKind::ChatBot => "chat_bot_rooms",
        }
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    async fn create(&self, room: Room) -> DomainResult<Room> {
        let result = query_as::<_, DbRoom>(&format!(
            r#"
            INSERT INTO {} (room_id, initiator_nickname, recipient_nickname, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING room_id, initiator_nickname, recipient_nickname, created_at
            "#,
            Self::table(room.kind)
        ))
        .bind(room.id.as_str())
        .bind(&room.initiator_nickname)
        .bind(&room.recipient_nickname)
        .bind(room.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match e.as_database_error().and_then(|d| d.code()) {
            Some(code) if code == UNIQUE_VIOLATION => DomainError::conflict(
                room.kind.display_name(),
                format!("{}/{}", room.initiator_nickname, room.recipient_nickname),
            ),
            _ => DomainError::storage_error(e.to_string()),
        })?;

        result.into_room(room.kind)
    }

    async fn find_by_id(&self, kind: RoomKind, id: &RoomId) -> DomainResult<Option<Room>> {
        let row = retry_read(&self.retry, || async move {
            query_as::<_, DbRoom>(&format!(
                r#"
                SELECT room_id, initiator_nickname, recipient_nickname, created_at
                FROM {} WHERE room_id = $1
                "#,
                Self::table(kind)
            ))
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))
        })
        .await?;

        row.map(|r| r.into_room(kind)).transpose()
    }

    async fn find_by_pair(
        &self,
        kind: RoomKind,
        nickname_a: &str,
        nickname_b: &str,
    ) -> DomainResult<Option<Room>> {
        let row = retry_read(&self.retry, || async move {
            query_as::<_, DbRoom>(&format!(
                r#"
                SELECT room_id, initiator_nickname, recipient_nickname, created_at
                FROM {}
                WHERE (initiator_nickname = $1 AND recipient_nickname = $2)
                   OR (initiator_nickname = $2 AND recipient_nickname = $1)
                "#,
                Self::table(kind)
            ))
            .bind(nickname_a)
            .bind(nickname_b)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))
        })
        .await?;

        row.map(|r| r.into_room(kind)).transpose()
    }

    async fn find_by_initiator(
        &self,
        kind: RoomKind,
        initiator_nickname: &str,
    ) -> DomainResult<Vec<Room>> {
        let rows = retry_read(&self.retry, || async move {
            query_as::<_, DbRoom>(&format!(
                r#"
                SELECT room_id, initiator_nickname, recipient_nickname, created_at
                FROM {} WHERE initiator_nickname = $1
                ORDER BY created_at ASC
                "#,
                Self::table(kind)
            ))
            .bind(initiator_nickname)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))
        })
        .await?;

        rows.into_iter().map(|r| r.into_room(kind)).collect()
    }

    async fn delete(&self, kind: RoomKind, id: &RoomId) -> DomainResult<bool> {
        // 删除是非幂等边界，不经过读重试
        let result = query(&format!(
            "DELETE FROM {} WHERE room_id = $1",
            Self::table(kind)
        ))
        .bind(id.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| DomainError::storage_error(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
