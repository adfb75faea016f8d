//! 消息Repository实现
//!
//! 消息表带 `seq BIGSERIAL` 插入序号；历史检索按
//! `created_at ASC, seq ASC` 排序，同秒消息由插入顺序决定先后。
//! 点击计数走 `SELECT ... FOR UPDATE` 事务，按消息ID行锁串行化
//! 读-改-写，并发点击不丢失更新。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    errors::{DomainError, DomainResult},
    repositories::{MessageRepository, PaginatedResult, Pagination},
    AnswerSummary, ClickOutcome, Message, MessageId, MessageKind, MessagePayload, RoomId,
    SenderType,
};
use serde_json::Value as JsonValue;
use sqlx::{query, query_as, FromRow, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::DbPool;
use crate::retry::{retry_read, ReadRetry};

/// 数据库消息模型
#[derive(Debug, Clone, FromRow)]
struct DbMessage {
    pub id: Uuid,
    pub room_id: String,
    pub sender_type: String,
    pub sender_nickname: String,
    pub message_kind: String,
    pub body: Option<String>,
    pub answers: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

impl DbMessage {
    fn into_message(self) -> DomainResult<Message> {
        let sender_type = match self.sender_type.as_str() {
            "mentor" => SenderType::Mentor,
            "mentee" => SenderType::Mentee,
            "bot" => SenderType::Bot,
            other => {
                return Err(DomainError::storage_error(format!(
                    "未知发送者类别: {other}"
                )))
            }
        };

        let payload = match self.message_kind.as_str() {
            "text" => MessagePayload::Text(self.body.unwrap_or_default()),
            "list" => {
                let answers: Vec<AnswerSummary> = self
                    .answers
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|e| {
                        DomainError::storage_error(format!("子回答载荷损坏: {e}"))
                    })?
                    .unwrap_or_default();
                MessagePayload::List(answers)
            }
            other => {
                return Err(DomainError::storage_error(format!(
                    "未知消息类别: {other}"
                )))
            }
        };

        Message::with_id(
            MessageId(self.id),
            RoomId::new(self.room_id),
            sender_type,
            self.sender_nickname,
            payload,
            self.created_at,
        )
    }
}

const SELECT_COLUMNS: &str =
    "id, room_id, sender_type, sender_nickname, message_kind, body, answers, created_at";

/// 消息Repository实现
pub struct PostgresMessageRepository {
    pool: Arc<DbPool>,
    retry: ReadRetry,
}

impl PostgresMessageRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            retry: ReadRetry::default(),
        }
    }

    fn payload_columns(message: &Message) -> DomainResult<(Option<&str>, Option<JsonValue>)> {
        match &message.payload {
            MessagePayload::Text(body) => Ok((Some(body.as_str()), None)),
            MessagePayload::List(answers) => {
                let json = serde_json::to_value(answers)
                    .map_err(|e| DomainError::storage_error(e.to_string()))?;
                Ok((None, Some(json)))
            }
        }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn insert(&self, message: Message) -> DomainResult<Message> {
        let (body, answers) = Self::payload_columns(&message)?;

        let row = query_as::<_, DbMessage>(&format!(
            r#"
            INSERT INTO messages (id, room_id, sender_type, sender_nickname, message_kind, body, answers, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(message.id.0)
        .bind(message.room_id.as_str())
        .bind(message.sender_type.to_string())
        .bind(&message.sender_nickname)
        .bind(message.kind().to_string())
        .bind(body)
        .bind(answers)
        .bind(message.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match e.as_database_error().and_then(|d| d.code()) {
            Some(code) if code == "23505" => {
                DomainError::conflict("消息", message.id.to_string())
            }
            _ => DomainError::storage_error(e.to_string()),
        })?;

        row.into_message()
    }

    async fn find_by_id_and_kind(
        &self,
        id: &MessageId,
        kind: MessageKind,
    ) -> DomainResult<Option<Message>> {
        let row = retry_read(&self.retry, || async move {
            query_as::<_, DbMessage>(&format!(
                "SELECT {SELECT_COLUMNS} FROM messages WHERE id = $1 AND message_kind = $2",
            ))
            .bind(id.0)
            .bind(kind.to_string())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))
        })
        .await?;

        row.map(DbMessage::into_message).transpose()
    }

    async fn find_by_room(
        &self,
        room_id: &RoomId,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResult<Message>> {
        let total_count: i64 = retry_read(&self.retry, || async move {
            query("SELECT COUNT(*) FROM messages WHERE room_id = $1")
                .bind(room_id.as_str())
                .fetch_one(&*self.pool)
                .await
                .map_err(|e| DomainError::storage_error(e.to_string()))
                .map(|row| row.get(0))
        })
        .await?;

        let rows = retry_read(&self.retry, || async move {
            query_as::<_, DbMessage>(&format!(
                r#"
                SELECT {SELECT_COLUMNS}
                FROM messages
                WHERE room_id = $1
                ORDER BY created_at ASC, seq ASC
                LIMIT $2 OFFSET $3
                "#,
            ))
            .bind(room_id.as_str())
            .bind(pagination.limit() as i64)
            .bind(pagination.offset() as i64)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))
        })
        .await?;

        let messages: Vec<Message> = rows
            .into_iter()
            .map(DbMessage::into_message)
            .collect::<DomainResult<_>>()?;

        Ok(PaginatedResult::new(
            messages,
            total_count as u64,
            pagination,
        ))
    }

    async fn delete_by_room(&self, room_id: &RoomId) -> DomainResult<u64> {
        let result = query("DELETE FROM messages WHERE room_id = $1")
            .bind(room_id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn apply_click(
        &self,
        id: &MessageId,
        kind: MessageKind,
        question_id: &str,
        like_status: bool,
    ) -> DomainResult<ClickOutcome> {
        // 非幂等写：不重试，整个读-改-写在一个事务内，行锁串行化
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))?;

        let row = query_as::<_, DbMessage>(&format!(
            "SELECT {SELECT_COLUMNS} FROM messages WHERE id = $1 AND message_kind = $2 FOR UPDATE",
        ))
        .bind(id.0)
        .bind(kind.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::storage_error(e.to_string()))?
        .ok_or_else(|| DomainError::message_not_found(id.to_string()))?;

        let mut message = row.into_message()?;
        let outcome = message.apply_click(question_id, like_status)?;

        let answers = match &message.payload {
            MessagePayload::List(answers) => serde_json::to_value(answers)
                .map_err(|e| DomainError::storage_error(e.to_string()))?,
            MessagePayload::Text(_) => {
                // apply_click 已拒绝文本消息，这里不可达
                return Err(DomainError::message_not_found(id.to_string()));
            }
        };

        query("UPDATE messages SET answers = $2 WHERE id = $1")
            .bind(id.0)
            .bind(answers)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage_error(e.to_string()))?;

        Ok(outcome)
    }
}
