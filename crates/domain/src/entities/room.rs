//! 房间实体定义
//!
//! 两类房间（私聊 / 机器人问答）结构完全相同，仅生命周期独立。
//! 使用同一个 `Room` 实体加 `RoomKind` 标签建模，由存储层分表存放，
//! 避免两套近似重复的类型定义产生漂移。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 房间类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// 导师与学员之间的持久私聊房间
    Peer,
    /// 机器人问答房间（临时会话）
    ChatBot,
}

impl RoomKind {
    /// 错误信息中的展示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Peer => "私聊房间",
            Self::ChatBot => "机器人房间",
        }
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peer => write!(f, "peer"),
            Self::ChatBot => write!(f, "chat_bot"),
        }
    }
}

/// 不透明房间ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 规范化的无序昵称对
///
/// (a, b) 与 (b, a) 映射为同一个键，作为"同一对参与者至多一个房间"
/// 唯一性约束的依据。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub lo: String,
    pub hi: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                lo: a.to_string(),
                hi: b.to_string(),
            }
        } else {
            Self {
                lo: b.to_string(),
                hi: a.to_string(),
            }
        }
    }
}

/// 房间实体
///
/// 创建后除删除外不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// 不透明房间ID
    pub id: RoomId,
    /// 房间类别
    pub kind: RoomKind,
    /// 发起方昵称
    pub initiator_nickname: String,
    /// 接收方昵称
    pub recipient_nickname: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// 创建新房间
    pub fn new(
        id: RoomId,
        kind: RoomKind,
        initiator_nickname: impl Into<String>,
        recipient_nickname: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let initiator_nickname = initiator_nickname.into();
        let recipient_nickname = recipient_nickname.into();

        Self::validate_nickname("initiator_nickname", &initiator_nickname)?;
        Self::validate_nickname("recipient_nickname", &recipient_nickname)?;

        if initiator_nickname == recipient_nickname {
            return Err(DomainError::validation_error(
                "recipient_nickname",
                "发起方与接收方不能是同一用户",
            ));
        }

        if id.as_str().trim().is_empty() {
            return Err(DomainError::validation_error("room_id", "房间ID不能为空"));
        }

        Ok(Self {
            id,
            kind,
            initiator_nickname,
            recipient_nickname,
            created_at,
        })
    }

    /// 房间参与者的无序昵称对
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.initiator_nickname, &self.recipient_nickname)
    }

    /// 判断昵称是否为本房间参与者
    pub fn has_participant(&self, nickname: &str) -> bool {
        self.initiator_nickname == nickname || self.recipient_nickname == nickname
    }

    fn validate_nickname(field: &str, nickname: &str) -> DomainResult<()> {
        if nickname.trim().is_empty() {
            return Err(DomainError::validation_error(field, "昵称不能为空"));
        }
        Ok(())
    }
}
