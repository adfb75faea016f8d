//! 消息实体定义
//!
//! 消息载荷为带判别标签的联合类型：普通文本（TEXT）或结构化子回答
//! 列表（LIST），避免"两个字段只有一个有意义"的歧义。
//! 时间戳在创建时截断到整秒；同秒消息由存储层按插入顺序决定先后。

use crate::entities::room::RoomId;
use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 发送者类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SenderType {
    /// 导师
    Mentor,
    /// 学员
    Mentee,
    /// 机器人
    Bot,
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mentor => write!(f, "mentor"),
            Self::Mentee => write!(f, "mentee"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// 消息载荷判别标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// 纯文本消息
    Text,
    /// 子回答列表消息（如历史问答推荐）
    List,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::List => write!(f, "list"),
        }
    }
}

/// 消息ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for MessageId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// LIST 消息中的结构化子回答
///
/// `views` / `likes` 是点击计数器；`liked` 记录当前点赞状态，
/// 用于点赞切换的幂等判断。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSummary {
    /// 子回答（问题）ID
    pub question_id: String,
    /// 问题摘要
    pub question: String,
    /// 回答摘要
    pub answer: String,
    /// 浏览计数
    pub views: u64,
    /// 点赞计数
    pub likes: u64,
    /// 当前记录的点赞状态
    pub liked: bool,
}

impl AnswerSummary {
    pub fn new(
        question_id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> DomainResult<Self> {
        let question_id = question_id.into();
        if question_id.trim().is_empty() {
            return Err(DomainError::validation_error(
                "question_id",
                "子回答ID不能为空",
            ));
        }
        Ok(Self {
            question_id,
            question: question.into(),
            answer: answer.into(),
            views: 0,
            likes: 0,
            liked: false,
        })
    }
}

/// 消息载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum MessagePayload {
    /// 文本正文
    Text(String),
    /// 子回答列表
    List(Vec<AnswerSummary>),
}

impl MessagePayload {
    /// 载荷对应的判别标签
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text(_) => MessageKind::Text,
            Self::List(_) => MessageKind::List,
        }
    }
}

/// 一次点击后的计数器快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOutcome {
    pub views: u64,
    pub likes: u64,
}

/// 消息实体
///
/// 入库后不可变，仅 LIST 载荷中的计数器字段可经计数器变更路径更新。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// 消息唯一ID
    pub id: MessageId,
    /// 所属房间ID（应用层负责引用完整性，存储层不校验）
    pub room_id: RoomId,
    /// 发送者类别
    pub sender_type: SenderType,
    /// 发送者昵称
    pub sender_nickname: String,
    /// 消息载荷
    pub payload: MessagePayload,
    /// 发送时间（整秒精度）
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// 创建文本消息
    pub fn new_text(
        room_id: RoomId,
        sender_type: SenderType,
        sender_nickname: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(DomainError::validation_error("message", "消息正文不能为空"));
        }
        Self::with_id(
            MessageId::generate(),
            room_id,
            sender_type,
            sender_nickname,
            MessagePayload::Text(body),
            created_at,
        )
    }

    /// 创建子回答列表消息
    ///
    /// 消息ID由调用方提供，配合"查重后插入"实现幂等创建。
    pub fn new_list(
        id: MessageId,
        room_id: RoomId,
        sender_type: SenderType,
        sender_nickname: impl Into<String>,
        answers: Vec<AnswerSummary>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if answers.is_empty() {
            return Err(DomainError::validation_error(
                "message_list",
                "子回答列表不能为空",
            ));
        }
        Self::with_id(
            id,
            room_id,
            sender_type,
            sender_nickname,
            MessagePayload::List(answers),
            created_at,
        )
    }

    /// 创建具有指定ID的消息（用于从存储层加载）
    pub fn with_id(
        id: MessageId,
        room_id: RoomId,
        sender_type: SenderType,
        sender_nickname: impl Into<String>,
        payload: MessagePayload,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let sender_nickname = sender_nickname.into();
        if sender_nickname.trim().is_empty() {
            return Err(DomainError::validation_error(
                "sender_nickname",
                "发送者昵称不能为空",
            ));
        }

        Ok(Self {
            id,
            room_id,
            sender_type,
            sender_nickname,
            payload,
            created_at: truncate_to_second(created_at),
        })
    }

    /// 消息载荷类别
    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// 对 LIST 消息中的某个子回答应用一次点击
    ///
    /// 浏览计数每次调用无条件 +1；点赞计数仅在期望状态与当前记录
    /// 状态不同时变更（false→true 加一，true→false 减一）。
    /// 浏览与点赞的不对称是既定产品行为，不是缺陷。
    pub fn apply_click(
        &mut self,
        question_id: &str,
        like_status: bool,
    ) -> DomainResult<ClickOutcome> {
        let message_id = self.id.to_string();
        let answers = match &mut self.payload {
            MessagePayload::List(answers) => answers,
            MessagePayload::Text(_) => {
                return Err(DomainError::answer_not_found(message_id, question_id));
            }
        };

        let answer = answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
            .ok_or_else(|| DomainError::answer_not_found(message_id, question_id))?;

        answer.views += 1;
        if like_status != answer.liked {
            if like_status {
                answer.likes += 1;
            } else {
                answer.likes = answer.likes.saturating_sub(1);
            }
            answer.liked = like_status;
        }

        Ok(ClickOutcome {
            views: answer.views,
            likes: answer.likes,
        })
    }
}

/// 截断到整秒，保证同秒写入可由插入顺序决定先后
fn truncate_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(ts.timestamp(), 0).single().unwrap_or(ts)
}
