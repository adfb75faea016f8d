//! 领域模型错误定义
//!
//! 定义聊天子系统中所有可能的错误类型，提供清晰的错误上下文。
//! 两类房间（私聊 / 机器人）的"房间不存在"错误必须可区分。

use crate::entities::room::RoomKind;
use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 验证错误
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// 房间不存在（区分私聊房间与机器人房间）
    #[error("{} 不存在: {room_id}", kind.display_name())]
    RoomNotFound { kind: RoomKind, room_id: String },

    /// 消息不存在
    #[error("消息不存在: {message_id}")]
    MessageNotFound { message_id: String },

    /// 消息中的子回答不存在
    #[error("消息 {message_id} 中不存在子回答: {question_id}")]
    AnswerNotFound {
        message_id: String,
        question_id: String,
    },

    /// 资源冲突（重复创建）
    #[error("资源冲突: {resource_type} {identifier}")]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    /// 存储层错误
    #[error("存储错误: {message}")]
    StorageError { message: String },

    /// 数据不一致（可恢复，等待后台清理）
    #[error("数据不一致: {message}")]
    Inconsistent { message: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建房间不存在错误
    pub fn room_not_found(kind: RoomKind, room_id: impl Into<String>) -> Self {
        Self::RoomNotFound {
            kind,
            room_id: room_id.into(),
        }
    }

    /// 创建消息不存在错误
    pub fn message_not_found(message_id: impl Into<String>) -> Self {
        Self::MessageNotFound {
            message_id: message_id.into(),
        }
    }

    /// 创建子回答不存在错误
    pub fn answer_not_found(
        message_id: impl Into<String>,
        question_id: impl Into<String>,
    ) -> Self {
        Self::AnswerNotFound {
            message_id: message_id.into(),
            question_id: question_id.into(),
        }
    }

    /// 创建资源冲突错误
    pub fn conflict(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// 创建存储层错误
    pub fn storage_error(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    /// 创建数据不一致错误
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::Inconsistent {
            message: message.into(),
        }
    }

    /// 是否为"未找到"类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RoomNotFound { .. } | Self::MessageNotFound { .. } | Self::AnswerNotFound { .. }
        )
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;
