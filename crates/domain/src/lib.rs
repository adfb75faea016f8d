//! 领域层
//!
//! 定义导师平台聊天子系统的核心实体、领域错误以及数据访问抽象接口。
//! 外层（application / infrastructure）依赖本层，本层不依赖任何外层。

pub mod entities;
pub mod errors;
pub mod repositories;

pub use entities::message::{
    AnswerSummary, ClickOutcome, Message, MessageId, MessageKind, MessagePayload, SenderType,
};
pub use entities::room::{PairKey, Room, RoomId, RoomKind};
pub use errors::{DomainError, DomainResult};
