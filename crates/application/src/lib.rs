//! 应用层
//!
//! 编排领域实体与 Repository，向外提供聊天子系统的五个逻辑操作：
//! 取得或创建房间、删除房间、发送消息、查询有序历史、应用点击。

pub mod clock;
pub mod errors;
pub mod room_id;
pub mod services;
pub mod stores;

pub use clock::{Clock, SystemClock};
pub use errors::{ApplicationError, ApplicationResult};
pub use room_id::{RandomRoomIdGenerator, RoomIdGenerator};
pub use services::click_service::{ClickRequest, ClickResult, ClickService};
pub use services::history_service::{HistoryEntry, HistoryPage, HistoryQuery, HistoryService};
pub use services::message_service::{MessageService, SendListRequest, SendTextRequest};
pub use services::room_service::{DeleteRoomRequest, RoomService};
