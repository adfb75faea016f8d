pub mod click_service;
pub mod history_service;
pub mod message_service;
pub mod room_service;

pub use click_service::{ClickRequest, ClickResult, ClickService, ClickServiceDependencies};
pub use history_service::{
    HistoryEntry, HistoryPage, HistoryQuery, HistoryService, HistoryServiceDependencies,
};
pub use message_service::{
    MessageService, MessageServiceDependencies, SendListRequest, SendTextRequest,
};
pub use room_service::{DeleteRoomRequest, RoomService, RoomServiceDependencies};
