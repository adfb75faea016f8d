//! 测试环境装配

use application::services::{
    ClickService, ClickServiceDependencies, HistoryService, HistoryServiceDependencies,
    MessageService, MessageServiceDependencies, RoomService, RoomServiceDependencies,
};
use application::stores::memory::{MemoryMessageRepository, MemoryRoomRepository};
use application::{RandomRoomIdGenerator, SystemClock};
use config::HistoryConfig;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// 初始化测试日志（幂等）
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// 内存存储上的完整服务装配
pub struct ChatTestEnvironment {
    pub rooms: Arc<MemoryRoomRepository>,
    pub messages: Arc<MemoryMessageRepository>,
    pub room_service: Arc<RoomService>,
    pub message_service: Arc<MessageService>,
    pub history_service: Arc<HistoryService>,
    pub click_service: Arc<ClickService>,
}

impl ChatTestEnvironment {
    pub fn new() -> Self {
        init_tracing();

        let rooms = Arc::new(MemoryRoomRepository::new());
        let messages = Arc::new(MemoryMessageRepository::new());
        let clock = Arc::new(SystemClock);
        let id_generator = Arc::new(RandomRoomIdGenerator);

        let room_service = Arc::new(RoomService::new(RoomServiceDependencies {
            room_repository: rooms.clone(),
            message_repository: messages.clone(),
            id_generator,
            clock: clock.clone(),
        }));
        let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
            room_repository: rooms.clone(),
            message_repository: messages.clone(),
            clock,
        }));
        let history_service = Arc::new(HistoryService::new(HistoryServiceDependencies {
            room_repository: rooms.clone(),
            message_repository: messages.clone(),
            config: HistoryConfig::default(),
        }));
        let click_service = Arc::new(ClickService::new(ClickServiceDependencies {
            message_repository: messages.clone(),
        }));

        Self {
            rooms,
            messages,
            room_service,
            message_service,
            history_service,
            click_service,
        }
    }
}

impl Default for ChatTestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
