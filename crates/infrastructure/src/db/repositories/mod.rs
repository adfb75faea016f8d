//! PostgreSQL Repository 实现

pub mod message_repository_impl;
pub mod room_repository_impl;

pub use message_repository_impl::PostgresMessageRepository;
pub use room_repository_impl::PostgresRoomRepository;
