//! 不透明房间ID生成器

use domain::RoomId;
use rand::RngCore;

/// 房间ID生成器抽象
pub trait RoomIdGenerator: Send + Sync {
    fn generate(&self) -> RoomId;
}

/// 基于随机字节的房间ID生成器
///
/// 20 字节随机数的 BASE32 编码，抗碰撞且对外不暴露任何结构。
#[derive(Debug, Default)]
pub struct RandomRoomIdGenerator;

impl RoomIdGenerator for RandomRoomIdGenerator {
    fn generate(&self) -> RoomId {
        let mut bytes = [0u8; 20];
        rand::rng().fill_bytes(&mut bytes);
        RoomId::new(data_encoding::BASE32_NOPAD.encode(&bytes).to_lowercase())
    }
}
