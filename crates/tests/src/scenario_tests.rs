//! 端到端场景测试
//!
//! 按完整调用链验证：取得或创建房间 → 发送消息 → 查询有序历史 →
//! 点击计数 → 级联删除。

use application::services::DeleteRoomRequest;
use application::{ClickRequest, HistoryQuery, SendListRequest, SendTextRequest};
use domain::{AnswerSummary, MessageId, MessageKind, RoomKind, SenderType};
use tests::ChatTestEnvironment;

fn text(env_room: &domain::RoomId, nickname: &str, body: &str) -> SendTextRequest {
    SendTextRequest {
        kind: RoomKind::Peer,
        room_id: env_room.clone(),
        sender_type: SenderType::Mentee,
        sender_nickname: nickname.to_string(),
        body: body.to_string(),
    }
}

#[tokio::test]
async fn test_full_peer_chat_flow() {
    let env = ChatTestEnvironment::new();

    // alice 与 bob 首次接触
    let room = env
        .room_service
        .get_or_create_room(RoomKind::Peer, "alice", "bob")
        .await
        .unwrap();

    // 同一秒内双方各发一条
    env.message_service
        .send_text(text(&room.id, "alice", "hello"))
        .await
        .unwrap();
    env.message_service
        .send_text(text(&room.id, "bob", "hi"))
        .await
        .unwrap();

    let page = env
        .history_service
        .get_history(HistoryQuery {
            kind: RoomKind::Peer,
            room_id: room.id.clone(),
            page: 0,
            size: 10,
        })
        .await
        .unwrap();

    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].order, 0);
    assert_eq!(page.entries[1].order, 1);
    // 同秒消息按插入顺序：alice 在前
    assert_eq!(page.entries[0].message.sender_nickname, "alice");
    assert_eq!(page.entries[1].message.sender_nickname, "bob");
}

#[tokio::test]
async fn test_welcome_list_and_clicks_in_chatbot_room() {
    let env = ChatTestEnvironment::new();

    let room = env
        .room_service
        .get_or_create_room(RoomKind::ChatBot, "alice", "mentor-bot")
        .await
        .unwrap();

    let welcome_id = MessageId::generate();
    let send = SendListRequest {
        kind: RoomKind::ChatBot,
        room_id: room.id.clone(),
        message_id: welcome_id,
        sender_type: SenderType::Bot,
        sender_nickname: "mentor-bot".to_string(),
        answers: vec![
            AnswerSummary::new("q-1", "如何选导师？", "先看方向匹配……").unwrap(),
            AnswerSummary::new("q-2", "如何提问？", "带上下文……").unwrap(),
        ],
    };

    // 欢迎消息幂等创建
    let first = env.message_service.send_list(send.clone()).await.unwrap();
    let second = env.message_service.send_list(send).await.unwrap();
    assert_eq!(first, second);

    let page = env
        .history_service
        .get_history(HistoryQuery {
            kind: RoomKind::ChatBot,
            room_id: room.id.clone(),
            page: 0,
            size: 10,
        })
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);

    // 三次同向点击：views 3 次、likes 只一次
    let mut result = None;
    for _ in 0..3 {
        result = Some(
            env.click_service
                .apply_click(ClickRequest {
                    message_id: welcome_id,
                    kind: MessageKind::List,
                    question_id: "q-1".to_string(),
                    like_status: true,
                })
                .await
                .unwrap(),
        );
    }
    let result = result.unwrap();
    assert_eq!(result.views, 3);
    assert_eq!(result.likes, 1);
}

#[tokio::test]
async fn test_history_is_stable_across_repeated_queries() {
    let env = ChatTestEnvironment::new();
    let room = env
        .room_service
        .get_or_create_room(RoomKind::Peer, "alice", "bob")
        .await
        .unwrap();

    for i in 0..12 {
        env.message_service
            .send_text(text(&room.id, "alice", &format!("m{i}")))
            .await
            .unwrap();
    }

    let query = HistoryQuery {
        kind: RoomKind::Peer,
        room_id: room.id.clone(),
        page: 1,
        size: 5,
    };
    let first = env.history_service.get_history(query.clone()).await.unwrap();
    let second = env.history_service.get_history(query).await.unwrap();

    let ids =
        |p: &application::HistoryPage| p.entries.iter().map(|e| e.message.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(
        first.entries.iter().map(|e| e.order).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
}

#[tokio::test]
async fn test_room_deletion_cascades() {
    let env = ChatTestEnvironment::new();
    let room = env
        .room_service
        .get_or_create_room(RoomKind::Peer, "alice", "bob")
        .await
        .unwrap();
    env.message_service
        .send_text(text(&room.id, "alice", "hello"))
        .await
        .unwrap();

    env.room_service
        .delete_room(DeleteRoomRequest {
            kind: RoomKind::Peer,
            initiator_nickname: "alice".to_string(),
            recipient_nickname: "bob".to_string(),
            room_id: room.id.clone(),
        })
        .await
        .unwrap();

    // 房间与历史都不可见
    assert!(env
        .room_service
        .find_room(RoomKind::Peer, &room.id)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(env
        .history_service
        .get_history(HistoryQuery {
            kind: RoomKind::Peer,
            room_id: room.id.clone(),
            page: 0,
            size: 10,
        })
        .await
        .unwrap_err()
        .is_not_found());

    // 同一对昵称可重新开始
    let fresh = env
        .room_service
        .get_or_create_room(RoomKind::Peer, "bob", "alice")
        .await
        .unwrap();
    assert_ne!(fresh.id, room.id);
}

#[tokio::test]
async fn test_peer_and_chatbot_not_found_are_distinguishable() {
    let env = ChatTestEnvironment::new();
    let room = env
        .room_service
        .get_or_create_room(RoomKind::Peer, "alice", "bob")
        .await
        .unwrap();

    // 同一个 ID 在机器人分区中查不到，且错误文案标明分区
    let err = env
        .room_service
        .find_room(RoomKind::ChatBot, &room.id)
        .await
        .unwrap_err();
    let peer_err = env
        .room_service
        .find_room(RoomKind::Peer, &domain::RoomId::new("missing"))
        .await
        .unwrap_err();
    assert_ne!(err.to_string(), peer_err.to_string());
    assert!(err.to_string().contains(RoomKind::ChatBot.display_name()));
    assert!(peer_err.to_string().contains(RoomKind::Peer.display_name()));
}
