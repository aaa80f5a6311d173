//! End-to-end tests for the WebSocket live channel over a real listener.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use strictly_rooms::GameService;
use strictly_rooms::api::{AppState, router};
use strictly_tictactoe::{Participant, RoomId};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn serve(service: GameService) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");
    let app = router(AppState::new(service, 8));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    addr
}

/// Registers alice and bob, seats both, and returns alice's token.
fn seated(service: &GameService) -> (String, Participant, RoomId) {
    let alice = service.register("alice").expect("Register failed");
    let bob = service.register("bob").expect("Register failed").participant().clone();
    let room = service.create_room(alice.participant());
    service.join_room(room.id(), &bob).expect("Join failed");
    (alice.access_token().clone(), bob, room.id().clone())
}

async fn until(mut condition: impl FnMut() -> bool) {
    timeout(WAIT, async {
        while !condition() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Condition never held");
}

async fn next_json(ws: &mut WsStream) -> Value {
    loop {
        let frame = timeout(WAIT, ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Stream ended")
            .expect("Read failed");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
        }
    }
}

async fn send_move(ws: &mut WsStream, row: i64, col: i64, participant: &str) {
    let frame = json!({ "action": "move", "row": row, "col": col, "participant": participant });
    ws.send(Message::text(frame.to_string()))
        .await
        .expect("Send failed");
}

async fn rejected_status(url: String) -> u16 {
    match connect_async(url).await {
        Err(WsError::Http(response)) => response.status().as_u16(),
        Err(other) => panic!("Unexpected handshake error: {other}"),
        Ok(_) => panic!("Handshake should have been refused"),
    }
}

#[tokio::test]
async fn test_unknown_room_refused_before_upgrade() {
    let addr = serve(GameService::default()).await;
    assert_eq!(rejected_status(format!("ws://{addr}/ws/game/nope")).await, 404);
}

#[tokio::test]
async fn test_bogus_token_refused_before_upgrade() {
    let service = GameService::default();
    let (_token, _bob, room_id) = seated(&service);
    let addr = serve(service.clone()).await;
    assert_eq!(
        rejected_status(format!("ws://{addr}/ws/game/{room_id}?token=bogus")).await,
        401
    );
    assert_eq!(service.subscriber_count(&room_id), 0);
}

#[tokio::test]
async fn test_player_moves_and_disconnect_unsubscribes() {
    let service = GameService::default();
    let (token, _bob, room_id) = seated(&service);
    let addr = serve(service.clone()).await;

    let (mut ws, _response) = connect_async(format!("ws://{addr}/ws/game/{room_id}?token={token}"))
        .await
        .expect("Connect failed");
    until(|| service.subscriber_count(&room_id) == 1).await;

    send_move(&mut ws, 1, 1, "alice").await;
    let update = next_json(&mut ws).await;
    assert_eq!(update["type"], "state");
    assert_eq!(update["state"]["version"], 2);
    assert_eq!(update["state"]["board"][1][1], "X");

    // alice again: out of turn, answered privately
    send_move(&mut ws, 0, 0, "alice").await;
    let reply = next_json(&mut ws).await;
    assert_eq!(reply, json!({ "type": "error", "message": "Not your turn" }));

    ws.close(None).await.expect("Close failed");
    until(|| service.subscriber_count(&room_id) == 0).await;
}

#[tokio::test]
async fn test_observer_receives_broadcasts_but_cannot_move() {
    let service = GameService::default();
    let (token, _bob, room_id) = seated(&service);
    let alice = service.authenticate(&token).expect("Token rejected");
    let addr = serve(service.clone()).await;

    let (mut ws, _response) = connect_async(format!("ws://{addr}/ws/game/{room_id}"))
        .await
        .expect("Connect failed");
    until(|| service.subscriber_count(&room_id) == 1).await;

    service.make_move(&room_id, &alice, 0, 0).expect("Move failed");
    let update = next_json(&mut ws).await;
    assert_eq!(update["state"]["board"][0][0], "X");

    send_move(&mut ws, 2, 2, "bob").await;
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["message"], "Authentication required to move");
    assert_eq!(service.get_room(&room_id).expect("Get failed").moves().len(), 1);
}
