use super::*;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Duration, sleep, timeout};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type ClientStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn recv_text(rx: &mut mpsc::Receiver<String>) -> String {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("broadcast receive timed out")
        .expect("broadcast channel closed unexpectedly")
}

async fn assert_no_text(rx: &mut mpsc::Receiver<String>) {
    assert!(timeout(Duration::from_millis(80), rx.recv()).await.is_err(), "expected no broadcast frame");
}

/// Serve the full router on an ephemeral port.
async fn spawn_server(state: AppState, static_dir: PathBuf) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");
    let app = crate::routes::app(state, &static_dir);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    addr
}

async fn connect(addr: SocketAddr) -> ClientStream {
    let (stream, _) = connect_async(format!("ws://{addr}/ws")).await.expect("ws connect should succeed");
    stream
}

async fn wait_for_clients(state: &AppState, count: usize) {
    timeout(Duration::from_secs(2), async {
        while state.client_count().await != count {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("hub never reached expected client count");
}

async fn next_text(stream: &mut ClientStream) -> String {
    let msg = timeout(Duration::from_secs(2), stream.next())
        .await
        .expect("ws receive timed out")
        .expect("ws stream ended")
        .expect("ws receive failed");
    msg.to_text().expect("text frame").to_owned()
}

async fn http_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("tcp connect");
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.expect("write request");
    let mut response = String::new();
    timeout(Duration::from_secs(2), stream.read_to_string(&mut response))
        .await
        .expect("http read timed out")
        .expect("http read failed");
    response
}

// =============================================================================
// process_inbound_text
// =============================================================================

#[tokio::test]
async fn valid_point_is_broadcast_to_all_clients() {
    let state = AppState::default();
    let sender = Uuid::new_v4();
    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, mut rx_b) = mpsc::channel(8);
    hub::register(&state, sender, tx_a).await;
    hub::register(&state, Uuid::new_v4(), tx_b).await;

    let report = process_inbound_text(&state, sender, r#"{"x":100,"y":50}"#).await.expect("valid point");

    assert_eq!(report.delivered, 2);
    for rx in [&mut rx_a, &mut rx_b] {
        let text = recv_text(rx).await;
        let point = frames::decode_point(&text).expect("broadcast decodes");
        assert_eq!(point, frames::PointEvent { x: 100.0, y: 50.0 });
    }
}

#[tokio::test]
async fn invalid_json_is_not_broadcast() {
    let state = AppState::default();
    let (tx, mut rx) = mpsc::channel(8);
    hub::register(&state, Uuid::new_v4(), tx).await;

    let err = process_inbound_text(&state, Uuid::new_v4(), "not json").await.expect_err("should reject");

    assert!(matches!(err, CodecError::InvalidJson(_)));
    assert_no_text(&mut rx).await;
}

#[tokio::test]
async fn extra_fields_are_not_broadcast() {
    let state = AppState::default();
    let (tx, mut rx) = mpsc::channel(8);
    hub::register(&state, Uuid::new_v4(), tx).await;

    assert!(process_inbound_text(&state, Uuid::new_v4(), r#"{"x":1,"y":1,"cmd":"rm"}"#).await.is_err());
    assert_no_text(&mut rx).await;
}

#[tokio::test]
async fn broadcast_uses_canonical_encoding() {
    let state = AppState::default();
    let (tx, mut rx) = mpsc::channel(8);
    hub::register(&state, Uuid::new_v4(), tx).await;

    process_inbound_text(&state, Uuid::new_v4(), "{ \"y\" : 2 , \"x\" : 1 }").await.expect("valid point");

    let expected = frames::encode_point(&frames::PointEvent { x: 1.0, y: 2.0 });
    assert_eq!(recv_text(&mut rx).await, expected);
}

// =============================================================================
// End to end
// =============================================================================

#[tokio::test]
async fn point_from_one_socket_reaches_every_socket() {
    let state = AppState::default();
    let addr = spawn_server(state.clone(), PathBuf::from("static")).await;

    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    wait_for_clients(&state, 2).await;

    a.send(WsMessage::text(r#"{"x":12,"y":34}"#)).await.expect("send");

    for stream in [&mut a, &mut b] {
        let point = frames::decode_point(&next_text(stream).await).expect("decodes");
        assert_eq!(point, frames::PointEvent { x: 12.0, y: 34.0 });
    }
}

#[tokio::test]
async fn malformed_frame_does_not_drop_the_connection() {
    let state = AppState::default();
    let addr = spawn_server(state.clone(), PathBuf::from("static")).await;

    let mut a = connect(addr).await;
    wait_for_clients(&state, 1).await;

    a.send(WsMessage::text("not json")).await.expect("send");
    a.send(WsMessage::text(r#"{"x":1,"y":2}"#)).await.expect("send");

    let point = frames::decode_point(&next_text(&mut a).await).expect("decodes");
    assert_eq!(point, frames::PointEvent { x: 1.0, y: 2.0 });
    assert_eq!(state.client_count().await, 1);
}

#[tokio::test]
async fn closing_a_socket_unregisters_it() {
    let state = AppState::default();
    let addr = spawn_server(state.clone(), PathBuf::from("static")).await;

    let mut a = connect(addr).await;
    wait_for_clients(&state, 1).await;

    a.close(None).await.expect("close");
    wait_for_clients(&state, 0).await;
}

#[tokio::test]
async fn healthz_returns_ok() {
    let addr = spawn_server(AppState::default(), PathBuf::from("static")).await;
    let response = http_get(addr, "/healthz").await;
    assert!(response.starts_with("HTTP/1.1 200"), "unexpected response: {response}");
}

#[tokio::test]
async fn static_directory_is_served_at_root() {
    let dir = std::env::temp_dir().join(format!("paint-static-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create static dir");
    std::fs::write(dir.join("index.html"), "<canvas></canvas>").expect("write index");

    let addr = spawn_server(AppState::default(), dir.clone()).await;
    let response = http_get(addr, "/").await;

    assert!(response.starts_with("HTTP/1.1 200"), "unexpected response: {response}");
    assert!(response.contains("<canvas></canvas>"));
    std::fs::remove_dir_all(&dir).expect("cleanup");
}
