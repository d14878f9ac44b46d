//! Common test utilities: a scripted graphql-transport-ws server.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{
    Request as HandshakeRequest, Response as HandshakeResponse,
};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

use betwatch_rs::{ClientConfig, ReconnectConfig};

/// A `subscribe` frame observed by the server
#[derive(Debug, Clone)]
pub struct SubscribeRecord {
    /// Index of the connection that carried it, in accept order
    pub conn: usize,
    pub id: String,
    pub query: String,
    pub variables: Value,
}

enum Outbound {
    Frame(Value),
    Kill,
}

struct ConnHandle {
    outbound: mpsc::UnboundedSender<Outbound>,
}

/// In-process graphql-transport-ws endpoint.
///
/// Acknowledges `connection_init`, answers protocol pings, records every
/// `subscribe` and `complete` frame, and lets tests push frames or kill a
/// connection outright.
pub struct MockServer {
    addr: SocketAddr,
    conns: Arc<Mutex<Vec<ConnHandle>>>,
    subscribes: Arc<Mutex<Vec<SubscribeRecord>>>,
    completes: Arc<Mutex<Vec<(usize, String)>>>,
    reject_handshake: Arc<AtomicBool>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = Self {
            addr,
            conns: Arc::new(Mutex::new(Vec::new())),
            subscribes: Arc::new(Mutex::new(Vec::new())),
            completes: Arc::new(Mutex::new(Vec::new())),
            reject_handshake: Arc::new(AtomicBool::new(false)),
        };

        let conns = server.conns.clone();
        let subscribes = server.subscribes.clone();
        let completes = server.completes.clone();
        let reject = server.reject_handshake.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let (outbound, inbox) = mpsc::unbounded_channel();
                let conn = {
                    let mut conns = conns.lock().unwrap();
                    conns.push(ConnHandle { outbound });
                    conns.len() - 1
                };
                tokio::spawn(handle_connection(
                    stream,
                    conn,
                    inbox,
                    subscribes.clone(),
                    completes.clone(),
                    reject.load(Ordering::SeqCst),
                ));
            }
        });

        server
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Drop every socket accepted from now on before the protocol handshake
    /// completes.
    pub fn reject_handshakes(&self) {
        self.reject_handshake.store(true, Ordering::SeqCst);
    }

    pub fn connection_count(&self) -> usize {
        self.conns.lock().unwrap().len()
    }

    pub fn subscribes(&self) -> Vec<SubscribeRecord> {
        self.subscribes.lock().unwrap().clone()
    }

    /// Wait until at least `count` subscribe frames have been observed
    pub async fn wait_for_subscribes(&self, count: usize) -> Vec<SubscribeRecord> {
        wait_until(|| {
            let subs = self.subscribes.lock().unwrap();
            (subs.len() >= count).then(|| subs.clone())
        })
        .await
        .unwrap_or_else(|| {
            panic!(
                "timed out waiting for {} subscribe frames (saw {})",
                count,
                self.subscribes.lock().unwrap().len()
            )
        })
    }

    /// Wait until at least `count` complete frames have been observed
    pub async fn wait_for_completes(&self, count: usize) -> Vec<(usize, String)> {
        wait_until(|| {
            let completes = self.completes.lock().unwrap();
            (completes.len() >= count).then(|| completes.clone())
        })
        .await
        .unwrap_or_else(|| panic!("timed out waiting for {} complete frames", count))
    }

    pub fn send_next(&self, conn: usize, id: &str, data: Value) {
        self.send_frame(
            conn,
            json!({ "type": "next", "id": id, "payload": { "data": data } }),
        );
    }

    pub fn send_error(&self, conn: usize, id: &str, message: &str) {
        self.send_frame(
            conn,
            json!({ "type": "error", "id": id, "payload": [{ "message": message }] }),
        );
    }

    pub fn send_complete(&self, conn: usize, id: &str) {
        self.send_frame(conn, json!({ "type": "complete", "id": id }));
    }

    pub fn send_frame(&self, conn: usize, frame: Value) {
        let conns = self.conns.lock().unwrap();
        conns[conn]
            .outbound
            .send(Outbound::Frame(frame))
            .expect("connection is gone");
    }

    /// Drop a connection's socket without a close frame
    pub fn kill(&self, conn: usize) {
        let conns = self.conns.lock().unwrap();
        let _ = conns[conn].outbound.send(Outbound::Kill);
    }
}

async fn handle_connection(
    stream: TcpStream,
    conn: usize,
    mut inbox: mpsc::UnboundedReceiver<Outbound>,
    subscribes: Arc<Mutex<Vec<SubscribeRecord>>>,
    completes: Arc<Mutex<Vec<(usize, String)>>>,
    reject: bool,
) {
    // Echo the negotiated graphql-transport-ws subprotocol, as a real
    // server must — tungstenite clients that request one reject a
    // handshake response that omits it.
    let add_subprotocol = |_req: &HandshakeRequest, mut response: HandshakeResponse| {
        response.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_static("graphql-transport-ws"),
        );
        Ok(response)
    };
    let ws = match tokio_tungstenite::accept_hdr_async(stream, add_subprotocol).await {
        Ok(ws) => ws,
        Err(_) => return,
    };
    if reject {
        // The socket vanishes before connection_ack
        drop(ws);
        return;
    }

    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            message = read.next() => {
                let Some(Ok(message)) = message else { break };
                let Message::Text(text) = message else { continue };
                let Ok(frame) = serde_json::from_str::<Value>(&text) else { continue };
                match frame["type"].as_str() {
                    Some("connection_init") => {
                        let ack = json!({ "type": "connection_ack" }).to_string();
                        if write.send(Message::Text(ack)).await.is_err() {
                            break;
                        }
                    }
                    Some("subscribe") => {
                        subscribes.lock().unwrap().push(SubscribeRecord {
                            conn,
                            id: frame["id"].as_str().unwrap_or_default().to_string(),
                            query: frame["payload"]["query"].as_str().unwrap_or_default().to_string(),
                            variables: frame["payload"]["variables"].clone(),
                        });
                    }
                    Some("complete") => {
                        completes
                            .lock()
                            .unwrap()
                            .push((conn, frame["id"].as_str().unwrap_or_default().to_string()));
                    }
                    Some("ping") => {
                        let pong = json!({ "type": "pong" }).to_string();
                        if write.send(Message::Text(pong)).await.is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            command = inbox.recv() => match command {
                Some(Outbound::Frame(frame)) => {
                    if write.send(Message::Text(frame.to_string())).await.is_err() {
                        break;
                    }
                }
                Some(Outbound::Kill) | None => break,
            }
        }
    }
}

async fn wait_until<T>(mut probe: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(value) = probe() {
            return Some(value);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Client configuration tuned for fast tests: short timeouts, near-instant
/// deterministic reconnects.
pub fn test_config(url: &str) -> ClientConfig {
    let mut config = ClientConfig::with_url("test-api-key", url);
    config.connect_timeout = Duration::from_secs(2);
    config.handshake_timeout = Duration::from_secs(2);
    config.request_timeout = Duration::from_secs(5);
    config.reconnect = ReconnectConfig {
        initial_delay: Duration::from_millis(20),
        max_delay: Duration::from_millis(100),
        multiplier: 2.0,
        jitter: 0.0,
        max_attempts: None,
    };
    config
}
