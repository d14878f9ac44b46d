//! The live socket: dial, frame in, frame out.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::{Error, Result};
use crate::websocket::protocol::{ClientMessage, ServerMessage, SUBPROTOCOL};

/// One underlying socket speaking graphql-transport-ws framing.
///
/// The transport only knows how to move frames and detect death; it never
/// retries. Retry policy lives in the connection supervisor.
pub(crate) struct Transport {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Transport {
    /// Dial `url` within `timeout`, announcing the sub-protocol.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let mut request = url
            .into_client_request()
            .map_err(|e| Error::Config(format!("invalid endpoint url: {}", e)))?;
        request.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_static(SUBPROTOCOL),
        );

        let (socket, _) = tokio::time::timeout(timeout, connect_async(request))
            .await
            .map_err(|_| Error::Timeout("connect"))??;

        Ok(Self { socket })
    }

    pub async fn send(&mut self, message: &ClientMessage) -> Result<()> {
        let text = message.encode()?;
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(Error::from)
    }

    /// Next protocol frame. `None` means the socket is gone. A malformed
    /// text frame surfaces as [`Error::Protocol`] without consuming the
    /// socket; the caller decides whether to keep reading.
    pub async fn next(&mut self) -> Option<Result<ServerMessage>> {
        loop {
            return match self.socket.next().await? {
                Ok(Message::Text(text)) => Some(ServerMessage::decode(&text)),
                Ok(Message::Close(_)) => Some(Err(Error::Transport(
                    "connection closed by server".to_string(),
                ))),
                // Websocket-level ping/pong is answered by tungstenite
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Ok(Message::Binary(_)) => Some(Err(Error::Protocol(
                    "unexpected binary frame".to_string(),
                ))),
                Ok(Message::Frame(_)) => continue,
                Err(e) => Some(Err(Error::Transport(e.to_string()))),
            };
        }
    }

    pub async fn close(&mut self) {
        let _ = self.socket.close(None).await;
    }
}
