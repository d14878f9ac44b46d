//! The connection supervisor: one task that owns the transport, multiplexes
//! every in-flight operation over it, and replays live subscriptions after a
//! reconnect.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::config::{ClientConfig, ReconnectConfig};
use crate::error::{Error, Result};
use crate::websocket::protocol::{ClientMessage, ExecutionResult, GraphqlRequest, ServerMessage};
use crate::websocket::subscription::Subscription;
use crate::websocket::transport::Transport;

/// Commands the supervisor can buffer while between transports
const COMMAND_BUFFER: usize = 64;

pub(crate) enum Command {
    Execute {
        id: String,
        request: GraphqlRequest,
        reply: oneshot::Sender<Result<Value>>,
    },
    Subscribe {
        id: String,
        request: GraphqlRequest,
        sink: mpsc::Sender<Result<Value>>,
    },
    Stop {
        id: String,
    },
    Close,
}

/// Handle to a single multiplexed graphql-transport-ws session.
///
/// Cloning is cheap; every clone talks to the same supervisor task. The
/// socket is not dialled until the first operation arrives.
#[derive(Clone)]
pub struct Connection {
    commands: mpsc::Sender<Command>,
    ids: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
    request_timeout: Duration,
    buffer_size: usize,
}

impl Connection {
    /// Spawn the supervisor task for `config`.
    pub fn open(config: ClientConfig) -> Self {
        let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
        let handle = Self {
            commands,
            ids: Arc::new(AtomicU64::new(1)),
            closed: Arc::new(AtomicBool::new(false)),
            request_timeout: config.request_timeout,
            buffer_size: config.buffer_size.max(1),
        };
        tokio::spawn(Supervisor::new(config).run(inbox));
        handle
    }

    /// Fresh operation id, unique for the lifetime of this connection.
    fn next_id(&self) -> String {
        self.ids.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// The error to report when the supervisor is no longer reachable.
    fn gone(&self) -> Error {
        if self.closed.load(Ordering::Acquire) {
            Error::Cancelled
        } else {
            Error::ConnectionLost
        }
    }

    /// Run a single-result operation (query or mutation) and wait for the
    /// `data` object, bounded by the configured request timeout.
    pub async fn execute(&self, request: GraphqlRequest) -> Result<Value> {
        let id = self.next_id();
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Execute {
                id: id.clone(),
                request,
                reply,
            })
            .await
            .map_err(|_| self.gone())?;

        match tokio::time::timeout(self.request_timeout, response).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(self.gone()),
            Err(_) => {
                // Stalled call: free the registry entry. Any late frame for
                // this id is then dropped by the unknown-id rule.
                let _ = self.commands.try_send(Command::Stop { id });
                Err(Error::Timeout("request"))
            }
        }
    }

    /// Register a server-push stream for `request`. Results are decoded
    /// into `T` at the receiving end, descending into `root` first when
    /// given.
    pub async fn subscribe<T>(
        &self,
        request: GraphqlRequest,
        root: Option<&str>,
    ) -> Result<Subscription<T>> {
        let id = self.next_id();
        let (sink, items) = mpsc::channel(self.buffer_size);
        self.commands
            .send(Command::Subscribe {
                id: id.clone(),
                request,
                sink,
            })
            .await
            .map_err(|_| self.gone())?;

        Ok(Subscription::new(
            id,
            items,
            self.commands.clone(),
            root.map(str::to_string),
        ))
    }

    /// Shut the session down. Pending calls resolve with
    /// [`Error::Cancelled`] and open streams end with a final `Cancelled`
    /// item.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let _ = self.commands.send(Command::Close).await;
    }
}

/// A registered query or mutation awaiting its single result
struct PendingCall {
    request: GraphqlRequest,
    reply: oneshot::Sender<Result<Value>>,
    /// Whether the start frame reached the current transport
    started: bool,
    /// Whether the call already consumed its one automatic replay
    retried: bool,
}

/// A registered subscription and its delivery queue
struct OpenStream {
    request: GraphqlRequest,
    sink: mpsc::Sender<Result<Value>>,
}

enum SessionEnd {
    Closed,
    Lost(Error),
}

struct Supervisor {
    config: ClientConfig,
    calls: HashMap<String, PendingCall>,
    streams: HashMap<String, OpenStream>,
}

impl Supervisor {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            calls: HashMap::new(),
            streams: HashMap::new(),
        }
    }

    async fn run(mut self, mut inbox: mpsc::Receiver<Command>) {
        // Disconnected until the first operation arrives
        match inbox.recv().await {
            None | Some(Command::Close) => return,
            Some(command) => self.register_offline(command),
        }

        let mut backoff = Backoff::new(self.config.reconnect.clone());
        let mut attempts: u32 = 0;

        loop {
            let mut transport = match self.establish().await {
                Ok(transport) => transport,
                Err(e) => {
                    attempts += 1;
                    if let Some(max) = self.config.reconnect.max_attempts {
                        if attempts >= max {
                            warn!(attempts, error = %e, "giving up on reconnection");
                            self.finish(&mut inbox, || Error::ConnectionLost);
                            return;
                        }
                    }
                    let delay = backoff.next_delay();
                    warn!(error = %e, attempt = attempts, ?delay, "connect failed, backing off");
                    if !self.wait_backoff(&mut inbox, delay).await {
                        self.finish(&mut inbox, || Error::Cancelled);
                        return;
                    }
                    continue;
                }
            };

            attempts = 0;
            backoff.reset();

            let lost = match self.replay(&mut transport).await {
                Ok(()) => match self.serve(&mut inbox, &mut transport).await {
                    SessionEnd::Closed => {
                        transport.close().await;
                        self.finish(&mut inbox, || Error::Cancelled);
                        return;
                    }
                    SessionEnd::Lost(e) => e,
                },
                Err(e) => e,
            };

            warn!(error = %lost, "transport lost, reconnecting");
            self.on_transport_lost();
            let delay = backoff.next_delay();
            if !self.wait_backoff(&mut inbox, delay).await {
                self.finish(&mut inbox, || Error::Cancelled);
                return;
            }
        }
    }

    /// Dial and complete the protocol handshake.
    async fn establish(&mut self) -> Result<Transport> {
        debug!(url = %self.config.url, "connecting");
        let mut transport = Transport::connect(&self.config.url, self.config.connect_timeout).await?;

        let init = ClientMessage::ConnectionInit {
            payload: Some(json!({ "apiKey": self.config.api_key })),
        };
        transport.send(&init).await?;

        let handshake = async {
            loop {
                match transport.next().await {
                    None => {
                        return Err(Error::Transport(
                            "connection closed during handshake".to_string(),
                        ))
                    }
                    Some(Err(Error::Protocol(detail))) => {
                        warn!(%detail, "dropping malformed frame during handshake");
                    }
                    Some(Err(e)) => return Err(e),
                    Some(Ok(ServerMessage::ConnectionAck { .. })) => return Ok(()),
                    Some(Ok(ServerMessage::Ping { payload })) => {
                        transport.send(&ClientMessage::Pong { payload }).await?;
                    }
                    Some(Ok(ServerMessage::ConnectionError { payload })) => {
                        return Err(Error::Transport(format!(
                            "server rejected the session: {}",
                            payload.unwrap_or(Value::Null)
                        )))
                    }
                    Some(Ok(other)) => {
                        trace!(?other, "frame before connection_ack dropped");
                    }
                }
            }
        };
        tokio::time::timeout(self.config.handshake_timeout, handshake)
            .await
            .map_err(|_| Error::Timeout("handshake"))??;

        info!("session ready");
        Ok(transport)
    }

    /// Re-send every registered operation on a fresh transport.
    ///
    /// Subscriptions restart from "now" (at-most-once, no replay of missed
    /// updates). A call that was in flight when the old transport died
    /// consumes its single automatic retry here.
    async fn replay(&mut self, transport: &mut Transport) -> Result<()> {
        for (id, stream) in &self.streams {
            let frame = ClientMessage::Subscribe {
                id: id.clone(),
                payload: stream.request.clone(),
            };
            transport.send(&frame).await?;
        }
        if !self.streams.is_empty() {
            info!(count = self.streams.len(), "resubscribed active streams");
        }
        for (id, call) in &mut self.calls {
            let frame = ClientMessage::Subscribe {
                id: id.clone(),
                payload: call.request.clone(),
            };
            transport.send(&frame).await?;
            call.started = true;
        }
        Ok(())
    }

    /// Serve one live transport until it fails or the client closes.
    async fn serve(
        &mut self,
        inbox: &mut mpsc::Receiver<Command>,
        transport: &mut Transport,
    ) -> SessionEnd {
        let mut ping = tokio::time::interval(self.config.ping_interval);
        ping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately
        ping.tick().await;

        let mut last_seen = Instant::now();

        loop {
            let idle_deadline =
                last_seen + self.config.ping_interval * self.config.keepalive_grace;

            tokio::select! {
                command = inbox.recv() => match command {
                    None | Some(Command::Close) => return SessionEnd::Closed,
                    Some(Command::Execute { id, request, reply }) => {
                        let frame = ClientMessage::Subscribe {
                            id: id.clone(),
                            payload: request.clone(),
                        };
                        let sent = transport.send(&frame).await;
                        self.calls.insert(id, PendingCall {
                            request,
                            reply,
                            started: sent.is_ok(),
                            retried: false,
                        });
                        if let Err(e) = sent {
                            return SessionEnd::Lost(e);
                        }
                    }
                    Some(Command::Subscribe { id, request, sink }) => {
                        let frame = ClientMessage::Subscribe {
                            id: id.clone(),
                            payload: request.clone(),
                        };
                        self.streams.insert(id, OpenStream { request, sink });
                        if let Err(e) = transport.send(&frame).await {
                            return SessionEnd::Lost(e);
                        }
                    }
                    Some(Command::Stop { id }) => {
                        // Idempotent: a second stop for the same id is a no-op
                        if self.calls.remove(&id).is_some() || self.streams.remove(&id).is_some() {
                            if let Err(e) = transport.send(&ClientMessage::Complete { id }).await {
                                return SessionEnd::Lost(e);
                            }
                        }
                    }
                },
                frame = transport.next() => match frame {
                    None => return SessionEnd::Lost(Error::Transport("connection closed".to_string())),
                    Some(Err(e)) => match e {
                        Error::Protocol(detail) => {
                            warn!(%detail, "dropping malformed frame");
                        }
                        other => return SessionEnd::Lost(other),
                    },
                    Some(Ok(message)) => {
                        last_seen = Instant::now();
                        if let Err(e) = self.dispatch(message, transport).await {
                            return SessionEnd::Lost(e);
                        }
                    }
                },
                _ = ping.tick() => {
                    if let Err(e) = transport.send(&ClientMessage::Ping { payload: None }).await {
                        return SessionEnd::Lost(e);
                    }
                }
                _ = tokio::time::sleep_until(idle_deadline) => {
                    return SessionEnd::Lost(Error::Timeout("keepalive"));
                }
            }
        }
    }

    /// Route one inbound frame to its operation.
    async fn dispatch(&mut self, message: ServerMessage, transport: &mut Transport) -> Result<()> {
        match message {
            ServerMessage::Next { id, payload } => self.route_next(id, payload, transport).await,
            ServerMessage::Error { id, payload } => {
                if let Some(call) = self.calls.remove(&id) {
                    let _ = call.reply.send(Err(Error::Remote(payload)));
                } else if let Some(stream) = self.streams.remove(&id) {
                    // Terminal for the stream: final error item, then end
                    let _ = stream.sink.send(Err(Error::Remote(payload))).await;
                } else {
                    trace!(%id, "error frame for unknown operation dropped");
                }
                Ok(())
            }
            ServerMessage::Complete { id } => {
                if let Some(call) = self.calls.remove(&id) {
                    let _ = call.reply.send(Err(Error::Protocol(
                        "operation completed without a result".to_string(),
                    )));
                } else if self.streams.remove(&id).is_some() {
                    debug!(%id, "stream completed by server");
                } else {
                    trace!(%id, "complete frame for unknown operation dropped");
                }
                Ok(())
            }
            ServerMessage::Ping { payload } => {
                transport.send(&ClientMessage::Pong { payload }).await
            }
            ServerMessage::Pong { .. } => Ok(()),
            ServerMessage::ConnectionAck { .. } => {
                debug!("duplicate connection_ack ignored");
                Ok(())
            }
            ServerMessage::ConnectionError { payload } => Err(Error::Transport(format!(
                "server reported a connection error: {}",
                payload.unwrap_or(Value::Null)
            ))),
        }
    }

    async fn route_next(
        &mut self,
        id: String,
        payload: ExecutionResult,
        transport: &mut Transport,
    ) -> Result<()> {
        let item = if payload.errors.is_empty() {
            match payload.data {
                Some(data) => Ok(data),
                None => Err(Error::Protocol(
                    "next frame carried neither data nor errors".to_string(),
                )),
            }
        } else {
            Err(Error::Remote(payload.errors))
        };

        if let Some(call) = self.calls.remove(&id) {
            let _ = call.reply.send(item);
            return Ok(());
        }

        // Bounded delivery queue: a full buffer pauses frame intake for the
        // whole connection until the consumer drains it (see
        // ClientConfig::buffer_size).
        let delivered = match self.streams.get(&id) {
            Some(stream) => Some(stream.sink.send(item).await.is_ok()),
            None => None,
        };
        match delivered {
            Some(true) => Ok(()),
            Some(false) => {
                // Consumer dropped its handle without an explicit stop
                self.streams.remove(&id);
                transport.send(&ClientMessage::Complete { id }).await
            }
            None => {
                trace!(%id, "frame for unknown operation dropped");
                Ok(())
            }
        }
    }

    /// Sleep out a backoff delay while still accepting new work. Returns
    /// false when the client closed during the wait.
    async fn wait_backoff(&mut self, inbox: &mut mpsc::Receiver<Command>, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                command = inbox.recv() => match command {
                    None | Some(Command::Close) => return false,
                    Some(command) => self.register_offline(command),
                },
            }
        }
    }

    /// Register an operation while no transport is live; it is started by
    /// the next replay.
    fn register_offline(&mut self, command: Command) {
        match command {
            Command::Execute { id, request, reply } => {
                self.calls.insert(
                    id,
                    PendingCall {
                        request,
                        reply,
                        started: false,
                        retried: false,
                    },
                );
            }
            Command::Subscribe { id, request, sink } => {
                self.streams.insert(id, OpenStream { request, sink });
            }
            Command::Stop { id } => {
                self.calls.remove(&id);
                self.streams.remove(&id);
            }
            // Filtered by every caller
            Command::Close => {}
        }
    }

    /// Account for a dead transport: streams stay registered for replay,
    /// calls get one replay and then resolve with `ConnectionLost`.
    fn on_transport_lost(&mut self) {
        let calls = std::mem::take(&mut self.calls);
        for (id, mut call) in calls {
            if call.started && call.retried {
                debug!(%id, "pending call exhausted its retry");
                let _ = call.reply.send(Err(Error::ConnectionLost));
                continue;
            }
            if call.started {
                call.started = false;
                call.retried = true;
            }
            self.calls.insert(id, call);
        }
    }

    /// Terminal teardown: resolve everything registered or still queued.
    fn finish(&mut self, inbox: &mut mpsc::Receiver<Command>, make: impl Fn() -> Error) {
        inbox.close();
        while let Ok(command) = inbox.try_recv() {
            match command {
                Command::Execute { reply, .. } => {
                    let _ = reply.send(Err(make()));
                }
                Command::Subscribe { sink, .. } => {
                    let _ = sink.try_send(Err(make()));
                }
                Command::Stop { .. } | Command::Close => {}
            }
        }
        for (_, call) in self.calls.drain() {
            let _ = call.reply.send(Err(make()));
        }
        for (_, stream) in self.streams.drain() {
            // Final error item; dropping the sink then ends the stream
            let _ = stream.sink.try_send(Err(make()));
        }
    }
}

/// Exponential backoff with jitter, capped at the configured maximum
struct Backoff {
    config: ReconnectConfig,
    current: Duration,
}

impl Backoff {
    fn new(config: ReconnectConfig) -> Self {
        Self {
            current: config.initial_delay,
            config,
        }
    }

    /// Get the next delay duration
    fn next_delay(&mut self) -> Duration {
        let base = self.current;
        self.current = std::cmp::min(
            Duration::from_secs_f64(base.as_secs_f64() * self.config.multiplier),
            self.config.max_delay,
        );

        let spread = self.config.jitter.clamp(0.0, 1.0);
        if spread == 0.0 {
            return base;
        }
        let factor = 1.0 + rand::thread_rng().gen_range(-spread..=spread);
        base.mul_f64(factor.max(0.0))
    }

    /// Reset the backoff to the initial delay
    fn reset(&mut self) {
        self.current = self.config.initial_delay;
    }
}
