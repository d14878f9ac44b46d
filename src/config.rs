use std::time::Duration;

/// Configuration for a Betwatch connection
///
/// The defaults suit the public endpoint; construct with
/// [`ClientConfig::new`] and override individual fields as needed.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Websocket endpoint for the GraphQL API
    pub url: String,
    /// API key, sent in the `connection_init` payload. A new key requires
    /// a new client.
    pub api_key: String,
    /// Deadline for establishing the websocket socket
    pub connect_timeout: Duration,
    /// Deadline for the `connection_init`/`connection_ack` exchange
    pub handshake_timeout: Duration,
    /// Deadline for a single query or mutation response. Expiry fails that
    /// call only; the connection stays up.
    pub request_timeout: Duration,
    /// Interval between protocol-level keep-alive pings
    pub ping_interval: Duration,
    /// Silence tolerated before the connection is considered dead, as a
    /// multiple of `ping_interval`
    pub keepalive_grace: u32,
    /// Delivery queue capacity per subscription. A full queue pauses frame
    /// intake until the consumer catches up.
    pub buffer_size: usize,
    /// Reconnection behavior after a transport failure
    pub reconnect: ReconnectConfig,
}

impl ClientConfig {
    /// Default websocket endpoint for the Betwatch API
    pub const DEFAULT_URL: &'static str = "wss://api.betwatch.com/sub";

    /// Create a configuration for the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(api_key, Self::DEFAULT_URL)
    }

    /// Create a configuration for a custom endpoint
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            ping_interval: Duration::from_secs(15),
            keepalive_grace: 3,
            buffer_size: 64,
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Configuration for reconnection behavior
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Initial delay before first reconnection attempt
    pub initial_delay: Duration,
    /// Maximum delay between reconnection attempts
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
    /// Random spread applied to each delay, as a fraction of the delay
    /// (0.2 means +/-20%). Keeps a fleet of clients from reconnecting in
    /// lockstep.
    pub jitter: f64,
    /// Maximum number of reconnection attempts (None = infinite)
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.2,
            max_attempts: None,
        }
    }
}
