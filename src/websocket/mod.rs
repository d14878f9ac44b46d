//! The multiplexed graphql-transport-ws session layer.
//!
//! One [`Connection`] owns one websocket to the GraphQL endpoint and
//! multiplexes every concurrent query, mutation and subscription over it.
//! When the transport fails the connection backs off, re-dials and replays
//! every live subscription, so callers observe a single logical stream.
//!
//! Most applications use [`BetwatchClient`](crate::BetwatchClient) instead
//! of driving a [`Connection`] directly; the raw layer is exposed for
//! callers bringing their own GraphQL documents.

mod connection;
mod protocol;
mod subscription;
mod transport;

pub use connection::Connection;
pub use protocol::{GraphqlError, GraphqlRequest};
pub use subscription::Subscription;
