//! # betwatch-rs
//!
//! A Rust client library for the Betwatch racing GraphQL API.
//!
//! This library provides a type-safe interface for:
//! - Race card and odds queries (horse, greyhound and harness racing)
//! - Live price subscriptions (bookmaker fixed odds and Betfair exchange)
//! - Rated-price uploads via the event-data mutation
//!
//! ## Features
//!
//! - **One multiplexed session**: every query, mutation and subscription
//!   shares a single GraphQL-over-websocket connection
//! - **Transparent reconnection**: jittered exponential backoff with
//!   automatic resubscription of live streams
//! - **Strict typed decoding**: payloads decode into declared records or
//!   fail loudly, never silently; prices are `Decimal`, timestamps are
//!   `chrono` instants
//! - **Schema-agnostic core**: bring your own documents with the generic
//!   `query`/`mutate`/`subscribe` methods
//!
//! ## Quick start
//!
//! ```no_run
//! use betwatch_rs::BetwatchClient;
//! use chrono::{Duration, Utc};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BetwatchClient::new(std::env::var("BETWATCH_API_KEY")?);
//!
//!     let today = Utc::now().date_naive();
//!     let races = client.get_races(today, today + Duration::days(1)).await?;
//!     println!("{} races", races.len());
//!
//!     if let Some(race) = races.iter().find(|r| r.is_open()) {
//!         let mut updates = client.subscribe_bookmaker_updates(&race.id).await?;
//!         while let Some(markets) = updates.next().await {
//!             println!("{:?}", markets?);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Public modules
pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod websocket;

// Internal modules
mod decode;
mod queries;

// Re-export commonly used types
pub use client::BetwatchClient;
pub use config::{ClientConfig, ReconnectConfig};
pub use error::{Error, Result};
pub use types::{
    BetfairMarket, BetfairTick, Bookmaker, BookmakerMarket, Fluc, MarketPriceType, Meeting,
    MeetingType, Price, Race, RaceLink, RaceProjection, RaceStatus, RaceUpdate, Runner,
    SelectionData,
};
pub use websocket::{Connection, GraphqlError, GraphqlRequest, Subscription};
