//! The public Betwatch client.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::decode;
use crate::error::Result;
use crate::queries;
use crate::types::{
    BetfairMarket, BookmakerMarket, Race, RaceProjection, RaceUpdate, SelectionData,
};
use crate::websocket::{Connection, GraphqlRequest, Subscription};

/// Client for the Betwatch racing API
///
/// One client owns one multiplexed websocket session; queries, mutations
/// and subscriptions all share it. The session is dialled on first use and
/// reconnects transparently with jittered exponential backoff, replaying
/// live subscriptions so callers observe an uninterrupted logical stream.
///
/// # Example
///
/// ```no_run
/// use betwatch_rs::BetwatchClient;
/// use chrono::{Duration, Utc};
/// use futures_util::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BetwatchClient::new("your-api-key");
///
///     let today = Utc::now().date_naive();
///     let races = client.get_races(today, today + Duration::days(1)).await?;
///
///     if let Some(race) = races.iter().find(|r| r.is_open()) {
///         let mut updates = client.subscribe_bookmaker_updates(&race.id).await?;
///         while let Some(markets) = updates.next().await {
///             println!("{:?}", markets?);
///         }
///     }
///
///     client.close().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BetwatchClient {
    connection: Connection,
}

impl BetwatchClient {
    /// Create a client for the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client for a custom endpoint
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::with_url(api_key, url))
    }

    /// Create a client from a full configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            connection: Connection::open(config),
        }
    }

    /// Execute a caller-supplied query document and decode the `data`
    /// object into `T`
    pub async fn query<T: DeserializeOwned>(
        &self,
        document: impl Into<String>,
        variables: Value,
    ) -> Result<T> {
        let request = GraphqlRequest::new(document).with_variables(variables);
        let data = self.connection.execute(request).await?;
        decode::decode(data, "data")
    }

    /// Execute a caller-supplied mutation document and decode the `data`
    /// object into `T`
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        document: impl Into<String>,
        variables: Value,
    ) -> Result<T> {
        self.query(document, variables).await
    }

    /// Subscribe with a caller-supplied subscription document.
    ///
    /// Each item is the operation's `data` object decoded into `T`. See
    /// [`Subscription`] for the ordering and at-most-once delivery
    /// guarantees.
    pub async fn subscribe<T: DeserializeOwned>(
        &self,
        document: impl Into<String>,
        variables: Value,
    ) -> Result<Subscription<T>> {
        let request = GraphqlRequest::new(document).with_variables(variables);
        self.connection.subscribe(request, None).await
    }

    /// Races starting between the two dates (inclusive), race header only.
    ///
    /// Use [`get_races_with_projection`](Self::get_races_with_projection)
    /// to pull markets in the same call.
    pub async fn get_races(&self, date_from: NaiveDate, date_to: NaiveDate) -> Result<Vec<Race>> {
        self.get_races_with_projection(date_from, date_to, RaceProjection::default())
            .await
    }

    /// Races between the two dates with the blocks selected by `projection`
    pub async fn get_races_with_projection(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        projection: RaceProjection,
    ) -> Result<Vec<Race>> {
        let request = GraphqlRequest::new(queries::races_query(&projection)).with_variables(json!({
            "dateFrom": date_from.format("%Y-%m-%d").to_string(),
            "dateTo": date_to.format("%Y-%m-%d").to_string(),
        }));
        let data = self.connection.execute(request).await?;
        let races: Option<Vec<Race>> = decode::decode(decode::take_field(data, "races")?, "races")?;
        Ok(races.unwrap_or_default())
    }

    /// A single race with its full market card, `None` when the id is
    /// unknown
    pub async fn get_race(&self, race_id: &str) -> Result<Option<Race>> {
        let projection = RaceProjection {
            markets: true,
            place_markets: true,
            flucs: true,
            links: true,
            betfair: false,
        };
        self.get_race_with_projection(race_id, projection).await
    }

    /// A single race with the blocks selected by `projection`
    pub async fn get_race_with_projection(
        &self,
        race_id: &str,
        projection: RaceProjection,
    ) -> Result<Option<Race>> {
        let request = GraphqlRequest::new(queries::race_query(&projection))
            .with_variables(json!({ "id": race_id }));
        let data = self.connection.execute(request).await?;
        decode::decode(decode::take_field(data, "race")?, "race")
    }

    /// Write custom per-selection values into one of the race's data
    /// columns, e.g. rated prices shown alongside the market grid
    pub async fn update_event_data(
        &self,
        race_id: &str,
        column: &str,
        data: Vec<SelectionData>,
    ) -> Result<()> {
        let request = GraphqlRequest::new(queries::UPDATE_EVENT_DATA).with_variables(json!({
            "id": race_id,
            "column": column,
            "data": data,
        }));
        self.connection.execute(request).await?;
        Ok(())
    }

    /// Live bookmaker price updates for one race.
    ///
    /// Delivery is at-most-once: after a transport drop the subscription is
    /// replayed and resumes from "now"; updates emitted while the
    /// connection was down are not replayed.
    pub async fn subscribe_bookmaker_updates(
        &self,
        race_id: &str,
    ) -> Result<Subscription<Vec<BookmakerMarket>>> {
        let request = GraphqlRequest::new(queries::SUBSCRIBE_PRICE_UPDATES)
            .with_variables(json!({ "id": race_id }));
        self.connection.subscribe(request, Some("priceUpdates")).await
    }

    /// Live Betfair exchange updates for one race. Same at-most-once
    /// delivery as
    /// [`subscribe_bookmaker_updates`](Self::subscribe_bookmaker_updates).
    pub async fn subscribe_betfair_updates(
        &self,
        race_id: &str,
    ) -> Result<Subscription<Vec<BetfairMarket>>> {
        let request = GraphqlRequest::new(queries::SUBSCRIBE_BETFAIR_UPDATES)
            .with_variables(json!({ "id": race_id }));
        self.connection
            .subscribe(request, Some("betfairUpdates"))
            .await
    }

    /// Status and start-time pushes for every race between the two dates.
    /// Same at-most-once delivery as
    /// [`subscribe_bookmaker_updates`](Self::subscribe_bookmaker_updates).
    pub async fn subscribe_races_updates(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Subscription<RaceUpdate>> {
        let request = GraphqlRequest::new(queries::SUBSCRIBE_RACES_UPDATES).with_variables(json!({
            "dateFrom": date_from.format("%Y-%m-%d").to_string(),
            "dateTo": date_to.format("%Y-%m-%d").to_string(),
        }));
        self.connection
            .subscribe(request, Some("racesUpdates"))
            .await
    }

    /// Shut the session down.
    ///
    /// Pending calls resolve with [`Error::Cancelled`](crate::Error) and
    /// open streams end with a final `Cancelled` item.
    pub async fn close(&self) {
        self.connection.close().await
    }
}
