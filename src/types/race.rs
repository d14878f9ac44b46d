//! Race-card records: meetings, races, runners and their lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::markets::{BetfairMarket, BookmakerMarket};
use crate::types::serde_helpers::null_to_default;
use crate::types::Bookmaker;

/// Lifecycle of a race.
///
/// Unknown statuses decode as [`RaceStatus::Other`] with the raw value
/// preserved; matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RaceStatus {
    Open,
    Closed,
    Abandoned,
    Interim,
    Paying,
    Resulted,
    Other(String),
}

impl RaceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RaceStatus::Open => "Open",
            RaceStatus::Closed => "Closed",
            RaceStatus::Abandoned => "Abandoned",
            RaceStatus::Interim => "Interim",
            RaceStatus::Paying => "Paying",
            RaceStatus::Resulted => "Resulted",
            RaceStatus::Other(raw) => raw,
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "open" => RaceStatus::Open,
            "closed" => RaceStatus::Closed,
            "abandoned" => RaceStatus::Abandoned,
            "interim" => RaceStatus::Interim,
            "paying" => RaceStatus::Paying,
            "resulted" => RaceStatus::Resulted,
            _ => RaceStatus::Other(raw.to_string()),
        }
    }

    /// Anything other than `Open` is no longer taking bets
    pub fn is_closed(&self) -> bool {
        !matches!(self, RaceStatus::Open)
    }
}

impl fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RaceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RaceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RaceStatus::parse(&raw))
    }
}

/// Racing code of a meeting.
///
/// Same tolerance as [`RaceStatus`]: unknown codes are preserved in
/// [`MeetingType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeetingType {
    Thoroughbred,
    Greyhound,
    Harness,
    Other(String),
}

impl MeetingType {
    pub fn as_str(&self) -> &str {
        match self {
            MeetingType::Thoroughbred => "Thoroughbred",
            MeetingType::Greyhound => "Greyhound",
            MeetingType::Harness => "Harness",
            MeetingType::Other(raw) => raw,
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "thoroughbred" => MeetingType::Thoroughbred,
            "greyhound" => MeetingType::Greyhound,
            "harness" => MeetingType::Harness,
            _ => MeetingType::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MeetingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MeetingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MeetingType::parse(&raw))
    }
}

/// A race meeting: one track on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    /// Meeting date as `YYYY-MM-DD`
    pub date: String,
    pub track: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rail_position: Option<String>,
}

/// A runner on the race card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runner {
    pub id: String,
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub betfair_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barrier: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratched_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bookmaker_markets: Vec<BookmakerMarket>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub betfair_markets: Vec<BetfairMarket>,
}

impl Runner {
    /// A scratched runner has been withdrawn from the race
    pub fn is_scratched(&self) -> bool {
        self.scratched_time.is_some()
    }
}

/// A deep link to one bookmaker's page for the race
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmaker: Option<Bookmaker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_successful_price_update: Option<DateTime<Utc>>,
}

/// A race and, depending on the requested projection, its full card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RaceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting: Option<Meeting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Distance in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<RaceLink>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub runners: Vec<Runner>,
    /// Finishing positions by runner number, winner first
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub results: Vec<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Race {
    /// Whether the race is still taking bets
    pub fn is_open(&self) -> bool {
        matches!(self.status, Some(RaceStatus::Open))
    }
}

/// Lightweight race push carried by the `racesUpdates` subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RaceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}
