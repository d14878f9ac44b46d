//! Market and price records for bookmaker and Betfair exchange data.
//!
//! All prices are [`Decimal`] so wire values survive decoding exactly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::serde_helpers::null_to_default;
use crate::types::Bookmaker;

/// A single historical price movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fluc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A quoted price and its movement history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub flucs: Vec<Fluc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Which fixed-odds market a price belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketPriceType {
    FixedWin,
    FixedPlace,
}

/// One bookmaker's fixed-odds markets for a runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmakerMarket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmaker: Option<Bookmaker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_win: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_place: Option<Price>,
}

impl BookmakerMarket {
    /// The price for the requested market type, if quoted
    pub fn price(&self, market_type: MarketPriceType) -> Option<&Price> {
        match market_type {
            MarketPriceType::FixedWin => self.fixed_win.as_ref(),
            MarketPriceType::FixedPlace => self.fixed_place.as_ref(),
        }
    }
}

/// One level of the Betfair exchange ladder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetfairTick {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A runner's Betfair exchange market
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetfairMarket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_matched: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_total_matched: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price_traded: Option<Decimal>,
    /// Betfair starting price (wire name `sp`)
    #[serde(default, rename = "sp", skip_serializing_if = "Option::is_none")]
    pub starting_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub back: Vec<BetfairTick>,
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub lay: Vec<BetfairTick>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_decodes_exactly() {
        let market: BookmakerMarket = serde_json::from_value(json!({
            "id": "bm1",
            "bookmaker": "Sportsbet",
            "fixedWin": {
                "price": 4.6,
                "lastUpdated": "2024-03-08T04:59:30Z",
                "flucs": [
                    { "price": 5.0, "lastUpdated": "2024-03-08T04:00:00Z" },
                    { "price": 4.8, "lastUpdated": "2024-03-08T04:30:00Z" }
                ]
            }
        }))
        .unwrap();

        let win = market.price(MarketPriceType::FixedWin).unwrap();
        assert_eq!(win.price, Some("4.6".parse::<Decimal>().unwrap()));
        assert_eq!(win.flucs.len(), 2);
        assert_eq!(win.flucs[0].price, Some("5.0".parse::<Decimal>().unwrap()));
        assert!(market.price(MarketPriceType::FixedPlace).is_none());
    }

    #[test]
    fn test_betfair_market_renames() {
        let market: BetfairMarket = serde_json::from_value(json!({
            "marketId": "1.234",
            "marketName": "R4 1400m Mdn",
            "totalMatched": 1523.75,
            "sp": 4.2,
            "back": [{ "price": 4.3, "size": 120.5 }],
            "lay": []
        }))
        .unwrap();

        assert_eq!(market.market_id.as_deref(), Some("1.234"));
        assert_eq!(market.starting_price, Some("4.2".parse::<Decimal>().unwrap()));
        assert_eq!(market.back[0].size, Some("120.5".parse::<Decimal>().unwrap()));
    }

    #[test]
    fn test_market_price_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&MarketPriceType::FixedWin).unwrap(),
            r#""FIXED_WIN""#
        );
        assert_eq!(
            serde_json::to_string(&MarketPriceType::FixedPlace).unwrap(),
            r#""FIXED_PLACE""#
        );
    }
}
