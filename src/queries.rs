//! GraphQL documents sent by the typed racing operations.
//!
//! The session layer is schema-agnostic; these are the documents the
//! [`BetwatchClient`](crate::BetwatchClient) facade uses. Race queries are
//! assembled from a [`RaceProjection`] so callers only pay for the blocks
//! they read.

use crate::types::RaceProjection;

pub(crate) const UPDATE_EVENT_DATA: &str = "\
mutation UpdateEventData($id: ID!, $column: String!, $data: [SelectionDataInput!]!) {
    updateEventData(id: $id, column: $column, data: $data)
}";

pub(crate) const SUBSCRIBE_PRICE_UPDATES: &str = "\
subscription PriceUpdates($id: ID!) {
    priceUpdates(id: $id) {
        id
        bookmaker
        fixedWin { price lastUpdated flucs { price lastUpdated } }
        fixedPlace { price lastUpdated flucs { price lastUpdated } }
    }
}";

pub(crate) const SUBSCRIBE_BETFAIR_UPDATES: &str = "\
subscription BetfairUpdates($id: ID!) {
    betfairUpdates(id: $id) {
        id
        marketId
        marketName
        totalMatched
        marketTotalMatched
        lastPriceTraded
        sp
        back { price size lastUpdated }
        lay { price size lastUpdated }
    }
}";

pub(crate) const SUBSCRIBE_RACES_UPDATES: &str = "\
subscription RacesUpdates($dateFrom: String!, $dateTo: String!) {
    racesUpdates(dateFrom: $dateFrom, dateTo: $dateTo) {
        id
        status
        startTime
    }
}";

pub(crate) fn races_query(projection: &RaceProjection) -> String {
    format!(
        "query GetRaces($dateFrom: String!, $dateTo: String!) {{\n    races(dateFrom: $dateFrom, dateTo: $dateTo) {{\n{}    }}\n}}",
        race_fields(projection)
    )
}

pub(crate) fn race_query(projection: &RaceProjection) -> String {
    format!(
        "query GetRace($id: ID!) {{\n    race(id: $id) {{\n{}    }}\n}}",
        race_fields(projection)
    )
}

fn race_fields(projection: &RaceProjection) -> String {
    let mut fields = String::from(
        "        id\n        name\n        number\n        status\n        distance\n        startTime\n        results\n        meeting { id location track type date railPosition }\n",
    );

    if projection.links {
        fields.push_str("        links { bookmaker navLink lastSuccessfulPriceUpdate }\n");
    }

    // The runner card is only worth fetching alongside market data
    if projection.markets || projection.place_markets || projection.betfair {
        fields.push_str(
            "        runners {\n            id\n            number\n            name\n            barrier\n            riderName\n            trainerName\n            scratchedTime\n",
        );
        if projection.markets || projection.place_markets {
            fields.push_str("            bookmakerMarkets {\n                id\n                bookmaker\n");
            fields.push_str(&price_block("fixedWin", projection.flucs));
            if projection.place_markets {
                fields.push_str(&price_block("fixedPlace", projection.flucs));
            }
            fields.push_str("            }\n");
        }
        if projection.betfair {
            fields.push_str(
                "            betfairMarkets {\n                id\n                marketId\n                marketName\n                totalMatched\n                marketTotalMatched\n                lastPriceTraded\n                sp\n                back { price size lastUpdated }\n                lay { price size lastUpdated }\n            }\n",
            );
        }
        fields.push_str("        }\n");
    }

    fields
}

fn price_block(name: &str, flucs: bool) -> String {
    if flucs {
        format!("                {} {{ price lastUpdated flucs {{ price lastUpdated }} }}\n", name)
    } else {
        format!("                {} {{ price lastUpdated }}\n", name)
    }
}
