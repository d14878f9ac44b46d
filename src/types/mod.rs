mod bookmakers;
mod filters;
mod markets;
mod race;
mod serde_helpers;
mod updates;

// Re-export all types
pub use bookmakers::Bookmaker;
pub use filters::RaceProjection;
pub use markets::{BetfairMarket, BetfairTick, BookmakerMarket, Fluc, MarketPriceType, Price};
pub use race::{Meeting, MeetingType, Race, RaceLink, RaceStatus, RaceUpdate, Runner};
pub use updates::SelectionData;
