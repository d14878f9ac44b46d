use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A bookmaker carried on market and race-link records.
///
/// The feed adds bookmakers over time, so names this build does not know
/// decode as [`Bookmaker::Other`] with the raw value preserved instead of
/// failing the whole payload. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bookmaker {
    Tab,
    Sportsbet,
    Pointsbet,
    Unibet,
    Neds,
    Ladbrokes,
    Bookmaker,
    Tabtouch,
    Palmerbet,
    Dabble,
    Moneyball,
    Bluebet,
    Betright,
    Betflux,
    Mintbet,
    Baggybet,
    Betdeluxe,
    Winbet,
    Texbet,
    Realbookie,
    Picnicbet,
    Crossbet,
    Zbet,
    Wishbet,
    Punt123,
    Marantellibet,
    Getsetbet,
    Okebet,
    Readybet,
    Betgold,
    Bossbet,
    Rambet,
    Robwaterhouse,
    Swiftbet,
    Betnation,
    Upcoz,
    Betr,
    Foxcatcher,
    Playup,
    Booki,
    Colossalbet,
    Boombet,
    Topsport,
    Southerncrossbet,
    Elitebet,
    Winnersbet,
    Jimmybet,
    Betbarn,
    Actionbet,
    Bbet,
    Webetnet,
    Bethunter,
    Goldbet,
    Midasbet,
    Vicbet,
    Betdeck,
    BetBetBet,
    PuntersPal,
    Lynchbet,
    Lucasbet,
    Pendleburybet,
    Tombet,
    Trackbet,
    Woodcockracing,
    Vipbettingservices,
    Davebet,
    Gallopbet,
    Riverbet,
    Barringtonbookmaking,
    Bushbet,
    Topodds,
    Beazabet,
    PuntOnDogs,
    Picklebet,
    Betgalaxy,
    Diamondbet,
    Bitwinning,
    Combet,
    BetM,
    Ultrabet,
    Thunderbet,
    EskanderBet,
    SportChamps,
    Surge,
    Betestate,
    Chasebet,
    Bet66,
    BookiePrice,
    /// A bookmaker this build does not know; the wire value is kept as-is
    Other(String),
}

impl Bookmaker {
    /// Canonical name as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Bookmaker::Tab => "Tab",
            Bookmaker::Sportsbet => "Sportsbet",
            Bookmaker::Pointsbet => "Pointsbet",
            Bookmaker::Unibet => "Unibet",
            Bookmaker::Neds => "Neds",
            Bookmaker::Ladbrokes => "Ladbrokes",
            Bookmaker::Bookmaker => "Bookmaker",
            Bookmaker::Tabtouch => "Tabtouch",
            Bookmaker::Palmerbet => "Palmerbet",
            Bookmaker::Dabble => "Dabble",
            Bookmaker::Moneyball => "Moneyball",
            Bookmaker::Bluebet => "Bluebet",
            Bookmaker::Betright => "Betright",
            Bookmaker::Betflux => "Betflux",
            Bookmaker::Mintbet => "Mintbet",
            Bookmaker::Baggybet => "Baggybet",
            Bookmaker::Betdeluxe => "Betdeluxe",
            Bookmaker::Winbet => "Winbet",
            Bookmaker::Texbet => "Texbet",
            Bookmaker::Realbookie => "Realbookie",
            Bookmaker::Picnicbet => "Picnicbet",
            Bookmaker::Crossbet => "Crossbet",
            Bookmaker::Zbet => "Zbet",
            Bookmaker::Wishbet => "Wishbet",
            Bookmaker::Punt123 => "Punt123",
            Bookmaker::Marantellibet => "Marantellibet",
            Bookmaker::Getsetbet => "Getsetbet",
            Bookmaker::Okebet => "Okebet",
            Bookmaker::Readybet => "Readybet",
            Bookmaker::Betgold => "Betgold",
            Bookmaker::Bossbet => "Bossbet",
            Bookmaker::Rambet => "Rambet",
            Bookmaker::Robwaterhouse => "Robwaterhouse",
            Bookmaker::Swiftbet => "Swiftbet",
            Bookmaker::Betnation => "Betnation",
            Bookmaker::Upcoz => "Upcoz",
            Bookmaker::Betr => "Betr",
            Bookmaker::Foxcatcher => "Foxcatcher",
            Bookmaker::Playup => "Playup",
            Bookmaker::Booki => "Booki",
            Bookmaker::Colossalbet => "Colossalbet",
            Bookmaker::Boombet => "Boombet",
            Bookmaker::Topsport => "Topsport",
            Bookmaker::Southerncrossbet => "Southerncrossbet",
            Bookmaker::Elitebet => "Elitebet",
            Bookmaker::Winnersbet => "Winnersbet",
            Bookmaker::Jimmybet => "Jimmybet",
            Bookmaker::Betbarn => "Betbarn",
            Bookmaker::Actionbet => "Actionbet",
            Bookmaker::Bbet => "Bbet",
            Bookmaker::Webetnet => "Webetnet",
            Bookmaker::Bethunter => "Bethunter",
            Bookmaker::Goldbet => "Goldbet",
            Bookmaker::Midasbet => "Midasbet",
            Bookmaker::Vicbet => "Vicbet",
            Bookmaker::Betdeck => "Betdeck",
            Bookmaker::BetBetBet => "BetBetBet",
            Bookmaker::PuntersPal => "PuntersPal",
            Bookmaker::Lynchbet => "Lynchbet",
            Bookmaker::Lucasbet => "Lucasbet",
            Bookmaker::Pendleburybet => "Pendleburybet",
            Bookmaker::Tombet => "Tombet",
            Bookmaker::Trackbet => "Trackbet",
            Bookmaker::Woodcockracing => "Woodcockracing",
            Bookmaker::Vipbettingservices => "Vipbettingservices",
            Bookmaker::Davebet => "Davebet",
            Bookmaker::Gallopbet => "Gallopbet",
            Bookmaker::Riverbet => "Riverbet",
            Bookmaker::Barringtonbookmaking => "Barringtonbookmaking",
            Bookmaker::Bushbet => "Bushbet",
            Bookmaker::Topodds => "Topodds",
            Bookmaker::Beazabet => "Beazabet",
            Bookmaker::PuntOnDogs => "PuntOnDogs",
            Bookmaker::Picklebet => "Picklebet",
            Bookmaker::Betgalaxy => "Betgalaxy",
            Bookmaker::Diamondbet => "Diamondbet",
            Bookmaker::Bitwinning => "Bitwinning",
            Bookmaker::Combet => "Combet",
            Bookmaker::BetM => "BetM",
            Bookmaker::Ultrabet => "Ultrabet",
            Bookmaker::Thunderbet => "Thunderbet",
            Bookmaker::EskanderBet => "EskanderBet",
            Bookmaker::SportChamps => "SportChamps",
            Bookmaker::Surge => "Surge",
            Bookmaker::Betestate => "Betestate",
            Bookmaker::Chasebet => "Chasebet",
            Bookmaker::Bet66 => "Bet66",
            Bookmaker::BookiePrice => "BookiePrice",
            Bookmaker::Other(name) => name,
        }
    }

    fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "tab" => Bookmaker::Tab,
            "sportsbet" => Bookmaker::Sportsbet,
            "pointsbet" => Bookmaker::Pointsbet,
            "unibet" => Bookmaker::Unibet,
            "neds" => Bookmaker::Neds,
            "ladbrokes" => Bookmaker::Ladbrokes,
            "bookmaker" => Bookmaker::Bookmaker,
            "tabtouch" => Bookmaker::Tabtouch,
            "palmerbet" => Bookmaker::Palmerbet,
            "dabble" => Bookmaker::Dabble,
            "moneyball" => Bookmaker::Moneyball,
            "bluebet" => Bookmaker::Bluebet,
            "betright" => Bookmaker::Betright,
            "betflux" => Bookmaker::Betflux,
            "mintbet" => Bookmaker::Mintbet,
            "baggybet" => Bookmaker::Baggybet,
            "betdeluxe" => Bookmaker::Betdeluxe,
            "winbet" => Bookmaker::Winbet,
            "texbet" => Bookmaker::Texbet,
            "realbookie" => Bookmaker::Realbookie,
            "picnicbet" => Bookmaker::Picnicbet,
            "crossbet" => Bookmaker::Crossbet,
            "zbet" => Bookmaker::Zbet,
            "wishbet" => Bookmaker::Wishbet,
            "punt123" => Bookmaker::Punt123,
            "marantellibet" => Bookmaker::Marantellibet,
            "getsetbet" => Bookmaker::Getsetbet,
            "okebet" => Bookmaker::Okebet,
            "readybet" => Bookmaker::Readybet,
            "betgold" => Bookmaker::Betgold,
            "bossbet" => Bookmaker::Bossbet,
            "rambet" => Bookmaker::Rambet,
            "robwaterhouse" => Bookmaker::Robwaterhouse,
            "swiftbet" => Bookmaker::Swiftbet,
            "betnation" => Bookmaker::Betnation,
            "upcoz" => Bookmaker::Upcoz,
            "betr" => Bookmaker::Betr,
            "foxcatcher" => Bookmaker::Foxcatcher,
            "playup" => Bookmaker::Playup,
            "booki" => Bookmaker::Booki,
            "colossalbet" => Bookmaker::Colossalbet,
            "boombet" => Bookmaker::Boombet,
            "topsport" => Bookmaker::Topsport,
            "southerncrossbet" => Bookmaker::Southerncrossbet,
            "elitebet" => Bookmaker::Elitebet,
            "winnersbet" => Bookmaker::Winnersbet,
            "jimmybet" => Bookmaker::Jimmybet,
            "betbarn" => Bookmaker::Betbarn,
            "actionbet" => Bookmaker::Actionbet,
            "bbet" => Bookmaker::Bbet,
            "webetnet" => Bookmaker::Webetnet,
            "bethunter" => Bookmaker::Bethunter,
            "goldbet" => Bookmaker::Goldbet,
            "midasbet" => Bookmaker::Midasbet,
            "vicbet" => Bookmaker::Vicbet,
            "betdeck" => Bookmaker::Betdeck,
            "betbetbet" => Bookmaker::BetBetBet,
            "punterspal" => Bookmaker::PuntersPal,
            "lynchbet" => Bookmaker::Lynchbet,
            "lucasbet" => Bookmaker::Lucasbet,
            "pendleburybet" => Bookmaker::Pendleburybet,
            "tombet" => Bookmaker::Tombet,
            "trackbet" => Bookmaker::Trackbet,
            "woodcockracing" => Bookmaker::Woodcockracing,
            "vipbettingservices" => Bookmaker::Vipbettingservices,
            "davebet" => Bookmaker::Davebet,
            "gallopbet" => Bookmaker::Gallopbet,
            "riverbet" => Bookmaker::Riverbet,
            "barringtonbookmaking" => Bookmaker::Barringtonbookmaking,
            "bushbet" => Bookmaker::Bushbet,
            "topodds" => Bookmaker::Topodds,
            "beazabet" => Bookmaker::Beazabet,
            "puntondogs" => Bookmaker::PuntOnDogs,
            "picklebet" => Bookmaker::Picklebet,
            "betgalaxy" => Bookmaker::Betgalaxy,
            "diamondbet" => Bookmaker::Diamondbet,
            "bitwinning" => Bookmaker::Bitwinning,
            "combet" => Bookmaker::Combet,
            "betm" => Bookmaker::BetM,
            "ultrabet" => Bookmaker::Ultrabet,
            "thunderbet" => Bookmaker::Thunderbet,
            "eskanderbet" => Bookmaker::EskanderBet,
            "sportchamps" => Bookmaker::SportChamps,
            "surge" => Bookmaker::Surge,
            "betestate" => Bookmaker::Betestate,
            "chasebet" => Bookmaker::Chasebet,
            "bet66" => Bookmaker::Bet66,
            "bookieprice" => Bookmaker::BookiePrice,
            _ => Bookmaker::Other(name.to_string()),
        }
    }
}

impl fmt::Display for Bookmaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Bookmaker {
    fn from(name: &str) -> Self {
        Bookmaker::parse(name)
    }
}

impl Serialize for Bookmaker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Bookmaker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Bookmaker::parse(&name))
    }
}
