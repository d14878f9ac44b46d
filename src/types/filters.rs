/// Controls which blocks the race queries request.
///
/// The default projection fetches the race header only; switch blocks on to
/// pull market data. Fewer blocks means smaller responses and faster
/// queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaceProjection {
    /// Include bookmaker fixed-win markets
    pub markets: bool,
    /// Include bookmaker fixed-place markets
    pub place_markets: bool,
    /// Include the price movement history on each market
    pub flucs: bool,
    /// Include per-bookmaker deep links
    pub links: bool,
    /// Include Betfair exchange markets
    pub betfair: bool,
}

impl RaceProjection {
    /// Everything the API can return for a race
    pub fn full() -> Self {
        Self {
            markets: true,
            place_markets: true,
            flucs: true,
            links: true,
            betfair: true,
        }
    }

    pub fn with_markets(mut self) -> Self {
        self.markets = true;
        self
    }

    pub fn with_place_markets(mut self) -> Self {
        self.place_markets = true;
        self
    }

    pub fn with_flucs(mut self) -> Self {
        self.flucs = true;
        self
    }

    pub fn with_links(mut self) -> Self {
        self.links = true;
        self
    }

    pub fn with_betfair(mut self) -> Self {
        self.betfair = true;
        self
    }
}
