use betwatch_rs::{BetwatchClient, MarketPriceType};
use chrono::{Duration, Utc};
use futures_util::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("BETWATCH_API_KEY")?;
    let client = BetwatchClient::new(api_key);

    let today = Utc::now().date_naive();
    let races = client.get_races(today, today + Duration::days(1)).await?;
    let race = races.iter().find(|r| r.is_open()).ok_or("no open races")?;
    println!(
        "Watching {} ({})",
        race.name.as_deref().unwrap_or(&race.id),
        race.id
    );

    let mut updates = client.subscribe_bookmaker_updates(&race.id).await?;
    while let Some(markets) = updates.next().await {
        for market in markets? {
            if let Some(win) = market.price(MarketPriceType::FixedWin) {
                println!(
                    "  {} win {}",
                    market
                        .bookmaker
                        .as_ref()
                        .map(|b| b.as_str())
                        .unwrap_or("?"),
                    win.price.map(|p| p.to_string()).unwrap_or_default(),
                );
            }
        }
    }

    Ok(())
}
