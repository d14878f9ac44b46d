use betwatch_rs::BetwatchClient;
use chrono::{Duration, Utc};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("BETWATCH_API_KEY")?;
    let client = BetwatchClient::new(api_key);

    let today = Utc::now().date_naive();
    let tomorrow = today + Duration::days(1);

    let races = client.get_races(today, tomorrow).await?;
    println!("{} races between {} and {}", races.len(), today, tomorrow);

    for race in races.iter().filter(|r| r.is_open()).take(10) {
        println!(
            "  {} R{} {} ({})",
            race.meeting.as_ref().map(|m| m.track.as_str()).unwrap_or("?"),
            race.number.unwrap_or(0),
            race.name.as_deref().unwrap_or("?"),
            race.status.as_ref().map(|s| s.as_str()).unwrap_or("?"),
        );
    }

    client.close().await;
    Ok(())
}
