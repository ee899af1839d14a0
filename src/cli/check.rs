use anyhow::Result;
use chrono::Local;
use mealweek::{Config, MealieClient};

#[tracing::instrument(skip(config))]
pub async fn check(config: Config) -> Result<()> {
    let client = MealieClient::new(&config.mealie)?;
    tracing::info!("Checking connection to {}", client.base_url());

    let report = client.check_connection(Local::now().date_naive()).await?;

    println!("Connected to {} as {}", client.base_url(), report.username);
    println!("Found {} meal plan entries for the next week", report.items);

    Ok(())
}
