use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use mealweek::{Config, MealieClient, render::render_week};
use mealweek_mealplan::{MealPlanner, default_end, default_start};
use serde_json::Value;
use tokio::io::AsyncReadExt;

pub struct WeekOptions {
    pub input: Option<PathBuf>,
    pub today: Option<NaiveDate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub json: bool,
}

pub async fn print_week(config: Config, options: WeekOptions) -> Result<()> {
    let planner = match options.today {
        Some(today) => MealPlanner::new(Local, today),
        None => MealPlanner::local(),
    }
    .with_days_ahead(config.display.days_ahead);

    let payload = match &options.input {
        Some(path) => read_payload(path).await?,
        None => {
            let today = planner.today();
            let start = options.start.unwrap_or_else(|| default_start(today));
            let end = options
                .end
                .unwrap_or_else(|| default_end(today, planner.days_ahead()));
            if end < start {
                anyhow::bail!("--end {end} is before --start {start}");
            }

            MealieClient::new(&config.mealie)?
                .fetch_meal_plan(start, end)
                .await
                .inspect_err(|e| {
                    if e.is_retryable() {
                        tracing::warn!("Mealie request failed, it may succeed if retried");
                    }
                })?
        }
    };

    let plan = planner.plan(&payload);
    tracing::info!(days = plan.days.len(), "meal plan ready");

    if options.json {
        println!("{}", serde_json::to_string_pretty(&plan.days)?);
        return Ok(());
    }

    let week = planner.week_view(&plan, config.mealie.base_url());
    if week.is_empty() {
        tracing::info!(label = %week.label, "no meals planned in window");
    }
    println!("{}", render_week(&week, &config.display)?);

    Ok(())
}

async fn read_payload(path: &Path) -> Result<Value> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("Failed to read payload from stdin")?;
        raw
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read payload from {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Payload is not valid JSON")
}
