use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod cli;

/// mealweek - upcoming meals from a Mealie instance
#[derive(Parser)]
#[command(name = "mealweek")]
#[command(about = "Show the upcoming week of a Mealie meal plan", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the upcoming meal plan
    Week {
        /// Read the payload from a JSON file instead of fetching it ("-" for stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Reference day (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// First day to request (defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day to request (defaults to today plus display.days_ahead)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Print the calendar days as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify the Mealie URL and API token
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = mealweek::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealweek::observability::init_observability(
        &config.observability.log_level,
        config.observability.format,
    )?;

    match cli.command {
        Commands::Week {
            input,
            today,
            start,
            end,
            json,
        } => {
            cli::week::print_week(
                config,
                cli::week::WeekOptions {
                    input,
                    today,
                    start,
                    end,
                    json,
                },
            )
            .await
        }
        Commands::Check => cli::check::check(config).await,
    }
}
