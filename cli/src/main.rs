use clap::{Parser, Subcommand};

mod commands;
mod util;

use commands::card::CardArgs;
use commands::clock::ClockArgs;
use commands::schedule::ScheduleArgs;

#[derive(Parser)]
#[command(name = "punch", version, about = "Punch relay CLI: clock in/out, fetch schedules, preview cards")]
struct Cli {
    /// Relay base URL
    #[arg(long, env = "PUNCH_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay health
    Health,
    /// Clock in or out through the relay
    Clock(ClockArgs),
    /// Fetch a monthly schedule through the relay
    Schedule(ScheduleArgs),
    /// Render a punch card from a saved backend result (offline)
    Card(CardArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health => commands::health::run(&cli.api_url).await,
        Commands::Clock(args) => commands::clock::run(&cli.api_url, args).await,
        Commands::Schedule(args) => commands::schedule::run(&cli.api_url, args).await,
        Commands::Card(args) => commands::card::run(args),
    };

    std::process::exit(code);
}
