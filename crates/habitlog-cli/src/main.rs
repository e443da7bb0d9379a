use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::habit::{self, HabitAction};

#[derive(Parser)]
#[command(name = "habitlog", version, about = "habitlog CLI")]
struct Cli {
    /// Do not contact the backend this session
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show streak and today's state
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark the habit as done for today
    Done,
    /// Clear all completion records
    Reset,
    /// Show the last seven days
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status { json } => habit::run(HabitAction::Status { json }, cli.offline).await,
        Commands::Done => habit::run(HabitAction::Done, cli.offline).await,
        Commands::Reset => habit::run(HabitAction::Reset, cli.offline).await,
        Commands::History { json } => habit::run(HabitAction::History { json }, cli.offline).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
