use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "orienta", version, about = "Orienta career-assessment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an assessment interactively
    Run {
        /// Test identifier (e.g. "mbti")
        test_id: String,
        /// Override the configured API base URL
        #[arg(long)]
        api: Option<String>,
        /// Advance only on explicit 'n' instead of automatically
        #[arg(long)]
        no_auto_advance: bool,
    },
    /// List the questions of a test
    Questions {
        /// Test identifier
        test_id: String,
        /// Override the configured API base URL
        #[arg(long)]
        api: Option<String>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Score a saved answer sheet without touching the network
    Score {
        /// Path to an answer-sheet JSON file
        file: std::path::PathBuf,
    },
    /// Show locally recorded results
    Results {
        /// Maximum number of entries
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            test_id,
            api,
            no_auto_advance,
        } => commands::run::run(&test_id, api, no_auto_advance),
        Commands::Questions { test_id, api, json } => commands::questions::run(&test_id, api, json),
        Commands::Score { file } => commands::score::run(&file),
        Commands::Results { limit, json } => commands::results::run(limit, json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
