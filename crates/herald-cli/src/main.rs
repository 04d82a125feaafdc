mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "herald")]
#[command(about = "Generate changelog entries from completed issues", long_about = None)]
struct Cli {
    /// Config file (defaults to ./herald.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate new changelog blocks and insert them above the newest entry
    Generate {
        /// Start date (YYYY-MM-DD) instead of the newest entry's date
        #[arg(long)]
        since: Option<String>,
        /// Show the generated blocks without writing
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Write without asking for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Changelog file to update
        #[arg(long)]
        changelog: Option<PathBuf>,
    },
    /// List teams visible to LINEAR_API_KEY
    Teams,
    /// Remove every object marked `"deprecated": true` from JSON files in place
    StripDeprecated {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    match cli.command {
        Commands::Generate {
            since,
            dry_run,
            yes,
            changelog,
        } => {
            let args = commands::generate::GenerateArgs {
                since,
                dry_run,
                yes,
                changelog,
            };
            commands::generate::generate_command(cli.config.as_deref(), args).await
        }
        Commands::Teams => commands::teams::teams_command(cli.config.as_deref()).await,
        Commands::StripDeprecated { files } => {
            commands::strip_deprecated::strip_deprecated_command(&files)
        }
    }
}
