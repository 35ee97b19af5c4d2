//! Tally - terminal cart calculator.
//!
//! # Usage
//!
//! ```bash
//! # Interactive cart session (the default)
//! tally
//! tally cart
//!
//! # Print the description snippet of a page
//! tally snippet
//! tally snippet https://github.com/nolanw/HTMLReader -s .repository-description
//!
//! # Use a specific config file
//! tally --config ./tally.toml cart
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tally_lib::config::TallyConfig;
use tally_lib::error::AppError;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Terminal cart calculator")]
struct Cli {
    /// Path to tally.toml (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive cart session
    Cart,
    /// Fetch a page and print the text of the first element matching a selector
    Snippet {
        /// Page to fetch (defaults to snippet.url from the config)
        url: Option<String>,

        /// CSS selector (defaults to snippet.selector from the config)
        #[arg(short, long)]
        selector: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tally_lib::init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            eprintln!("{}", e.message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = TallyConfig::load(cli.config)?;

    match cli.command.unwrap_or(Commands::Cart) {
        Commands::Cart => tally_lib::run_cart(&config).await,
        Commands::Snippet { url, selector } => {
            let text = tally_lib::run_snippet(&config, url, selector).await?;
            println!("{}", text);
            Ok(())
        }
    }
}
