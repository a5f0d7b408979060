use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stock-explorer")]
#[command(about = "Explore synthetic and live daily stock prices from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read settings from this env file instead of ./.env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start interactive mode (default)
    Interactive,

    /// List the predefined tickers
    Tickers,

    /// Print a deterministic synthetic high/low series
    Mock {
        /// Ticker symbol, e.g. AAPL
        ticker: String,

        #[arg(short = 'n', long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=365))]
        points: u64,
    },

    /// Fetch two years of daily bars for one ticker
    Fetch {
        /// Ticker symbol, e.g. AAPL
        ticker: String,
    },

    /// Verify the configured API key with a single request
    CheckKey,
}
