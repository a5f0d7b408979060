mod cli;

use std::io::{self, Write};

use clap::Parser;
use env_logger::Env;

use cli::{Cli, Commands};
use stock_explorer::app::{self, render, Session};
use stock_explorer::config::Config;
use stock_explorer::fetch::RateLimitedFetcher;
use stock_explorer::utils::normalize_ticker;
use stock_explorer::{mock, AppError, Result};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when the command ran but did not succeed (e.g. a failed fetch).
fn run() -> Result<bool> {
    let cli = Cli::parse();

    let config = match &cli.env_file {
        Some(path) => Config::from_env_file(path)?,
        None => Config::load()?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let fetcher = RateLimitedFetcher::from_config(&config)?;
            let mut session = Session::new(config, fetcher);
            let stdin = io::stdin();
            app::run_interactive(&mut session, stdin.lock(), &mut out)?;
        }
        Commands::Tickers => render::tickers(&mut out)?,
        Commands::Mock { ticker, points } => {
            let ticker = parse_ticker(&ticker)?;
            let series = mock::generate(&ticker, points as usize);
            render::series(&mut out, &ticker, &series)?;
        }
        Commands::Fetch { ticker } => {
            let ticker = parse_ticker(&ticker)?;
            let fetcher = RateLimitedFetcher::from_config(&config)?;
            let mut session = Session::new(config, fetcher);
            let outcome = session.fetch(&ticker);
            render::outcome(&mut out, &ticker, &outcome)?;
            out.flush()?;
            return Ok(outcome.is_success());
        }
        Commands::CheckKey => {
            let fetcher = RateLimitedFetcher::from_config(&config)?;
            let ok = app::check_api_key(&config, &fetcher, &mut out)?;
            out.flush()?;
            return Ok(ok);
        }
    }

    out.flush()?;
    Ok(true)
}

fn parse_ticker(raw: &str) -> Result<String> {
    normalize_ticker(raw).ok_or_else(|| AppError::message(format!("`{raw}` is not a valid ticker")))
}
