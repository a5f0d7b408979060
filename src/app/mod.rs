use std::io::{BufRead, Write};
use std::time::Instant;

use crossterm::style::Stylize;

use crate::config::Config;
use crate::error::{Context, Result};
use crate::fetch::{FetchOutcome, FetchState, RateLimitedFetcher, Transport};
use crate::mock;

pub mod commands;
pub mod diagnostics;
pub mod render;

pub use commands::{Command, MAX_POINTS};
pub use diagnostics::check_api_key;

/// One user's interactive session: configuration, fetcher, and its own rate-limit state.
pub struct Session<T: Transport> {
    config: Config,
    fetcher: RateLimitedFetcher<T>,
    state: FetchState,
}

impl<T: Transport> Session<T> {
    pub fn new(config: Config, fetcher: RateLimitedFetcher<T>) -> Self {
        Self {
            config,
            fetcher,
            state: FetchState::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn fetch(&mut self, ticker: &str) -> FetchOutcome {
        self.fetch_at(ticker, Instant::now())
    }

    pub fn fetch_at(&mut self, ticker: &str, now: Instant) -> FetchOutcome {
        self.fetcher
            .fetch(ticker, &self.config.api_key, &mut self.state, now)
    }

    /// Apply a parsed command. Returns `false` once the session should end.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        match command {
            Command::Tickers => render::tickers(out)?,
            Command::Mock { ticker, points } => {
                let series = mock::generate(&ticker, points);
                render::series(out, &ticker, &series)?;
            }
            Command::Fetch { ticker } => {
                writeln!(out, "Fetching {}...", ticker)?;
                let outcome = self.fetch(&ticker);
                render::outcome(out, &ticker, &outcome)?;
            }
            Command::Key => {
                if self.config.is_placeholder_key() {
                    writeln!(out, "API key: not configured")?;
                } else {
                    writeln!(out, "API key: {}", self.config.key_preview())?;
                }
                writeln!(out, "Endpoint host: {}", self.config.base_url)?;
            }
            Command::Help => render::help(out)?,
            Command::Exit => return Ok(false),
        }
        Ok(true)
    }
}

/// Line-oriented loop over `input` until `exit` or end of input.
pub fn run_interactive<T, R, W>(session: &mut Session<T>, input: R, out: &mut W) -> Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    render::banner(out)?;
    if session.config().is_placeholder_key() {
        writeln!(
            out,
            "{} MASSIVE_API_KEY is not set; only mock data is available.",
            "NOTE".yellow().bold()
        )?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "Waiting for command: ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("Failed to read user input")?;

        match Command::parse(&line) {
            Ok(Some(command)) => {
                if !session.execute(command, out)? {
                    writeln!(out, "Exiting...")?;
                    break;
                }
            }
            Ok(None) => continue,
            Err(message) => writeln!(out, "{}", message)?,
        }
    }

    Ok(())
}
