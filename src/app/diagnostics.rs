use std::io::Write;
use std::time::Instant;

use crossterm::style::Stylize;

use crate::config::{Config, API_KEY_ENV, PLACEHOLDER_API_KEY};
use crate::error::Result;
use crate::fetch::{DateWindow, FetchState, RateLimitedFetcher, Transport};
use crate::utils::iso_date;

use super::render;

/// Ticker used for the single verification call.
pub const CHECK_TICKER: &str = "AAPL";

/// Verify the configured key with exactly one request. Returns whether the key works.
pub fn check_api_key<T, W>(
    config: &Config,
    fetcher: &RateLimitedFetcher<T>,
    out: &mut W,
) -> Result<bool>
where
    T: Transport,
    W: Write,
{
    writeln!(out, "API key configuration check")?;

    if !config.has_api_key() {
        writeln!(out, "{} {} not found in environment", "ERROR".red().bold(), API_KEY_ENV)?;
        writeln!(out, "      Make sure .env exists and contains {}", API_KEY_ENV)?;
        return Ok(false);
    }

    if config.is_placeholder_key() {
        writeln!(out, "{} API key is still the placeholder value", "ERROR".red().bold())?;
        writeln!(
            out,
            "      Replace {} in .env with your actual key",
            PLACEHOLDER_API_KEY
        )?;
        return Ok(false);
    }

    writeln!(out, "Key length: {} characters", config.api_key.chars().count())?;
    writeln!(out, "Key preview: {}", config.key_preview())?;
    writeln!(out, "Endpoint host: {}", fetcher.base_url())?;
    let window = DateWindow::default_history();
    writeln!(
        out,
        "Date range: {} to {}",
        iso_date(window.start),
        iso_date(window.end)
    )?;
    writeln!(out, "Making 1 request for {}...", CHECK_TICKER)?;

    let mut state = FetchState::new();
    let started = Instant::now();
    let outcome = fetcher.fetch_window(CHECK_TICKER, &config.api_key, &mut state, started, window);
    writeln!(
        out,
        "Response received in {:.2} seconds",
        started.elapsed().as_secs_f64()
    )?;

    render::outcome(out, CHECK_TICKER, &outcome)?;

    if outcome.is_success() {
        writeln!(out, "Your API key is working correctly.")?;
        writeln!(
            out,
            "Remember: at most 5 calls per minute ({} seconds between calls).",
            fetcher.min_interval().as_secs()
        )?;
    }

    Ok(outcome.is_success())
}
