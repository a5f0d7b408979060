use std::io::Write;

use crossterm::style::Stylize;

use crate::error::Result;
use crate::fetch::{aggregate_bars, payload_preview, response_keys, FetchOutcome};
use crate::mock::{MockSeries, STOCK_TICKERS};
use crate::utils::current_human_timestamp;

const TICKERS_PER_ROW: usize = 10;

pub fn banner<W: Write>(out: &mut W) -> Result<()> {
    writeln!(
        out,
        "# ------------------------------------------------------------------------ #"
    )?;
    writeln!(out, "# Stock Data Explorer")?;
    writeln!(out, "# Session started: {}", current_human_timestamp())?;
    writeln!(out, "#")?;
    help(out)?;
    writeln!(
        out,
        "# ------------------------------------------------------------------------ #"
    )?;
    writeln!(out)?;
    Ok(())
}

pub fn help<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "#   tickers                   List the predefined tickers")?;
    writeln!(out, "#   mock <TICKER> [POINTS]    Show a synthetic high/low series")?;
    writeln!(out, "#   fetch <TICKER>            Fetch two years of daily bars (12s spacing)")?;
    writeln!(out, "#   key                       Show API key status")?;
    writeln!(out, "#   exit                      Exit the program")?;
    Ok(())
}

pub fn tickers<W: Write>(out: &mut W) -> Result<()> {
    for row in STOCK_TICKERS.chunks(TICKERS_PER_ROW) {
        let line: Vec<String> = row.iter().map(|ticker| format!("{ticker:<6}")).collect();
        writeln!(out, "  {}", line.join(" ").trim_end())?;
    }
    Ok(())
}

pub fn series<W: Write>(out: &mut W, ticker: &str, series: &MockSeries) -> Result<()> {
    writeln!(
        out,
        "{} ({} days, synthetic)",
        ticker.bold(),
        series.len()
    )?;
    writeln!(out, "{:>5}  {:>10}  {:>10}", "Day", "High", "Low")?;
    for (day, high, low) in series.rows() {
        writeln!(out, "{day:>5}  {high:>10.2}  {low:>10.2}")?;
    }
    Ok(())
}

pub fn outcome<W: Write>(out: &mut W, ticker: &str, outcome: &FetchOutcome) -> Result<()> {
    match outcome {
        FetchOutcome::Success(payload) => {
            writeln!(out, "{} {}", "OK".green().bold(), ticker)?;
            writeln!(out, "Response keys: {}", response_keys(payload).join(", "))?;
            let bars = aggregate_bars(payload);
            if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
                writeln!(
                    out,
                    "Daily bars: {} (low {:.2} .. high {:.2} on the latest day)",
                    bars.len(),
                    last.low,
                    last.high
                )?;
                log::debug!(
                    "{} bars span {} .. {} ms",
                    ticker,
                    first.timestamp_ms,
                    last.timestamp_ms
                );
            }
            writeln!(out, "{}", payload_preview(payload))?;
        }
        FetchOutcome::Failure(failure) => {
            writeln!(out, "{} {}", "ERROR".red().bold(), failure)?;
            writeln!(out, "      {}", failure.hint())?;
        }
    }
    Ok(())
}
