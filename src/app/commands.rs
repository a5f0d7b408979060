use crate::mock::DEFAULT_POINTS;
use crate::utils::normalize_ticker;

/// Upper bound accepted for mock series lengths.
pub const MAX_POINTS: usize = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tickers,
    Mock { ticker: String, points: usize },
    Fetch { ticker: String },
    Key,
    Help,
    Exit,
}

impl Command {
    /// Parse one line of interactive input. `Ok(None)` means the line was blank.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((head, args)) = parts.split_first() else {
            return Ok(None);
        };

        let command = match head.to_lowercase().as_str() {
            "tickers" | "list" => Command::Tickers,
            "mock" => {
                let ticker = parse_ticker(args.first(), "mock <TICKER> [POINTS]")?;
                let points = match args.get(1) {
                    Some(raw) => parse_points(raw)?,
                    None => DEFAULT_POINTS,
                };
                Command::Mock { ticker, points }
            }
            "fetch" => Command::Fetch {
                ticker: parse_ticker(args.first(), "fetch <TICKER>")?,
            },
            "key" => Command::Key,
            "help" | "?" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => {
                return Err(format!(
                    "Unknown command `{other}`. Type `help` for the command list."
                ))
            }
        };

        Ok(Some(command))
    }
}

fn parse_ticker(raw: Option<&&str>, usage: &str) -> Result<String, String> {
    let raw = raw.ok_or_else(|| format!("Usage: {usage}"))?;
    normalize_ticker(raw).ok_or_else(|| format!("`{raw}` is not a valid ticker"))
}

pub fn parse_points(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(points) if (1..=MAX_POINTS).contains(&points) => Ok(points),
        _ => Err(format!(
            "Point count must be a whole number between 1 and {MAX_POINTS}"
        )),
    }
}
