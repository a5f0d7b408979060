use std::collections::HashMap;

use chrono::{Duration as ChronoDuration, NaiveDate};
use reqwest::Url;

use crate::error::{AppError, Context};
use crate::utils::{iso_date, today};

use super::FetchResult;

/// Daily aggregates path, relative to the API host.
pub const AGGREGATES_PATH_TEMPLATE: &str =
    "/v2/aggs/ticker/{ticker}/range/{multiplier}/{timespan}/{from}/{to}";
/// Length of the trailing history window requested by default.
pub const HISTORY_WINDOW_DAYS: i64 = 730;
pub const API_KEY_PARAM: &str = "apiKey";

/// Inclusive date range for an aggregates request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn trailing(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - ChronoDuration::days(days),
            end,
        }
    }

    /// Trailing two-year window ending today in local time.
    pub fn default_history() -> Self {
        Self::trailing(today(), HISTORY_WINDOW_DAYS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl PreparedRequest {
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }
}

pub fn prepare_aggregates_request(
    base_url: &str,
    ticker: &str,
    api_key: &str,
    window: DateWindow,
) -> FetchResult<PreparedRequest> {
    let replacements = HashMap::from([
        ("ticker", ticker.to_string()),
        ("multiplier", "1".to_string()),
        ("timespan", "day".to_string()),
        ("from", iso_date(window.start)),
        ("to", iso_date(window.end)),
    ]);

    let mut url =
        Url::parse(base_url).with_context(|| format!("Invalid API base URL {}", base_url))?;
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            AppError::message(format!("API base URL {} cannot hold a path", base_url))
        })?;
        segments.pop_if_empty();
        // Each placeholder renders into exactly one segment; `push` percent-encodes
        // `/`, `?` and `#` so a ticker cannot spill into the rest of the URL.
        for segment in AGGREGATES_PATH_TEMPLATE.trim_start_matches('/').split('/') {
            segments.push(&render_template(segment, &replacements)?);
        }
    }

    Ok(PreparedRequest {
        url: url.into(),
        query: vec![(API_KEY_PARAM.to_string(), api_key.to_string())],
    })
}

fn render_template(template: &str, replacements: &HashMap<&str, String>) -> FetchResult<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '{' {
            let mut key = String::new();
            let mut closed = false;
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == '}' {
                    closed = true;
                    break;
                }
                key.push(next);
            }

            if !closed {
                return Err(AppError::message(format!(
                    "Unterminated placeholder in template: {{{key}"
                )));
            }

            if key.is_empty() {
                return Err(AppError::message(
                    "Encountered empty placeholder `{}` in template",
                ));
            }

            let value = replacements.get(key.as_str()).ok_or_else(|| {
                AppError::message(format!(
                    "No replacement provided for placeholder `{}` in template",
                    key
                ))
            })?;
            result.push_str(value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
