use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use crate::config::{is_placeholder_key, Config};
use crate::error::Result;

pub mod decode;
pub mod request;
pub mod state;
pub mod transport;

pub use decode::{aggregate_bars, payload_preview, response_keys, AggregateBar};
pub use request::{prepare_aggregates_request, DateWindow, PreparedRequest};
pub use state::FetchState;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};

/// Provider quota is 5 calls per minute.
pub const MIN_CALL_INTERVAL: Duration = Duration::from_secs(12);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub type FetchResult<T> = Result<T>;

/// JSON object returned by the provider, passed through untouched.
pub type ApiPayload = Map<String, Value>;

/// Reasons a fetch produced no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    PlaceholderKey,
    RateLimited { retry_after: Duration },
    ConnectionError(String),
    Timeout(String),
    AuthError,
    Forbidden,
    NotFound,
    Unexpected { status: Option<u16>, detail: String },
}

impl FetchFailure {
    /// One-line banner text for the UI.
    pub fn message(&self) -> String {
        match self {
            FetchFailure::PlaceholderKey => {
                "API key is missing or still the placeholder value".to_string()
            }
            FetchFailure::RateLimited { retry_after } => format!(
                "Rate limit: wait {} more second(s) before the next request",
                retry_after.as_secs_f64().ceil() as u64
            ),
            FetchFailure::ConnectionError(_) => "Connection failed".to_string(),
            FetchFailure::Timeout(_) => "Request timed out".to_string(),
            FetchFailure::AuthError => "Authentication failed (401 Unauthorized)".to_string(),
            FetchFailure::Forbidden => "Access forbidden (403 Forbidden)".to_string(),
            FetchFailure::NotFound => "Endpoint not found (404 Not Found)".to_string(),
            FetchFailure::Unexpected {
                status: Some(429), ..
            } => "Rate limit exceeded (429 Too Many Requests)".to_string(),
            FetchFailure::Unexpected {
                status: Some(status),
                ..
            } => format!("Unexpected response (status {status})"),
            FetchFailure::Unexpected { status: None, .. } => "Unexpected error".to_string(),
        }
    }

    /// Suggested remediation shown under the banner.
    pub fn hint(&self) -> &'static str {
        match self {
            FetchFailure::PlaceholderKey => {
                "Set MASSIVE_API_KEY in your environment or .env file."
            }
            FetchFailure::RateLimited { .. } => "The free tier allows 5 calls per minute.",
            FetchFailure::ConnectionError(_) => {
                "Could not reach the API server. Check your internet connection."
            }
            FetchFailure::Timeout(_) => "The API server took too long to respond.",
            FetchFailure::AuthError => "Your API key may be invalid or expired.",
            FetchFailure::Forbidden => {
                "Your API key may not have permission to access this endpoint."
            }
            FetchFailure::NotFound => "The API URL or ticker may be incorrect.",
            FetchFailure::Unexpected {
                status: Some(429), ..
            } => "You've made too many requests. Wait 60 seconds and try again.",
            FetchFailure::Unexpected { .. } => "Inspect the raw response for details.",
        }
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::ConnectionError(detail)
            | FetchFailure::Timeout(detail)
            | FetchFailure::Unexpected { detail, .. }
                if !detail.is_empty() =>
            {
                write!(f, "{}: {}", self.message(), detail)
            }
            _ => f.write_str(&self.message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(ApiPayload),
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchOutcome::Failure(failure) => Some(failure),
            FetchOutcome::Success(_) => None,
        }
    }
}

/// Issues at most one aggregates request per call, spaced by `MIN_CALL_INTERVAL`.
///
/// The fetcher itself is stateless; the caller passes its session `FetchState` in.
pub struct RateLimitedFetcher<T: Transport> {
    transport: T,
    base_url: String,
    min_interval: Duration,
    timeout: Duration,
}

impl RateLimitedFetcher<ReqwestTransport> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ReqwestTransport::new()?, &config.base_url))
    }
}

impl<T: Transport> RateLimitedFetcher<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            min_interval: MIN_CALL_INTERVAL,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Fetch the trailing two years of daily bars for `ticker`.
    pub fn fetch(
        &self,
        ticker: &str,
        api_key: &str,
        state: &mut FetchState,
        now: Instant,
    ) -> FetchOutcome {
        self.fetch_window(ticker, api_key, state, now, DateWindow::default_history())
    }

    pub fn fetch_window(
        &self,
        ticker: &str,
        api_key: &str,
        state: &mut FetchState,
        now: Instant,
        window: DateWindow,
    ) -> FetchOutcome {
        if is_placeholder_key(api_key) {
            log::debug!("Skipping fetch for {}: API key not configured", ticker);
            return FetchOutcome::Failure(FetchFailure::PlaceholderKey);
        }

        if let Some(retry_after) = state.remaining_wait(now, self.min_interval) {
            log::debug!(
                "Skipping fetch for {}: rate limited for another {:?}",
                ticker,
                retry_after
            );
            return FetchOutcome::Failure(FetchFailure::RateLimited { retry_after });
        }

        let request = match prepare_aggregates_request(&self.base_url, ticker, api_key, window) {
            Ok(request) => request,
            Err(err) => {
                return FetchOutcome::Failure(FetchFailure::Unexpected {
                    status: None,
                    detail: err.to_string(),
                })
            }
        };

        log::debug!("Requesting {}", request.url);
        let response = match self
            .transport
            .get(&request.url, &request.query_pairs(), self.timeout)
        {
            Ok(response) => response,
            Err(err) => {
                log::warn!("Fetch for {} failed: {}", ticker, err);
                return FetchOutcome::Failure(match err {
                    TransportError::Connect(detail) => FetchFailure::ConnectionError(detail),
                    TransportError::Timeout(detail) => FetchFailure::Timeout(detail),
                    TransportError::Other(detail) => FetchFailure::Unexpected {
                        status: None,
                        detail,
                    },
                });
            }
        };

        let status = response.status;
        match decode::classify_response(response) {
            Ok(payload) => {
                state.record_success(now);
                log::info!(
                    "Fetched {} ({} top-level keys) from {}",
                    ticker,
                    payload.len(),
                    self.base_url
                );
                FetchOutcome::Success(payload)
            }
            Err(failure) => {
                log::warn!("Fetch for {} returned status {}: {}", ticker, status, failure);
                FetchOutcome::Failure(failure)
            }
        }
    }
}
