use std::fmt::{Display, Formatter};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Context, Result};

/// Raw status and body of an HTTP exchange, before any classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport-level failure, split the way the fetcher reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Connect(String),
    Timeout(String),
    Other(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "connection failed: {msg}"),
            TransportError::Timeout(msg) => write!(f, "request timed out: {msg}"),
            TransportError::Other(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Single blocking GET; the seam tests use to stand in for the network.
pub trait Transport {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError> {
        (**self).get(url, query, timeout)
    }
}

/// Production transport backed by `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("stock-explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to construct blocking HTTP client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(classify_reqwest_error)?;

        Ok(HttpResponse { status, body })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    // Strip the query so the API key never reaches logs or the UI.
    let err = err.without_url();
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    pub(crate) type Reply = std::result::Result<HttpResponse, TransportError>;

    /// Replays canned replies in order and records every request it sees.
    pub(crate) struct ScriptedTransport {
        replies: RefCell<Vec<Reply>>,
        requests: RefCell<Vec<(String, Vec<(String, String)>, Duration)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: RefCell::new(replies.into_iter().rev().collect()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn always_ok() -> Self {
            Self::new(
                (0..16)
                    .map(|_| Ok(HttpResponse::new(200, r#"{"status":"OK"}"#)))
                    .collect(),
            )
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.borrow().len()
        }

        pub(crate) fn requests(&self) -> Vec<(String, Vec<(String, String)>, Duration)> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn get(
            &self,
            url: &str,
            query: &[(&str, &str)],
            timeout: Duration,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push((
                url.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                timeout,
            ));
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".into())))
        }
    }
}
