//! Feed transport: the HTTP client seam and the ordered endpoint ladder.
//!
//! A fetch walks a list of [`EndpointStrategy`] values in order. The first is
//! normally [`EndpointStrategy::Direct`]; the rest wrap the feed URL in a relay
//! template. Each attempt fails independently and there are no retry loops.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use thiserror::Error;

/// A single failed fetch attempt. Logged, never surfaced.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Fetches the body of a URL as text.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Issues a GET and returns the body of a successful response.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`FeedClient`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFeedClient {
    client: reqwest::Client,
}

impl ReqwestFeedClient {
    /// Builds a client, applying `timeout` to every request when given.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl FeedClient for ReqwestFeedClient {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// One rung of the fetch ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStrategy {
    /// Fetch the feed URL itself.
    Direct,
    /// Fetch through a relay. `{url}` in the template is replaced by the feed
    /// URL and `{url_encoded}` by its percent-encoded form; a template with
    /// neither placeholder has the feed URL appended.
    Relay {
        /// The relay URL template.
        template: String,
    },
}

impl EndpointStrategy {
    /// Builds the full ladder: direct first, then each relay in order.
    pub fn ladder<S: AsRef<str>>(relays: &[S]) -> Vec<Self> {
        std::iter::once(EndpointStrategy::Direct)
            .chain(relays.iter().map(|template| EndpointStrategy::Relay {
                template: template.as_ref().to_string(),
            }))
            .collect()
    }

    /// The URL to request for `feed_url` under this strategy.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::holidays::EndpointStrategy;
    ///
    /// let relay = EndpointStrategy::Relay {
    ///     template: "https://api.allorigins.win/raw?url={url_encoded}".to_string(),
    /// };
    /// assert_eq!(
    ///     relay.endpoint("https://example.com/en.json"),
    ///     "https://api.allorigins.win/raw?url=https%3A%2F%2Fexample.com%2Fen.json"
    /// );
    /// ```
    pub fn endpoint(&self, feed_url: &str) -> String {
        match self {
            EndpointStrategy::Direct => feed_url.to_string(),
            EndpointStrategy::Relay { template } => {
                if template.contains("{url_encoded}") {
                    template.replace("{url_encoded}", &urlencoding::encode(feed_url))
                } else if template.contains("{url}") {
                    template.replace("{url}", feed_url)
                } else {
                    format!("{}{}", template, feed_url)
                }
            }
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            EndpointStrategy::Direct => "direct",
            EndpointStrategy::Relay { .. } => "relay",
        }
    }
}
