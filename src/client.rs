use crate::callback::Callbacks;
use crate::errors::InteractionError;
use crate::followup::Followups;
use crate::http::common::DEFAULT_BASE_URL;
use crate::http::transport::Transport;
use reqwest::Client as ReqwestClient;
use std::time::Duration;

/// Total time a request may take unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// The entry point for responding to interactions.
///
/// Cheap to clone; clones share one connection pool. Interaction endpoints
/// authenticate through the interaction token in the URL, so no bot token is
/// needed.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) transport: Transport,
}

/// Builder for `Client` instances.
///
/// # Example
///
/// ```
/// use interactions_rs::Client;
/// use std::time::Duration;
///
/// let client = Client::builder()
///     .timeout(Duration::from_secs(5))
///     .connect_timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
/// assert_eq!(client.transport().timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    connect_timeout: Option<Duration>,
    user_agent: String,
}

impl ClientBuilder {
    /// Sets the host every request is sent to (default `https://discord.com`).
    ///
    /// Paths, including the `/api/v10` prefix, are appended to it. Mostly
    /// useful for pointing tests at a local server.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the total request timeout (default 15 seconds).
    ///
    /// Covers connecting, sending, and reading the whole response. A request
    /// that exceeds it fails with [`InteractionError::Timeout`].
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    ///
    /// If not set, only the total timeout applies.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::ClientBuild`] if the TLS backend cannot be
    /// initialized.
    pub fn build(self) -> Result<Client, InteractionError> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(self.user_agent);

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| InteractionError::ClientBuild(e.to_string()))?;

        Ok(Client {
            transport: Transport::new(
                http_client,
                self.base_url,
                self.timeout,
                self.connect_timeout,
            ),
        })
    }
}

impl Client {
    /// Creates a new builder for `Client` instances.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Creates a client with the default host and timeout.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn new() -> Result<Self, InteractionError> {
        Self::builder().build()
    }

    /// Callback operations: the initial response and the `@original` message.
    #[must_use]
    pub const fn callback(&self) -> Callbacks<'_> {
        Callbacks::new(self)
    }

    /// Followup message operations.
    #[must_use]
    pub const fn followup(&self) -> Followups<'_> {
        Followups::new(self)
    }

    /// The underlying transport, for requests this crate has no helper for.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }
}
