use std::time::Duration;

use crate::{Client, Result};

/// Configuration for [`Client`].
///
/// # Examples
/// ```
/// # use std::time::Duration;
/// # use osiam::ClientConfig;
/// let client = ClientConfig::from_endpoint("http://localhost:8080/osiam-server")
///     .timeout(Duration::from_secs(10))
///     .to_client()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) endpoint: String,
    pub(crate) timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration for the OSIAM resource server at `endpoint`.
    ///
    /// ```
    /// # use osiam::ClientConfig;
    /// ClientConfig::from_endpoint("http://localhost:8080/osiam-server");
    /// ```
    pub fn from_endpoint(endpoint: impl Into<String>) -> Self {
        ClientConfig {
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    /// Override the endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Timeout applied to every request. No timeout by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Create a new [`Client`] using the specified configuration.
    ///
    /// Fails with [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint) if the endpoint is
    /// not an absolute base URL.
    pub fn to_client(self) -> Result<Client> {
        Client::new(self)
    }
}
