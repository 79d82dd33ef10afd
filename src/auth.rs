//! OAuth2 token retrieval from the OSIAM authorization server.
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::{client::read_json, Error, Result};

/// A bearer token used to authorize resource requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    token: String,
    token_type: String,
    scope: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Wrap a bearer token obtained elsewhere. It is treated as never expiring.
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken {
            token: token.into(),
            token_type: "bearer".to_owned(),
            scope: None,
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// When the token stops being valid, if the server told us.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= Utc::now())
    }
}

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl TokenResponse {
    fn into_access_token(self, retrieved_at: DateTime<Utc>) -> AccessToken {
        let expires_at = self
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| retrieved_at.checked_add_signed(lifetime));
        AccessToken {
            token: self.access_token,
            token_type: self.token_type,
            scope: self.scope,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

/// OAuth2 grant used to obtain a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantType {
    /// Resource owner password credentials.
    Password {
        username: String,
        password: String,
    },
    ClientCredentials,
}

impl GrantType {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        GrantType::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            GrantType::Password { .. } => "password",
            GrantType::ClientCredentials => "client_credentials",
        }
    }
}

/// Configuration for [`AuthService`].
///
/// # Examples
/// ```
/// # use osiam::{AuthConfig, GrantType};
/// let auth = AuthConfig::from_token_endpoint("http://localhost:8080/osiam-server/oauth/token")
///     .client_id("example-client")
///     .client_secret("secret")
///     .grant_type(GrantType::password("marissa", "koala"))
///     .to_auth_service()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AuthConfig {
    token_endpoint: String,
    client_id: String,
    client_secret: String,
    grant_type: GrantType,
    scope: Option<String>,
    timeout: Option<Duration>,
}

impl AuthConfig {
    /// Create a configuration for the given token endpoint, using the client credentials grant
    /// until [`grant_type`](Self::grant_type) is called.
    pub fn from_token_endpoint(token_endpoint: impl Into<String>) -> Self {
        AuthConfig {
            token_endpoint: token_endpoint.into(),
            client_id: String::new(),
            client_secret: String::new(),
            grant_type: GrantType::ClientCredentials,
            scope: None,
            timeout: None,
        }
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = client_secret.into();
        self
    }

    pub fn grant_type(mut self, grant_type: GrantType) -> Self {
        self.grant_type = grant_type;
        self
    }

    /// Space-separated scopes to request, e.g. `"GET POST PATCH"`.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Timeout for token requests. No timeout by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn to_auth_service(self) -> Result<AuthService> {
        AuthService::new(self)
    }
}

/// Retrieves access tokens from the OAuth2 token endpoint.
pub struct AuthService {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    http: reqwest::blocking::Client,
    token_endpoint: Url,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Result<AuthService> {
        let token_endpoint = Url::parse(&config.token_endpoint).map_err(Error::InvalidEndpoint)?;

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(AuthService {
            http,
            token_endpoint,
            config,
        })
    }

    /// Request a new access token using the configured grant.
    pub fn retrieve_access_token(&self) -> Result<AccessToken> {
        let mut form = vec![("grant_type", self.config.grant_type.as_str())];
        if let GrantType::Password { username, password } = &self.config.grant_type {
            form.push(("username", username.as_str()));
            form.push(("password", password.as_str()));
        }
        if let Some(scope) = &self.config.scope {
            form.push(("scope", scope.as_str()));
        }

        log::debug!(target: "osiam",
                    grant_type = self.config.grant_type.as_str();
                    "retrieving access token");
        let retrieved_at = Utc::now();
        let response = self
            .http
            .post(self.token_endpoint.clone())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&form)
            .send()?;

        match response.status() {
            StatusCode::OK => {
                let token: TokenResponse = read_json(response)?;
                log::debug!(target: "osiam", "successfully retrieved access token");
                Ok(token.into_access_token(retrieved_at))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                log::warn!(target: "osiam",
                           "token request was rejected. Check client and user credentials");
                Err(Error::Unauthorized)
            }
            status => {
                let message = response.text().unwrap_or_default();
                log::warn!(target: "osiam",
                           status = status.as_u16();
                           "received unexpected response while retrieving access token");
                Err(Error::UnexpectedStatus {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
