use std::sync::Arc;

use reqwest::{
    blocking::{RequestBuilder, Response},
    header::CONTENT_TYPE,
    StatusCode, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    query::{Query, QueryResult},
    AccessToken, ClientConfig, Error, GroupService, Result, UserService,
};

/// A client for the OSIAM resource server.
///
/// In order to create a client instance, first create [`ClientConfig`]. The client is cheap to
/// clone and can be shared between threads.
///
/// # Examples
/// ```
/// # use osiam::{Client, ClientConfig};
/// let client = Client::new(ClientConfig::from_endpoint("http://localhost:8080/osiam-server"))
///     .unwrap();
/// let users = client.users();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    http: reqwest::blocking::Client,
    endpoint: Url,
}

impl Client {
    /// Create a new `Client` using the specified configuration.
    pub fn new(config: ClientConfig) -> Result<Client> {
        let endpoint = Url::parse(&config.endpoint).map_err(Error::InvalidEndpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Client {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Service for `/Users`.
    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    /// Service for `/Groups`.
    pub fn groups(&self) -> GroupService<'_> {
        GroupService::new(self)
    }
}

/// Requests against one resource collection of the server, e.g. `/Users`.
pub(crate) struct Resources<'a> {
    client: &'a Client,
    collection: &'static str,
}

impl<'a> Resources<'a> {
    pub fn new(client: &'a Client, collection: &'static str) -> Self {
        Resources { client, collection }
    }

    /// URL of the collection.
    fn collection_url(&self) -> Url {
        let mut url = self.client.endpoint.clone();
        // Cannot fail: Client::new rejects endpoints that cannot be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.collection);
        }
        url
    }

    /// URL of the resource `id` in the collection.
    ///
    /// An empty id would address the collection itself, so it is rejected.
    fn resource_url(&self, id: &str) -> Result<Url> {
        if id.is_empty() {
            return Err(Error::InvalidId);
        }
        let mut url = self.collection_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        Ok(url)
    }

    pub fn get<T: DeserializeOwned>(&self, id: &str, token: &AccessToken) -> Result<T> {
        let request = self.client.http.get(self.resource_url(id)?);
        read_json(self.execute(request, token)?)
    }

    pub fn search<T: DeserializeOwned>(
        &self,
        query: &Query,
        token: &AccessToken,
    ) -> Result<QueryResult<T>> {
        let request = self
            .client
            .http
            .get(self.collection_url())
            .query(query.params());
        read_json(self.execute(request, token)?)
    }

    pub fn create<B: Serialize, T: DeserializeOwned>(
        &self,
        body: &B,
        token: &AccessToken,
    ) -> Result<T> {
        let request = with_json(self.client.http.post(self.collection_url()), body)?;
        read_json(self.execute(request, token)?)
    }

    pub fn replace<B: Serialize, T: DeserializeOwned>(
        &self,
        id: &str,
        body: &B,
        token: &AccessToken,
    ) -> Result<T> {
        let request = with_json(self.client.http.put(self.resource_url(id)?), body)?;
        read_json(self.execute(request, token)?)
    }

    pub fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        id: &str,
        body: &B,
        token: &AccessToken,
    ) -> Result<T> {
        let request = with_json(self.client.http.patch(self.resource_url(id)?), body)?;
        read_json(self.execute(request, token)?)
    }

    pub fn delete(&self, id: &str, token: &AccessToken) -> Result<()> {
        let request = self.client.http.delete(self.resource_url(id)?);
        self.execute(request, token)?;
        Ok(())
    }

    fn execute(&self, request: RequestBuilder, token: &AccessToken) -> Result<Response> {
        if token.is_expired() {
            log::warn!(target: "osiam", "sending request with an expired access token");
        }

        let request = request.bearer_auth(token.token()).build()?;
        log::debug!(target: "osiam",
                    method:display = request.method(),
                    url:display = request.url();
                    "sending request");
        let response = self.client.http.execute(request)?;
        check_status(response)
    }
}

fn with_json<B: Serialize>(request: RequestBuilder, body: &B) -> Result<RequestBuilder> {
    let body = serde_json::to_vec(body).map_err(|err| Error::Serialize(Arc::new(err)))?;
    Ok(request.header(CONTENT_TYPE, "application/json").body(body))
}

/// Error body returned by the server. Resource endpoints use `description`, the OAuth2 endpoint
/// uses `error_description`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|error| {
            error
                .description
                .or(error.error_description)
                .or(error.error_code)
        })
        .unwrap_or_else(|| body.to_owned())
}

/// Map non-success statuses to the matching [`Error`].
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = error_message(&response.text().unwrap_or_default());
    log::warn!(target: "osiam",
               status = status.as_u16(),
               message = message.as_str();
               "received non-success response");

    Err(match status {
        StatusCode::BAD_REQUEST => Error::BadRequest(message),
        StatusCode::UNAUTHORIZED => Error::Unauthorized,
        StatusCode::FORBIDDEN => Error::Forbidden,
        StatusCode::NOT_FOUND => Error::NoResult,
        StatusCode::CONFLICT => Error::Conflict(message),
        status => Error::UnexpectedStatus {
            status: status.as_u16(),
            message,
        },
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|err| {
        log::warn!(target: "osiam", "failed to parse response body: {:?}", err);
        Error::Deserialize(Arc::new(err))
    })
}
