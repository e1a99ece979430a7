//! Blocking HTTP session for the WebAPI backend.
//!
//! Thin wrapper over `reqwest::blocking`: URL building from path segments,
//! JSON GETs with 404 mapped to [`AfError::NotFound`], and write requests
//! compared against their expected status (201 for creates, 204 for
//! updates/deletes) to yield the mutator's plain success flag.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{AfError, AfResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a WebAPI session.
#[derive(Debug, Clone)]
pub struct WebApiConfig {
    /// Service root, e.g. `https://server/piwebapi`.
    pub base_url: String,
    /// Optional basic-auth credentials.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WebApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        WebApiConfig {
            base_url: base_url.into(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One HTTP session, shared by every loader of a connection.
pub struct WebApiClient {
    http: Client,
    base_url: Url,
    auth: Option<(String, String)>,
}

impl WebApiClient {
    pub fn new(config: WebApiConfig) -> AfResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()?;
        let auth = match (config.username, config.password) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        };
        Ok(WebApiClient {
            http,
            base_url,
            auth,
        })
    }

    /// Joins `segments` onto the base URL. Segments are percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> AfResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| AfError::Transport("base url cannot be a base".to_string()))?;
            for segment in segments {
                parts.push(segment);
            }
        }
        Ok(url)
    }

    /// GET returning a decoded JSON body. 404 becomes `NotFound(what)`, any
    /// other non-success status becomes `Transport`.
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        what: &str,
    ) -> AfResult<T> {
        debug!("GET {}", url);
        let mut request = self.http.get(url).query(query);
        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, Some(pass));
        }
        let response = request.send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AfError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(AfError::Transport(format!("{}: server returned {}", what, status)));
        }
        Ok(response.json::<T>()?)
    }

    /// Sends a write request and reports whether the server answered with
    /// the expected status. Transport-level failures still surface as
    /// errors; an unexpected status is the mutator's `false`.
    pub(crate) fn send_expect<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        expected: StatusCode,
    ) -> AfResult<bool> {
        debug!("{} {}", method, url);
        let mut request = self.http.request(method, url);
        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, Some(pass));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send()?;
        Ok(response.status() == expected)
    }
}

impl std::fmt::Debug for WebApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
