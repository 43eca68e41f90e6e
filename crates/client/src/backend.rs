use std::future::Future;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::debug;

use crate::error::ClientError;
use crate::mock::MockBackend;

/// Something that can answer a control path with the DAW's plain-text response.
///
/// Only 2xx answers are `Ok`; the body carries no structured acknowledgement.
pub trait Backend: Send + Sync + 'static {
    fn get(&self, path: &str) -> impl Future<Output = Result<String, ClientError>> + Send;
}

/// HTTP Basic credentials for the control endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Credentials are only sent when both halves are present.
    pub fn from_parts(username: &str, password: &str) -> Option<Self> {
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl HttpBackend {
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, credentials, None)
    }

    /// `timeout` of `None` leaves the transport's own default in place.
    pub fn with_timeout(
        base_url: &str,
        credentials: Option<Credentials>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}

impl Backend for HttpBackend {
    async fn get(&self, path: &str) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "HTTP request");

        let mut request = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|source| ClientError::Http {
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| ClientError::Http {
            path: path.to_string(),
            source,
        })?;
        debug!(chars = text.len(), "HTTP response");

        Ok(text)
    }
}

/// Runtime choice between the real endpoint and the offline fixture.
pub enum AnyBackend {
    Http(HttpBackend),
    Mock(MockBackend),
}

impl AnyBackend {
    pub fn is_mock(&self) -> bool {
        matches!(self, AnyBackend::Mock(_))
    }
}

impl Backend for AnyBackend {
    async fn get(&self, path: &str) -> Result<String, ClientError> {
        match self {
            AnyBackend::Http(backend) => backend.get(path).await,
            AnyBackend::Mock(backend) => backend.get(path).await,
        }
    }
}
