use crate::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USERNAME, HTTP_PORT, USER_AGENT};
use crate::error::{ConcordError, Result};
use crate::protocol::{DigestChallenge, unpack_envelope};
use log::debug;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio::time::Duration;

/// Client for one Concord / Juan Optical camera.
///
/// Holds the connection profile (host, port, credentials, timeout) and
/// performs no network I/O until an endpoint method is called. Endpoint
/// methods live in the `commands` traits; this module owns the shared
/// request path: preemptive Basic auth, a single Digest retry on 401,
/// transport fault mapping, and envelope decoding.
pub struct ConcordCam {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) timeout: Duration,

    http: OnceCell<reqwest::Client>,
}

impl ConcordCam {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: HTTP_PORT,
            username: DEFAULT_USERNAME.to_string(),
            password: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http: OnceCell::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    async fn http(&self) -> Result<&reqwest::Client> {
        self.http
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(self.timeout)
                    .connect_timeout(self.timeout)
                    .build()
                    .map_err(|e| {
                        ConcordError::ConnectionError(format!("Failed to build HTTP client: {}", e))
                    })
            })
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        authorization: Option<String>,
    ) -> reqwest::RequestBuilder {
        let mut request = client
            .request(method.clone(), self.url(path))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");

        request = match authorization {
            Some(value) => request.header("Authorization", value),
            None => request.basic_auth(&self.username, Some(&self.password)),
        };

        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        request
    }

    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let client = self.http().await?;

        debug!("{} {}", method, self.url(path));
        let mut response = self
            .build_request(client, &method, path, body, None)
            .send()
            .await
            .map_err(map_transport_error)?;

        // The camera answers some endpoints with a Digest challenge instead
        // of accepting the Basic header; one retry with the computed digest.
        if response.status() == StatusCode::UNAUTHORIZED
            && let Some(challenge) = digest_challenge(&response)
        {
            debug!("retrying {} with Digest credentials", path);
            let authorization =
                challenge.authorization(&self.username, &self.password, method.as_str(), path);
            response = self
                .build_request(client, &method, path, body, Some(authorization))
                .send()
                .await
                .map_err(map_transport_error)?;
        }

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ConcordError::AuthenticationError(format!(
                "Camera rejected credentials for user '{}'",
                self.username
            )));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ConcordError::NotFoundError(format!(
                "No such resource: {}",
                path
            )));
        }
        if !status.is_success() {
            return Err(ConcordError::ProtocolError(format!(
                "Unexpected HTTP status {} for {}",
                status, path
            )));
        }

        Ok(response)
    }

    /// GET an envelope-wrapped endpoint and return its `data` payload.
    pub(crate) async fn get_data(&self, path: &str) -> Result<Value> {
        let response = self.request(Method::GET, path, None).await?;
        let body = response.bytes().await.map_err(map_transport_error)?;
        unpack_envelope(&body)
    }

    /// GET an envelope-wrapped endpoint into a typed record.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let data = self.get_data(path).await?;
        serde_json::from_value(data)
            .map_err(|e| ConcordError::ProtocolError(format!("Unexpected payload shape: {}", e)))
    }

    /// POST an optional partial-update body and check the result envelope.
    pub(crate) async fn apply(&self, path: &str, body: Option<Value>) -> Result<()> {
        let response = self.request(Method::POST, path, body.as_ref()).await?;
        let body = response.bytes().await.map_err(map_transport_error)?;
        unpack_envelope(&body).map(|_| ())
    }

    /// GET a raw-bytes endpoint; returns the Content-Type alongside the body.
    pub(crate) async fn fetch_bytes(&self, path: &str) -> Result<(Option<String>, Vec<u8>)> {
        let response = self.request(Method::GET, path, None).await?;
        let content_type = response
            .headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((content_type, body.to_vec()))
    }
}

fn digest_challenge(response: &reqwest::Response) -> Option<DigestChallenge> {
    response
        .headers()
        .get_all("WWW-Authenticate")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(DigestChallenge::parse)
}

fn map_transport_error(e: reqwest::Error) -> ConcordError {
    if e.is_timeout() {
        ConcordError::ConnectionError(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        ConcordError::ConnectionError(format!("Connection failed: {}", e))
    } else {
        ConcordError::ConnectionError(format!("Transport error: {}", e))
    }
}
