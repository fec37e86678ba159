//! `reqwest`-backed implementation of the backend seam.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::from_reqwest;
use crate::{ApiError, Backend, ErrorBody, LoginRequest, LoginResponse, SignupRequest};

/// Header that carries the session token on authenticated requests.
pub const SESSION_HEADER: &str = "Session-ID";

/// Timeout for the blocking teardown send. Kept short: the process is
/// going away and a hung server must not hold it open.
const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the tracker's server.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the tracker's server.
///
/// Holds one pooled `reqwest::Client` for its lifetime; cloning the
/// backend shares the pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Builds a backend from the given config.
    ///
    /// # Errors
    /// Returns [`ApiError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(from_reqwest)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and maps the response: a 2xx body is decoded as
    /// `T`, anything else becomes [`ApiError::Rejected`] with the
    /// server's `{message}` when it sent one.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(from_reqwest)?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_default();
            Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Like [`execute`](Self::execute) but discards the success body.
    /// Several endpoints answer 2xx with a `{message}` we don't need.
    async fn execute_unit(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let response = request.send().await.map_err(from_reqwest)?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.map_err(from_reqwest)?;
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_default();
            Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl Backend for HttpBackend {
    async fn login(
        &self,
        email: &str,
        password: &str,
        demo: bool,
    ) -> Result<LoginResponse, ApiError> {
        let body = if demo {
            LoginRequest::demo()
        } else {
            LoginRequest::new(email, password)
        };
        debug!(demo, "sending login");
        self.execute(self.http.post(self.url("/login")).json(&body))
            .await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        debug!("sending signup");
        self.execute_unit(self.http.post(self.url("/signup")).json(request))
            .await
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.execute_unit(self.http.post(self.url("/logout")).header(SESSION_HEADER, token))
            .await
    }

    async fn heartbeat(&self, token: &str) -> Result<(), ApiError> {
        self.execute_unit(
            self.http
                .post(self.url("/heartbeat"))
                .header(SESSION_HEADER, token),
        )
        .await
    }

    fn logout_detached(&self, token: &str) -> bool {
        // Beacon-style send: the token travels as a query parameter
        // because the page may be gone before headers can be attached.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return false;
        };
        let request = self
            .http
            .post(self.url("/logout"))
            .query(&[("session_id", token)]);
        handle.spawn(async move {
            if let Err(e) = request.send().await {
                debug!(error = %e, "detached logout send failed");
            }
        });
        true
    }

    fn logout_keepalive(&self, token: &str) {
        let url = self.url("/logout");
        let result = reqwest::blocking::Client::builder()
            .timeout(KEEPALIVE_TIMEOUT.min(self.timeout))
            .build()
            .and_then(|client| {
                client
                    .post(&url)
                    .query(&[("session_id", token)])
                    .send()
            });
        if let Err(e) = result {
            warn!(error = %e, "keepalive logout failed");
        }
    }
}
