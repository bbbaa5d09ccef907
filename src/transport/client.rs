//! Authenticated HTTP client with transparent token refresh.

use std::time::{Duration, Instant};

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{bearer_header, ApiConfig, SecureString};

use super::error::TransportError;
use super::request::{ApiRequest, ApiResponse, RequestBody};
use super::scope::RequestScope;
use super::session::Session;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

/// HTTP client that attaches the session's bearer token to every request
/// and recovers from an expired token by refreshing once and retrying once.
pub struct Transport {
    client: Client,
    base_url: Url,
    timeout: Duration,
    session: Session,
    /// Serializes refresh exchanges across concurrent requests.
    refresh_gate: Mutex<()>,
}

impl Transport {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            TransportError::InvalidRequest(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;
        let timeout = Duration::from_millis(config.timeout_ms);

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(timeout)
            .cookie_store(config.with_credentials)
            .build()
            .map_err(|e| TransportError::Network { source: e })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            session,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a request with the current access token.
    ///
    /// On a "token expired" rejection the token is refreshed (at most one
    /// exchange is in flight at a time) and the request is sent once more
    /// with the new token. Any other failure is returned unchanged.
    pub async fn request(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        let snapshot = self.session.snapshot();

        match self
            .send_raw(req, snapshot.access_token.as_ref(), &request_id)
            .await
        {
            Err(TransportError::TokenExpired) => {}
            other => return other,
        }

        tracing::debug!(
            request_id = %request_id,
            path = %req.path(),
            "Access token expired, refreshing"
        );

        let token = self.refresh_after(snapshot.generation, &request_id).await?;

        // The retry goes straight to send_raw so a second rejection cannot
        // start another refresh.
        self.send_raw(req, Some(&token), &request_id).await
    }

    /// Like `request`, but resolves to `Cancelled` as soon as `scope` is.
    pub async fn request_in(
        &self,
        scope: &RequestScope,
        req: &ApiRequest,
    ) -> Result<ApiResponse, TransportError> {
        tokio::select! {
            biased;
            _ = scope.cancelled() => {
                tracing::debug!(path = %req.path(), "Request cancelled");
                Err(TransportError::Cancelled)
            }
            result = self.request(req) => result,
        }
    }

    /// Send a request that is not bound to the session (sign-in, sign-up).
    pub async fn request_public(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        self.send_raw(req, None, &request_id).await
    }

    /// Exchange the refresh credential for a new access token.
    ///
    /// On failure the session is cleared and `SessionExpired` is returned.
    pub async fn refresh(&self) -> Result<SecureString, TransportError> {
        let _guard = self.refresh_gate.lock().await;
        let request_id = Uuid::new_v4().to_string();
        self.exchange_refresh(&request_id).await
    }

    async fn refresh_after(
        &self,
        stale_generation: u64,
        request_id: &str,
    ) -> Result<SecureString, TransportError> {
        let _guard = self.refresh_gate.lock().await;

        let current = self.session.snapshot();
        if current.generation != stale_generation {
            // Someone else refreshed, signed in or lost the session while
            // this request was waiting.
            return match current.access_token {
                Some(token) => {
                    tracing::debug!(
                        request_id = %request_id,
                        generation = current.generation,
                        "Reusing token from concurrent refresh"
                    );
                    Ok(token)
                }
                None => Err(TransportError::SessionExpired { source: None }),
            };
        }

        self.exchange_refresh(request_id).await
    }

    async fn exchange_refresh(&self, request_id: &str) -> Result<SecureString, TransportError> {
        let req = ApiRequest::post(["auth", "refresh"]);
        let result = match self.send_raw(&req, None, request_id).await {
            Ok(response) => response.json::<RefreshResponse>(),
            Err(err) => Err(err),
        };

        match result {
            Ok(body) => {
                let token = SecureString::new(body.access_token);
                self.session.install(token.clone(), None);
                tracing::info!(request_id = %request_id, "Access token refreshed");
                Ok(token)
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    error = %err,
                    error_type = err.error_type(),
                    "Token refresh failed, clearing session"
                );
                self.session.clear();
                Err(TransportError::SessionExpired {
                    source: Some(Box::new(err)),
                })
            }
        }
    }

    /// Build and send one attempt. Never refreshes.
    async fn send_raw(
        &self,
        req: &ApiRequest,
        token: Option<&SecureString>,
        request_id: &str,
    ) -> Result<ApiResponse, TransportError> {
        let url = req.url(&self.base_url)?;
        let mut builder = self.client.request(req.method.clone(), url);

        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, bearer_header(token));
        }

        builder = match &req.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(form) => builder.multipart(form.to_multipart()?),
        };

        let start = Instant::now();
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?
            .to_vec();

        tracing::debug!(
            request_id = %request_id,
            method = %req.method,
            path = %req.path(),
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(TransportError::from_response(status.as_u16(), &body))
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            TransportError::Network { source: err }
        }
    }
}
