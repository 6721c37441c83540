//! Request pipeline: rate limiting, signing, transport and retries.
//!
//! Each call to [`Dispatcher::execute`] walks an explicit state machine:
//!
//! ```text
//! Idle ──admit──▶ Admitted ──sign──▶ Signed ──send──▶ Succeeded
//!  ▲                                   │
//!  └──────── backoff ◀── Retrying ◀────┴──▶ Failed
//! ```
//!
//! Every transition that waits (admission, the HTTP call, backoff) is raced
//! against the client's [`CancelHandle`], so a cancelled call stops at the
//! next await point and returns `Cancelled` without further attempts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest_middleware::ClientWithMiddleware;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{SignedToken, Signer, SigningError};
use crate::error::{ApiError, ErrorKind, InvalidRequestReason, classify};
use crate::rate_limit::{EndpointGroup, REMAINING_REQ_HEADER, RateLimiter, RemainingReq};
use crate::rest::{ApiResponse, CancelHandle, RequestDescriptor, RetryConfig};

/// State of one logical call.
#[derive(Debug)]
enum State {
    /// Waiting for a rate-limit token.
    Idle,
    /// Token consumed; about to sign.
    Admitted,
    /// Ready to send, with a token for private requests.
    Signed(Option<SignedToken>),
    /// Attempt failed with a retryable error; about to back off.
    Retrying(ApiError),
    /// Done.
    Succeeded(ApiResponse),
    /// Done, with the last observed error.
    Failed(ApiError),
}

/// A request resolved against the base URL, reused by every attempt.
#[derive(Debug)]
struct PreparedRequest<'a> {
    descriptor: &'a RequestDescriptor,
    url: Url,
    query: String,
    body: Option<String>,
}

/// Executes [`RequestDescriptor`]s against the Upbit API.
pub struct Dispatcher {
    http: ClientWithMiddleware,
    base_url: String,
    signer: Option<Signer>,
    limiter: Arc<RateLimiter>,
    retry: RetryConfig,
    in_flight: Semaphore,
    cancel: CancelHandle,
}

impl Dispatcher {
    pub(crate) fn new(
        http: ClientWithMiddleware,
        base_url: String,
        signer: Option<Signer>,
        limiter: Arc<RateLimiter>,
        retry: RetryConfig,
        max_in_flight: usize,
        cancel: CancelHandle,
    ) -> Self {
        Self {
            http,
            base_url,
            signer,
            limiter,
            retry,
            in_flight: Semaphore::new(max_in_flight.max(1)),
            cancel,
        }
    }

    /// Execute a request, retrying retryable failures.
    ///
    /// Every attempt consumes one rate-limit token, whatever its outcome.
    /// After the attempt budget is spent, the last error is returned as-is.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse, ApiError> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::cancelled());
        }

        let prepared = self.prepare(request)?;
        let max_attempts = self.retry.attempts();
        let mut attempt = 1;
        let mut state = State::Idle;

        loop {
            state = match state {
                State::Idle => {
                    self.guard(self.limiter.admit(request.group())).await?;
                    State::Admitted
                }
                State::Admitted => match self.sign(&prepared) {
                    Ok(token) => State::Signed(token),
                    Err(err) => State::Failed(err.into()),
                },
                State::Signed(token) => {
                    debug!(
                        method = %request.method(),
                        path = request.path(),
                        attempt,
                        "Sending request"
                    );
                    match self.guard(self.send(&prepared, token.as_ref())).await? {
                        Ok(response) => State::Succeeded(response),
                        Err(err) if err.retryable && attempt < max_attempts => State::Retrying(err),
                        Err(err) => State::Failed(err),
                    }
                }
                State::Retrying(err) => {
                    let delay = self.retry.delay(attempt, err.retry_after);
                    warn!(
                        path = request.path(),
                        attempt,
                        max_attempts,
                        ?delay,
                        error = %err,
                        "Retrying request"
                    );
                    self.guard(tokio::time::sleep(delay)).await?;
                    attempt += 1;
                    State::Idle
                }
                State::Succeeded(response) => return Ok(response),
                State::Failed(err) => {
                    debug!(path = request.path(), attempt, error = %err, "Request failed");
                    return Err(err);
                }
            };
        }
    }

    /// Resolve the URL and parameters once, and fail fast on anything that
    /// would make every attempt fail before reaching the network.
    fn prepare<'a>(&self, request: &'a RequestDescriptor) -> Result<PreparedRequest<'a>, ApiError> {
        if request.authenticated() {
            self.signer
                .as_ref()
                .ok_or(SigningError::MissingCredentials)?
                .check()?;
        }

        let params = request.query_params();
        let query = params.to_query_string().map_err(|err| {
            if request.authenticated() {
                ApiError::from(err)
            } else {
                ApiError::invalid_request(InvalidRequestReason::InvalidParameter, err.to_string())
            }
        })?;

        let mut url = Url::parse(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            request.path()
        ))?;

        let body = if request.method().uses_query_string() {
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
            None
        } else if params.is_empty() {
            None
        } else {
            Some(params.to_json_body().to_string())
        };

        Ok(PreparedRequest {
            descriptor: request,
            url,
            query,
            body,
        })
    }

    fn sign(&self, request: &PreparedRequest<'_>) -> Result<Option<SignedToken>, SigningError> {
        if !request.descriptor.authenticated() {
            return Ok(None);
        }
        let signer = self
            .signer
            .as_ref()
            .ok_or(SigningError::MissingCredentials)?;
        signer.sign_query(&request.query).map(Some)
    }

    async fn send(
        &self,
        request: &PreparedRequest<'_>,
        token: Option<&SignedToken>,
    ) -> Result<ApiResponse, ApiError> {
        // The semaphore is never closed.
        let _permit = self
            .in_flight
            .acquire()
            .await
            .map_err(|_| ApiError::cancelled())?;

        let mut builder = self
            .http
            .request(request.descriptor.method().into(), request.url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.bearer());
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json; charset=utf-8")
                .body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers();
        let remaining = headers
            .get(REMAINING_REQ_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(RemainingReq::parse);
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let group = request.descriptor.group();
        if let Some(remaining) = &remaining {
            self.observe(group, remaining);
        }

        let body = response.text().await?;
        if (200..300).contains(&status) {
            return Ok(ApiResponse::new(status, remaining, body));
        }

        let err = classify(status, retry_after, &body);
        if err.kind == ErrorKind::RateLimitExceeded {
            // The server has no quota left for this group right now.
            self.limiter.observe(group, 0);
        }
        Err(err)
    }

    fn observe(&self, fallback: EndpointGroup, remaining: &RemainingReq) {
        let group = remaining.group.parse().unwrap_or(fallback);
        self.limiter.observe(group, remaining.sec);
    }

    async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, ApiError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ApiError::cancelled()),
            output = fut => Ok(output),
        }
    }

    /// The rate limiter shared by all attempts.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The cancellation handle.
    pub fn cancel_handle(&self) -> &CancelHandle {
        &self.cancel
    }

    /// Whether private requests can be signed.
    pub fn has_credentials(&self) -> bool {
        self.signer.is_some()
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.signer.is_some())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
