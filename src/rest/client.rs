//! Upbit REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::auth::{Credentials, EpochCounterNonce, NonceProvider, Signer};
use crate::error::ApiError;
use crate::rate_limit::{BucketConfig, EndpointGroup, RateLimitConfig, RateLimiter};
use crate::rest::endpoints::UPBIT_BASE_URL;
use crate::rest::{ApiResponse, CancelHandle, Dispatcher, RequestDescriptor, RetryConfig};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of concurrent HTTP calls.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// The Upbit REST API client.
///
/// This client provides access to the quotation and exchange endpoints.
/// It handles signing, rate limiting and retries of transient failures.
/// Cloning is cheap; clones share rate limits, connections and the cancel handle.
///
/// # Example
///
/// ```rust,no_run
/// use upbit_api_client::rest::UpbitRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Create a client for quotation endpoints only
///     let client = UpbitRestClient::new();
///
///     let markets = client.get_markets(false).await?;
///     println!("{} markets", markets.len());
///
///     Ok(())
/// }
/// ```
///
/// For exchange endpoints, provide credentials:
///
/// ```rust,no_run
/// use upbit_api_client::auth::Credentials;
/// use upbit_api_client::rest::UpbitRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = UpbitRestClient::builder()
///         .credentials(Credentials::new("access_key", "secret_key"))
///         .build();
///
///     let accounts = client.get_accounts().await?;
///     println!("Accounts: {:?}", accounts);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct UpbitRestClient {
    dispatcher: Arc<Dispatcher>,
}

impl UpbitRestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access quotation endpoints.
    /// Use [`UpbitRestClient::builder()`] to configure credentials for exchange endpoints.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> UpbitRestClientBuilder {
        UpbitRestClientBuilder::new()
    }

    /// Execute a raw request through the pipeline.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse, ApiError> {
        self.dispatcher.execute(request).await
    }

    /// Execute a request and deserialize the response body.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, ApiError> {
        self.execute(&request).await?.json()
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The shared rate limiter.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        self.dispatcher.rate_limiter()
    }

    /// Handle that cancels all requests of this client and its clones.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.dispatcher.cancel_handle().clone()
    }
}

impl Default for UpbitRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UpbitRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpbitRestClient")
            .field("base_url", &self.dispatcher.base_url())
            .field("has_credentials", &self.dispatcher.has_credentials())
            .finish()
    }
}

/// Builder for [`UpbitRestClient`].
pub struct UpbitRestClientBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    user_agent: Option<String>,
    timeout: Duration,
    retry: RetryConfig,
    rate_limit: RateLimitConfig,
    max_in_flight: usize,
    cancel: Option<CancelHandle>,
}

impl UpbitRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: UPBIT_BASE_URL.to_string(),
            credentials: None,
            nonce_provider: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            cancel: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials for exchange endpoints.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom nonce provider.
    ///
    /// Share one provider between clients that use the same access key.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the maximum number of attempts per call, including the first.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.retry.max_attempts = attempts;
        self
    }

    /// Set the backoff base delay and cap.
    pub fn backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.retry.backoff_base = base;
        self.retry.backoff_cap = cap;
        self
    }

    /// Replace the rate limit configuration.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Override the bucket for one endpoint group.
    pub fn bucket(mut self, group: EndpointGroup, bucket: BucketConfig) -> Self {
        self.rate_limit.buckets.insert(group, bucket);
        self
    }

    /// Set the maximum number of concurrent HTTP calls.
    pub fn max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max;
        self
    }

    /// Use an existing cancel handle, e.g. one shared by several clients.
    pub fn cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Build the client.
    pub fn build(self) -> UpbitRestClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("upbit-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("upbit-api-client"));
        headers.insert(USER_AGENT, header_value);

        // No retry middleware: the dispatcher re-admits and re-signs every attempt.
        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(EpochCounterNonce::new()));
        let signer = self
            .credentials
            .map(|credentials| Signer::new(credentials, nonce_provider));

        let dispatcher = Dispatcher::new(
            client,
            self.base_url,
            signer,
            Arc::new(RateLimiter::new(&self.rate_limit)),
            self.retry,
            self.max_in_flight,
            self.cancel.unwrap_or_default(),
        );

        UpbitRestClient {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl Default for UpbitRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
