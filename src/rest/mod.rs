//! Upbit REST API client.
//!
//! [`UpbitRestClient`] wraps a [`Dispatcher`] that runs every call through
//! the same pipeline: rate-limit admission, signing, the HTTP call, error
//! classification and retries. Typed wrappers for the endpoints live in
//! [`quotation`] (public) and [`exchange`] (signed).
//!
//! Any endpoint without a wrapper can be reached through
//! [`UpbitRestClient::execute`]:
//!
//! ```rust,no_run
//! use upbit_api_client::rate_limit::EndpointGroup;
//! use upbit_api_client::rest::{Method, RequestDescriptor, UpbitRestClient};
//!
//! # async fn run() -> Result<(), upbit_api_client::ApiError> {
//! let client = UpbitRestClient::new();
//! let request = RequestDescriptor::public(Method::Get, "/v1/ticker", EndpointGroup::Ticker)
//!     .param("markets", "KRW-BTC");
//! let response = client.execute(&request).await?;
//! println!("{}", response.body());
//! # Ok(())
//! # }
//! ```

mod cancel;
mod client;
mod dispatcher;
pub mod endpoints;
pub mod exchange;
pub mod quotation;
mod request;
mod response;
mod retry;

pub use cancel::CancelHandle;
pub use client::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_TIMEOUT, UpbitRestClient, UpbitRestClientBuilder};
pub use dispatcher::Dispatcher;
pub use endpoints::UPBIT_BASE_URL;
pub use request::{Method, RequestDescriptor};
pub use response::ApiResponse;
pub use retry::RetryConfig;
