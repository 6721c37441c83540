//! # Upbit Client
//!
//! An async Rust client library for the Upbit exchange REST API.
//!
//! ## Features
//!
//! - Quotation and exchange REST endpoints with typed responses
//! - HS256 JWT signing with per-request nonces and query hashes
//! - Per-group rate limiting that follows the server's `Remaining-Req` header
//! - Retries with exponential backoff and jitter for transient failures
//! - Client-wide cancellation
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use upbit_api_client::rest::UpbitRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UpbitRestClient::new();
//!     let tickers = client.get_ticker(&["KRW-BTC"]).await?;
//!     println!("BTC: {}", tickers[0].trade_price);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod rest;

// Re-export commonly used types at crate root
pub use error::{ApiError, ErrorKind, InvalidRequestReason};
pub use rest::{UpbitRestClient, UpbitRestClientBuilder};

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
