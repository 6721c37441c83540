//! Authentication module for Upbit API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Nonce generation for replay attack prevention
//! - Canonical query strings for request parameters
//! - HS256 JWT generation for authenticated requests

mod credentials;
mod nonce;
mod query;
mod signature;

pub use credentials::Credentials;
pub use nonce::{EpochCounterNonce, NonceProvider, UuidNonce};
pub use query::QueryParams;
pub use signature::{QUERY_HASH_ALG, SignedToken, Signer, SigningError, query_hash};
