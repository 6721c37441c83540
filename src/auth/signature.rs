//! JWT signing for Upbit API authentication.
//!
//! Upbit private endpoints expect an `Authorization: Bearer <jwt>` header where
//! the JWT is HS256-signed with the secret key and carries:
//! ```text
//! { "access_key": ..., "nonce": ..., "timestamp": ...,
//!   "query_hash": hex(SHA512(query_string)), "query_hash_alg": "SHA512" }
//! ```
//! The two `query_hash` fields are present only when the request has parameters.

use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use sha2::{Digest, Sha512};
use thiserror::Error;

use crate::auth::nonce::current_time_millis;
use crate::auth::{Credentials, NonceProvider, QueryParams};

/// Algorithm identifier placed in `query_hash_alg`.
pub const QUERY_HASH_ALG: &str = "SHA512";

/// Errors raised while producing a signed token.
#[derive(Error, Debug)]
pub enum SigningError {
    /// A private endpoint was called on a client without credentials.
    #[error("Missing credentials: access key and secret key required for exchange endpoints")]
    MissingCredentials,

    /// The secret key is empty.
    #[error("Secret key must not be empty")]
    EmptySecret,

    /// The parameters could not be turned into a query string.
    #[error("Cannot canonicalize request parameters: {0}")]
    Canonicalize(String),

    /// The token could not be encoded.
    #[error("Cannot encode token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// A single-use signed token.
#[derive(Clone)]
pub struct SignedToken {
    token: String,
    nonce: String,
}

impl SignedToken {
    /// The compact `header.payload.signature` string.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// The nonce embedded in the payload.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedToken")
            .field("nonce", &self.nonce)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
struct TokenPayload<'a> {
    access_key: &'a str,
    nonce: &'a str,
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_hash_alg: Option<&'static str>,
}

/// Produces signed tokens for one set of credentials.
///
/// The nonce provider is shared by reference so that several signers backed by
/// the same key never hand out the same nonce.
#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
    nonce_provider: Arc<dyn NonceProvider>,
}

impl Signer {
    /// Create a signer.
    pub fn new(credentials: Credentials, nonce_provider: Arc<dyn NonceProvider>) -> Self {
        Self {
            credentials,
            nonce_provider,
        }
    }

    /// The access key tokens are issued for.
    pub fn access_key(&self) -> &str {
        &self.credentials.access_key
    }

    /// Fail early if this signer can never produce a token.
    pub fn check(&self) -> Result<(), SigningError> {
        if self.credentials.has_empty_secret() {
            return Err(SigningError::EmptySecret);
        }
        Ok(())
    }

    /// Sign a request with the given parameters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use upbit_api_client::auth::{Credentials, EpochCounterNonce, QueryParams, Signer};
    ///
    /// let signer = Signer::new(
    ///     Credentials::new("access", "secret"),
    ///     Arc::new(EpochCounterNonce::new()),
    /// );
    /// let params = QueryParams::new().with("market", "KRW-BTC");
    /// let token = signer.sign(&params).unwrap();
    /// assert!(token.bearer().starts_with("Bearer "));
    /// ```
    pub fn sign(&self, params: &QueryParams) -> Result<SignedToken, SigningError> {
        let query = params.to_query_string()?;
        self.sign_query(&query)
    }

    /// Sign a request whose canonical query string is already known.
    ///
    /// An empty query string produces a token without `query_hash`.
    pub fn sign_query(&self, query: &str) -> Result<SignedToken, SigningError> {
        self.check()?;
        let nonce = self.nonce_provider.next_nonce();
        self.sign_with(query, nonce, current_time_millis())
    }

    fn sign_with(
        &self,
        query: &str,
        nonce: String,
        timestamp: i64,
    ) -> Result<SignedToken, SigningError> {
        self.check()?;

        let payload = TokenPayload {
            access_key: &self.credentials.access_key,
            nonce: &nonce,
            timestamp,
            query_hash: (!query.is_empty()).then(|| query_hash(query)),
            query_hash_alg: (!query.is_empty()).then_some(QUERY_HASH_ALG),
        };
        let key = EncodingKey::from_secret(self.credentials.expose_secret().as_bytes());
        let token = encode(&Header::default(), &payload, &key)?;

        Ok(SignedToken { token, nonce })
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Hex-encoded SHA-512 digest of a canonical query string.
pub fn query_hash(query: &str) -> String {
    hex::encode(Sha512::digest(query.as_bytes()))
}
