//! Error types for the Upbit client library.
//!
//! Every failure surfaced by the client is an [`ApiError`] tagged with an
//! [`ErrorKind`]. The kind decides whether the dispatcher retries the call;
//! the exchange-provided code and message are carried through untouched.
//!
//! [`classify`] turns a raw HTTP status and body into an [`ApiError`].

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::auth::SigningError;

/// Why Upbit rejected a request as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidRequestReason {
    /// A parameter was missing, malformed or out of range.
    InvalidParameter,
    /// Not enough balance to place the order or withdrawal.
    InsufficientFunds,
    /// The market code does not exist.
    UnknownMarket,
    /// The referenced order does not exist.
    OrderNotFound,
    /// The order total is under the market minimum.
    UnderMinimum,
    /// Any other client-side rejection.
    Other,
}

impl InvalidRequestReason {
    /// Map an Upbit `error.name` to a reason.
    pub fn from_code(code: &str) -> Self {
        match code {
            error_codes::INSUFFICIENT_FUNDS_ASK
            | error_codes::INSUFFICIENT_FUNDS_BID
            | error_codes::INSUFFICIENT_FUNDS => Self::InsufficientFunds,
            error_codes::UNDER_MIN_TOTAL_ASK | error_codes::UNDER_MIN_TOTAL_BID => {
                Self::UnderMinimum
            }
            error_codes::ORDER_NOT_FOUND => Self::OrderNotFound,
            error_codes::MARKET_DOES_NOT_EXIST | error_codes::CODE_NOT_FOUND => Self::UnknownMarket,
            error_codes::VALIDATION_ERROR
            | error_codes::INVALID_PARAMETER
            | error_codes::INVALID_QUERY_PAYLOAD => Self::InvalidParameter,
            _ => Self::Other,
        }
    }
}

/// Error taxonomy used for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be signed. Local and fatal.
    Signing,
    /// The exchange rejected the request as invalid. Fixable by the caller.
    InvalidRequest(InvalidRequestReason),
    /// Bad, expired or under-privileged credentials.
    Auth,
    /// Rate limit exceeded (HTTP 429, or 418 once the exchange blocks the caller).
    RateLimitExceeded,
    /// Server-side failure (5xx).
    Server,
    /// Network failure or timeout before a status was received.
    Transport,
    /// The caller cancelled the request.
    Cancelled,
    /// Unrecognized status or unparseable body.
    Unknown,
}

impl ErrorKind {
    /// Whether errors of this kind are retried by default.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::Server | Self::Transport)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signing => f.write_str("signing error"),
            Self::InvalidRequest(reason) => write!(f, "invalid request ({reason:?})"),
            Self::Auth => f.write_str("authentication error"),
            Self::RateLimitExceeded => f.write_str("rate limit exceeded"),
            Self::Server => f.write_str("server error"),
            Self::Transport => f.write_str("transport error"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Unknown => f.write_str("unknown error"),
        }
    }
}

/// The error type for all Upbit client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}{}: {message}", .code.as_ref().map(|c| format!(" [{c}]")).unwrap_or_default())]
pub struct ApiError {
    /// Classified error kind.
    pub kind: ErrorKind,
    /// Upbit error name (e.g. `"insufficient_funds_bid"`), if the body carried one.
    pub code: Option<String>,
    /// Human-readable message, from the exchange when available.
    pub message: String,
    /// HTTP status, absent for local and transport failures.
    pub status: Option<u16>,
    /// Whether the dispatcher may retry this error.
    pub retryable: bool,
    /// Raw response body, kept for diagnostics.
    pub raw_body: Option<String>,
    /// Server-suggested wait before retrying.
    pub retry_after: Option<Duration>,
}

impl ApiError {
    /// Create an error of the given kind with its default retry flag.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            status: None,
            retryable: kind.is_retryable(),
            raw_body: None,
            retry_after: None,
        }
    }

    /// A request cancelled through the client's cancel handle.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "request cancelled")
    }

    /// A network-level failure or timeout.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// A locally detected invalid request.
    pub fn invalid_request(reason: InvalidRequestReason, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest(reason), message)
    }

    /// A response that could not be interpreted.
    pub fn unknown(message: impl Into<String>, raw_body: impl Into<String>) -> Self {
        Self {
            raw_body: Some(raw_body.into()),
            ..Self::new(ErrorKind::Unknown, message)
        }
    }

    fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    fn with_raw_body(mut self, body: &str) -> Self {
        self.raw_body = Some(body.to_string());
        self
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.kind == ErrorKind::RateLimitExceeded
    }

    /// Check if this is an authentication error.
    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }

    /// Check if the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl From<SigningError> for ApiError {
    fn from(err: SigningError) -> Self {
        Self::new(ErrorKind::Signing, err.to_string())
    }
}

impl From<reqwest_middleware::Error> for ApiError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => {
                Self::transport(format!("HTTP middleware failed: {e}"))
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("request timed out: {err}"))
        } else {
            Self::transport(format!("HTTP request failed: {err}"))
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_request(
            InvalidRequestReason::InvalidParameter,
            format!("invalid URL: {err}"),
        )
    }
}

/// Upbit error body: `{"error": {"name": "...", "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    // Usually a string, but 404s carry a bare number.
    #[serde(default)]
    name: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn name(&self) -> Option<String> {
        match self.name.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Classify a non-success HTTP response into an [`ApiError`].
///
/// `retry_after` is the parsed `Retry-After` header, if any.
pub fn classify(status: u16, retry_after: Option<Duration>, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let code = parsed.as_ref().and_then(|p| p.error.name());
    let message = parsed
        .as_ref()
        .and_then(|p| p.error.message.clone())
        .unwrap_or_else(|| format!("HTTP {status}"));

    let kind = match status {
        400 | 404 | 422 => match code.as_deref() {
            Some(name) if error_codes::is_auth_code(name) => Some(ErrorKind::Auth),
            Some(name) => Some(ErrorKind::InvalidRequest(InvalidRequestReason::from_code(name))),
            None => None,
        },
        401 | 403 => Some(ErrorKind::Auth),
        418 | 429 => Some(ErrorKind::RateLimitExceeded),
        500..=599 => Some(ErrorKind::Server),
        _ => None,
    };

    let Some(kind) = kind else {
        return ApiError::unknown(format!("unexpected response (HTTP {status})"), body)
            .with_status(status)
            .with_code(code);
    };

    let mut error = ApiError::new(kind, message)
        .with_status(status)
        .with_code(code)
        .with_raw_body(body);
    error.retry_after = retry_after;
    // 418 means the exchange has already blocked the caller; retrying extends the block.
    if status == 418 {
        error.retryable = false;
    }
    error
}

/// Known Upbit error names for pattern matching.
pub mod error_codes {
    /// Invalid or unparseable JWT.
    pub const JWT_VERIFICATION: &str = "jwt_verification";
    /// The access key has expired.
    pub const EXPIRED_ACCESS_KEY: &str = "expired_access_key";
    /// The nonce was already used.
    pub const NONCE_USED: &str = "nonce_used";
    /// The caller IP is not on the key's allow list.
    pub const NO_AUTHORIZATION_IP: &str = "no_authorization_i_p";
    /// The key lacks the permission for this endpoint.
    pub const OUT_OF_SCOPE: &str = "out_of_scope";
    /// The query hash does not match the request parameters.
    pub const INVALID_QUERY_PAYLOAD: &str = "invalid_query_payload";
    /// The access key is unknown.
    pub const INVALID_ACCESS_KEY: &str = "invalid_access_key";

    /// Generic validation failure.
    pub const VALIDATION_ERROR: &str = "validation_error";
    /// Invalid parameter value.
    pub const INVALID_PARAMETER: &str = "invalid_parameter";
    /// Not enough balance for a sell order.
    pub const INSUFFICIENT_FUNDS_ASK: &str = "insufficient_funds_ask";
    /// Not enough balance for a buy order.
    pub const INSUFFICIENT_FUNDS_BID: &str = "insufficient_funds_bid";
    /// Not enough balance for a withdrawal.
    pub const INSUFFICIENT_FUNDS: &str = "insufficient_funds";
    /// Sell total under the market minimum.
    pub const UNDER_MIN_TOTAL_ASK: &str = "under_min_total_ask";
    /// Buy total under the market minimum.
    pub const UNDER_MIN_TOTAL_BID: &str = "under_min_total_bid";
    /// Order lookup failed.
    pub const ORDER_NOT_FOUND: &str = "order_not_found";
    /// Unknown market code.
    pub const MARKET_DOES_NOT_EXIST: &str = "market_does_not_exist";
    /// Quotation API answer for an unknown market (`name` is the number 404).
    pub const CODE_NOT_FOUND: &str = "404";

    /// Whether an error name signals a credential problem rather than bad input.
    pub fn is_auth_code(name: &str) -> bool {
        matches!(
            name,
            JWT_VERIFICATION
                | EXPIRED_ACCESS_KEY
                | NONCE_USED
                | NO_AUTHORIZATION_IP
                | OUT_OF_SCOPE
                | INVALID_ACCESS_KEY
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str, message: &str) -> String {
        serde_json::json!({ "error": { "name": name, "message": message } }).to_string()
    }

    #[test]
    fn test_classify_insufficient_funds() {
        let err = classify(400, None, &body("insufficient_funds_bid", "not enough KRW"));
        assert_eq!(
            err.kind,
            ErrorKind::InvalidRequest(InvalidRequestReason::InsufficientFunds)
        );
        assert_eq!(err.code.as_deref(), Some("insufficient_funds_bid"));
        assert_eq!(err.message, "not enough KRW");
        assert_eq!(err.status, Some(400));
        assert!(!err.retryable);
    }

    #[test]
    fn test_classify_jwt_error_on_400_is_auth() {
        let err = classify(400, None, &body("jwt_verification", "bad token"));
        assert_eq!(err.kind, ErrorKind::Auth);
        assert!(!err.retryable);
    }

    #[test]
    fn test_classify_unknown_market_numeric_name() {
        let raw = r#"{"error":{"name":404,"message":"Code not found"}}"#;
        let err = classify(404, None, raw);
        assert_eq!(
            err.kind,
            ErrorKind::InvalidRequest(InvalidRequestReason::UnknownMarket)
        );
        assert_eq!(err.code.as_deref(), Some("404"));
    }

    #[test]
    fn test_classify_auth_statuses() {
        assert_eq!(classify(401, None, &body("expired_access_key", "x")).kind, ErrorKind::Auth);
        assert_eq!(classify(403, None, "").kind, ErrorKind::Auth);
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = classify(429, Some(Duration::from_secs(1)), "Too many API requests.");
        assert_eq!(err.kind, ErrorKind::RateLimitExceeded);
        assert!(err.retryable);
        assert_eq!(err.retry_after, Some(Duration::from_secs(1)));
        assert_eq!(err.raw_body.as_deref(), Some("Too many API requests."));
    }

    #[test]
    fn test_classify_ip_block_not_retryable() {
        let err = classify(418, None, "");
        assert_eq!(err.kind, ErrorKind::RateLimitExceeded);
        assert!(!err.retryable);
    }

    #[test]
    fn test_classify_server_error() {
        let err = classify(503, None, "<html>unavailable</html>");
        assert_eq!(err.kind, ErrorKind::Server);
        assert!(err.retryable);
        assert_eq!(err.message, "HTTP 503");
    }

    #[test]
    fn test_classify_unparseable_400_is_unknown() {
        let err = classify(400, None, "not json");
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert!(!err.retryable);
        assert_eq!(err.raw_body.as_deref(), Some("not json"));
    }

    #[test]
    fn test_classify_unexpected_status_is_unknown() {
        let err = classify(302, None, "moved");
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.status, Some(302));
    }

    #[test]
    fn test_api_error_display() {
        let err = classify(400, None, &body("validation_error", "market is missing"));
        assert_eq!(
            err.to_string(),
            "invalid request (InvalidParameter) [validation_error]: market is missing"
        );
    }

    #[test]
    fn test_signing_error_conversion() {
        let err: ApiError = SigningError::EmptySecret.into();
        assert_eq!(err.kind, ErrorKind::Signing);
        assert!(!err.retryable);
    }
}
