//! Successful HTTP responses.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::rate_limit::RemainingReq;

/// A 2xx response from the Upbit API.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    remaining: Option<RemainingReq>,
    body: String,
}

impl ApiResponse {
    pub(crate) fn new(status: u16, remaining: Option<RemainingReq>, body: String) -> Self {
        Self {
            status,
            remaining,
            body,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Quota reported in the `Remaining-Req` header, if present.
    pub fn remaining(&self) -> Option<&RemainingReq> {
        self.remaining.as_ref()
    }

    /// Raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deserialize the body.
    ///
    /// A body that does not match `T` yields an `Unknown` error carrying the raw body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| {
            ApiError::unknown(format!("Invalid response: {e}"), self.body.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_json_parses_body() {
        let response = ApiResponse::new(200, None, r#"[{"market":"KRW-BTC"}]"#.to_string());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value[0]["market"], "KRW-BTC");
    }

    #[test]
    fn test_invalid_body_is_unknown_error() {
        let response = ApiResponse::new(200, None, "<html>".to_string());
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.raw_body.as_deref(), Some("<html>"));
    }
}
