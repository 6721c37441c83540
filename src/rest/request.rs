//! Request descriptors handed to the dispatcher.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::auth::QueryParams;
use crate::error::{ApiError, InvalidRequestReason};
use crate::rate_limit::EndpointGroup;

/// HTTP methods used by the Upbit API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET, parameters in the query string.
    Get,
    /// POST, parameters in a JSON body.
    Post,
    /// DELETE, parameters in the query string.
    Delete,
}

impl Method {
    /// Whether parameters travel in the query string rather than the body.
    pub fn uses_query_string(self) -> bool {
        !matches!(self, Self::Post)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Everything the dispatcher needs to issue one logical call.
///
/// # Example
///
/// ```rust
/// use upbit_api_client::rate_limit::EndpointGroup;
/// use upbit_api_client::rest::{Method, RequestDescriptor};
///
/// let request = RequestDescriptor::public(Method::Get, "/v1/ticker", EndpointGroup::Ticker)
///     .param("markets", "KRW-BTC");
/// assert!(!request.authenticated());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    params: QueryParams,
    group: EndpointGroup,
    authenticated: bool,
}

impl RequestDescriptor {
    /// Describe an unauthenticated quotation call.
    pub fn public(method: Method, path: impl Into<String>, group: EndpointGroup) -> Self {
        Self {
            method,
            path: path.into(),
            params: QueryParams::new(),
            group,
            authenticated: false,
        }
    }

    /// Describe a signed exchange call.
    pub fn private(method: Method, path: impl Into<String>, group: EndpointGroup) -> Self {
        Self {
            authenticated: true,
            ..Self::public(method, path, group)
        }
    }

    /// Add a parameter, replacing any existing value for the key.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Add a parameter when a value is present.
    pub fn param_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.params.insert(key, value);
        }
        self
    }

    /// Replace all parameters.
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Merge the fields of a serializable request struct into the parameters.
    ///
    /// `None` fields must be skipped or serialize to `null`; nested objects are rejected.
    pub fn serialized<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ApiError> {
        let params = QueryParams::from_serialize(value).map_err(|err| {
            ApiError::invalid_request(InvalidRequestReason::InvalidParameter, err.to_string())
        })?;
        for (key, value) in params.iter() {
            self.params.insert(key, value.clone());
        }
        Ok(self)
    }

    /// HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Path relative to the base URL, e.g. `/v1/accounts`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request parameters.
    pub fn query_params(&self) -> &QueryParams {
        &self.params
    }

    /// Rate-limit group.
    pub fn group(&self) -> EndpointGroup {
        self.group
    }

    /// Whether the request must be signed.
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }
}
