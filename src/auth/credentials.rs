//! Credential management for Upbit API authentication.

use secrecy::{ExposeSecret, SecretString};

/// API credentials containing the access key and secret key.
#[derive(Clone)]
pub struct Credentials {
    /// The access key (public identifier, embedded in every token)
    pub access_key: String,
    /// The secret key (private, used only for signing)
    secret_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an access key and secret key.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Get the secret key for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub(crate) fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Whether the secret key is empty and therefore unusable for signing.
    pub fn has_empty_secret(&self) -> bool {
        self.secret_key.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
