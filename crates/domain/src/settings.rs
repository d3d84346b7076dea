//! Client settings
//!
//! Constructed once at configuration time and shared read-only by every
//! request afterwards.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::constants::DEFAULT_AGENT_NAME;
use crate::errors::{EveryOrgError, Result};

/// Credentials and request defaults for the client
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    agent_name: String,
    public_key: String,
    private_key: Option<String>,
    include_idempotency: bool,
}

impl Settings {
    /// Settings with only a public key; private operations are unavailable.
    ///
    /// # Errors
    /// Returns `EveryOrgError::Config` if `public_key` is blank.
    pub fn new(public_key: impl Into<String>) -> Result<Self> {
        Self::builder().public_key(public_key).build()
    }

    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }

    pub fn include_idempotency(&self) -> bool {
        self.include_idempotency
    }

    /// `Basic base64(public:private)` header value, or `None` without a
    /// private key.
    pub fn basic_authorization(&self) -> Option<String> {
        let private_key = self.private_key.as_deref()?;
        let credentials = format!("{}:{}", self.public_key, private_key);
        Some(format!("Basic {}", STANDARD.encode(credentials.as_bytes())))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("agent_name", &self.agent_name)
            .field("public_key", &"<redacted>")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("include_idempotency", &self.include_idempotency)
            .finish()
    }
}

/// Builder for [`Settings`]
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    agent_name: String,
    public_key: Option<String>,
    private_key: Option<String>,
    include_idempotency: bool,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self {
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            public_key: None,
            private_key: None,
            include_idempotency: false,
        }
    }
}

impl SettingsBuilder {
    /// Value sent as `User-Agent`; an empty name omits the header.
    pub fn agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    pub fn include_idempotency(mut self, enabled: bool) -> Self {
        self.include_idempotency = enabled;
        self
    }

    /// # Errors
    /// Returns `EveryOrgError::Config` if the public key is missing or blank.
    pub fn build(self) -> Result<Settings> {
        let public_key = self
            .public_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                EveryOrgError::Config("Client settings must contain at least a public key.".into())
            })?;

        // A blank private key is treated as absent.
        let private_key = self.private_key.filter(|key| !key.trim().is_empty());

        Ok(Settings {
            agent_name: self.agent_name,
            public_key,
            private_key,
            include_idempotency: self.include_idempotency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::new("pk_live").unwrap();
        assert_eq!(settings.agent_name(), DEFAULT_AGENT_NAME);
        assert_eq!(settings.public_key(), "pk_live");
        assert_eq!(settings.private_key(), None);
        assert!(!settings.include_idempotency());
        assert_eq!(settings.basic_authorization(), None);
    }

    #[test]
    fn rejects_missing_or_blank_public_key() {
        assert!(matches!(Settings::builder().build(), Err(EveryOrgError::Config(_))));
        assert!(matches!(Settings::new("   "), Err(EveryOrgError::Config(_))));
    }

    #[test]
    fn blank_private_key_is_absent() {
        let settings = Settings::builder().public_key("pk").private_key("").build().unwrap();
        assert_eq!(settings.private_key(), None);
    }

    #[test]
    fn basic_authorization_encodes_key_pair() {
        let settings =
            Settings::builder().public_key("public").private_key("secret").build().unwrap();
        // base64("public:secret")
        assert_eq!(settings.basic_authorization().as_deref(), Some("Basic cHVibGljOnNlY3JldA=="));
    }

    #[test]
    fn debug_redacts_keys() {
        let settings =
            Settings::builder().public_key("public").private_key("secret").build().unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("public\""));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
