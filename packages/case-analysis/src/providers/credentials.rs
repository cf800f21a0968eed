//! API key handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of keys.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{AnalysisError, Result};

/// A provider API key that won't be logged or displayed.
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Read the key from an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self::new(value)),
            _ => Err(AnalysisError::config(format!("{var} not set"))),
        }
    }

    /// Expose the key for use.
    ///
    /// Only call this when building a request header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_in_debug_or_display() {
        let key = ApiKey::new("sk-ant-super-secret");
        assert_eq!(format!("{key:?}"), "[REDACTED]");
        assert_eq!(format!("{key}"), "[REDACTED]");
        assert_eq!(key.expose(), "sk-ant-super-secret");
    }

    #[test]
    fn test_missing_env_var_is_config_error() {
        let result = ApiKey::from_env("CASE_ANALYSIS_TEST_UNSET_KEY");
        assert!(matches!(result, Err(AnalysisError::Config { .. })));
    }
}
