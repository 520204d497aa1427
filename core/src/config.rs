//! Client configuration.
//!
//! The base address is handed to `TodoClient` at construction; nothing in
//! the client reads globals. `from_env` is a convenience for binaries.

/// Production address of the todo service.
pub const DEFAULT_BASE_URL: &str = "https://wpifxnmfmpef.sealoshzh.site/api";

/// Environment variable overriding the base address.
pub const BASE_URL_ENV: &str = "TODO_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `TODO_API_BASE_URL`, falling back to `DEFAULT_BASE_URL` when it
    /// is unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_when_unset() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = ClientConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn override_is_trimmed() {
        let config = ClientConfig::from_lookup(|key| {
            assert_eq!(key, BASE_URL_ENV);
            Some(" http://127.0.0.1:3000 ".to_string())
        });
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
    }
}
