//! Client configuration and bearer-token provision.
//!
//! The configuration is built once at startup and shared read-only by every
//! request for the lifetime of the process. The token is deliberately *not*
//! part of the frozen state: it is fetched from a [`TokenProvider`] at
//! request time, so rotating the credential does not require a restart.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default base URL for the DeepSeek API. Deployments that proxy same-origin
/// requests to the backend override this with their own origin.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/";

/// Environment variable consulted for the API key when none is supplied.
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Default per-request timeout. Model generation can run a very long time,
/// so the deadline is 1,500,000 ms (25 minutes); callers wanting to bail out
/// earlier should use the cancellable request path.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1_500_000);

/// A source of bearer tokens, consulted once per outgoing request.
///
/// Implementations must return the *current* credential on every call;
/// the client never caches the returned value.
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token.
    fn token(&self) -> Result<String>;
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Creates a provider backed by the default `DEEPSEEK_API_KEY` variable.
    pub fn new() -> Self {
        Self::var(API_KEY_ENV)
    }

    /// Creates a provider backed by a custom environment variable.
    pub fn var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Result<String> {
        env::var(&self.var).map_err(|_| {
            Error::authentication(format!(
                "API key not provided and {} environment variable not set",
                self.var
            ))
        })
    }
}

/// A fixed token, useful for tests and for callers that manage the secret
/// themselves.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Creates a provider that always returns the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

// The token is a secret; keep it out of Debug output.
impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken").field("token", &"<redacted>").finish()
    }
}

/// Request configuration shared by all calls through a client.
///
/// Constructed once, immutable thereafter; the only per-request variation
/// happens in the interceptor chain.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL that request paths are resolved against.
    pub base_url: String,
    /// Client-side deadline applied to every request.
    pub timeout: Duration,
    /// Source of the bearer token, consulted per request.
    pub token: Arc<dyn TokenProvider>,
}

impl ClientConfig {
    /// Creates a configuration with the default base URL, default timeout,
    /// and the environment-backed token provider.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token: Arc::new(EnvToken::new()),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the token provider.
    pub fn with_token(mut self, token: Arc<dyn TokenProvider>) -> Self {
        self.token = token;
        self
    }

    /// Sets a fixed token, shorthand for `with_token(Arc::new(StaticToken::new(..)))`.
    pub fn with_static_token(self, token: impl Into<String>) -> Self {
        self.with_token(Arc::new(StaticToken::new(token)))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn default_config() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.timeout.as_millis(), 1_500_000);
    }

    #[test]
    fn builder_pattern() {
        let config = ClientConfig::new()
            .with_base_url("http://localhost:8080/")
            .with_timeout(Duration::from_secs(30))
            .with_static_token("test-token");
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.token.token().unwrap(), "test-token");
    }

    #[test]
    fn static_token_debug_redacts() {
        let provider = StaticToken::new("sk-very-secret");
        let debug = format!("{provider:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn provider_is_consulted_per_call() {
        struct Rotating {
            current: Mutex<String>,
        }

        impl TokenProvider for Rotating {
            fn token(&self) -> Result<String> {
                Ok(self.current.lock().unwrap().clone())
            }
        }

        let provider = Rotating {
            current: Mutex::new("first".to_string()),
        };
        assert_eq!(provider.token().unwrap(), "first");
        *provider.current.lock().unwrap() = "second".to_string();
        assert_eq!(provider.token().unwrap(), "second");
    }

    #[test]
    fn env_token_missing_is_authentication_error() {
        let provider = EnvToken::var("DEEPCHAT_TEST_UNSET_VARIABLE");
        let err = provider.token().unwrap_err();
        assert!(err.is_auth());
    }
}
