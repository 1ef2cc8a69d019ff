//! Request interceptors.
//!
//! An interceptor is a composable transformation applied to the header set
//! of every outgoing request before dispatch. The signature only hands out
//! the headers, so an interceptor cannot touch the URL or body.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::TokenProvider;
use crate::error::{Error, Result};

/// A hook that mutates the outgoing header set before a request is sent.
///
/// Interceptors run in registration order. A later interceptor sees the
/// headers left behind by earlier ones and may overwrite them; the client's
/// built-in [`AuthInterceptor`] runs last, so its values win over anything
/// a caller supplied.
pub trait Interceptor: Send + Sync {
    /// Applies this interceptor to the outgoing headers.
    fn intercept(&self, headers: &mut HeaderMap) -> Result<()>;
}

impl<F> Interceptor for F
where
    F: Fn(&mut HeaderMap) -> Result<()> + Send + Sync,
{
    fn intercept(&self, headers: &mut HeaderMap) -> Result<()> {
        self(headers)
    }
}

/// Injects `Authorization: Bearer <token>` and `Content-Type: application/json`
/// into every outgoing request.
///
/// The token is read from the [`TokenProvider`] on every call, never cached,
/// so a rotated credential takes effect on the next request.
pub struct AuthInterceptor {
    token: Arc<dyn TokenProvider>,
}

impl AuthInterceptor {
    /// Creates an interceptor backed by the given token provider.
    pub fn new(token: Arc<dyn TokenProvider>) -> Self {
        Self { token }
    }
}

impl Interceptor for AuthInterceptor {
    fn intercept(&self, headers: &mut HeaderMap) -> Result<()> {
        let token = self.token.token()?;
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::authentication("API key contains invalid header characters"))?;
        // insert() replaces caller-supplied values; the interceptor wins.
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticToken;

    fn apply(interceptor: &dyn Interceptor, headers: &mut HeaderMap) {
        interceptor.intercept(headers).unwrap();
    }

    #[test]
    fn injects_bearer_and_content_type() {
        let interceptor = AuthInterceptor::new(Arc::new(StaticToken::new("abc123")));
        let mut headers = HeaderMap::new();
        apply(&interceptor, &mut headers);
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc123");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn interceptor_value_wins_over_caller_headers() {
        let interceptor = AuthInterceptor::new(Arc::new(StaticToken::new("abc123")));
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        apply(&interceptor, &mut headers);
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc123");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers.get_all(header::CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn token_read_fresh_per_request() {
        use crate::error::Result;
        use std::sync::Mutex;

        struct Rotating {
            current: Mutex<String>,
        }

        impl TokenProvider for Rotating {
            fn token(&self) -> Result<String> {
                Ok(self.current.lock().unwrap().clone())
            }
        }

        let provider = Arc::new(Rotating {
            current: Mutex::new("abc123".to_string()),
        });
        let interceptor = AuthInterceptor::new(provider.clone());

        let mut headers = HeaderMap::new();
        apply(&interceptor, &mut headers);
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc123");

        *provider.current.lock().unwrap() = "xyz789".to_string();
        let mut headers = HeaderMap::new();
        apply(&interceptor, &mut headers);
        assert_eq!(headers[header::AUTHORIZATION], "Bearer xyz789");
    }

    #[test]
    fn closure_interceptor_composes() {
        let tag = |headers: &mut HeaderMap| -> Result<()> {
            headers.insert("x-client", HeaderValue::from_static("deepchat"));
            Ok(())
        };
        let mut headers = HeaderMap::new();
        apply(&tag, &mut headers);
        assert_eq!(headers["x-client"], "deepchat");
    }

    #[test]
    fn bad_token_is_authentication_error() {
        let interceptor = AuthInterceptor::new(Arc::new(StaticToken::new("line\nbreak")));
        let mut headers = HeaderMap::new();
        let err = interceptor.intercept(&mut headers).unwrap_err();
        assert!(err.is_auth());
    }
}
