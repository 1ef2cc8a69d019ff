use std::sync::Arc;
use std::time::Instant;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::interceptor::{AuthInterceptor, Interceptor};
use crate::observability;

/// Client for the DeepSeek API.
///
/// The client is cheap to clone; clones share the same configuration and
/// connection pool. It holds no state between calls beyond that shared
/// read-only configuration, so concurrent requests need no coordination.
#[derive(Clone)]
pub struct DeepSeek {
    config: ClientConfig,
    client: ReqwestClient,
    interceptors: Vec<Arc<dyn Interceptor>>,
    auth: Arc<AuthInterceptor>,
    logger: Option<Arc<dyn ClientLogger>>,
}

/// Status and deserialized body of a successful request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Response body parsed as JSON; `Value::Null` for an empty body.
    pub body: Value,
}

impl DeepSeek {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the
    /// `DEEPSEEK_API_KEY` environment variable. The variable is consulted
    /// at request time rather than here, so a key rotated in the
    /// environment takes effect without rebuilding the client.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let config = match api_key {
            Some(key) => ClientConfig::new().with_static_token(key),
            None => ClientConfig::new(),
        };
        Self::with_config(config)
    }

    /// Create a new client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        let auth = Arc::new(AuthInterceptor::new(config.token.clone()));
        Ok(Self {
            config,
            client,
            interceptors: Vec::new(),
            auth,
            logger: None,
        })
    }

    /// Append a caller-supplied interceptor.
    ///
    /// Caller interceptors run before the built-in authentication
    /// interceptor, which always runs last so its headers win.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Install a logger that observes every request and response.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Resolve a request path against the base URL.
    fn resolve_url(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.config.base_url)?;
        let url = base.join(path)?;
        Ok(url)
    }

    /// Run the interceptor chain over a fresh header set.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for interceptor in &self.interceptors {
            interceptor.intercept(&mut headers)?;
        }
        self.auth.intercept(&mut headers)?;
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // DeepSeek follows the OpenAI error envelope.
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            #[serde(rename = "type")]
            error_type: Option<String>,
            message: Option<String>,
            param: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed_error = serde_json::from_str::<ErrorResponse>(&error_body).ok();
        let error_type = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.error_type.clone());
        let error_message = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| error_body.clone());
        let error_param = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.param.clone());

        match status_code {
            400 => Error::bad_request(error_message, error_param),
            401 => Error::authentication(error_message),
            403 => Error::permission(error_message),
            429 => Error::rate_limit(error_message, retry_after),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, error_type, error_body),
        }
    }

    /// Dispatch a request and return the raw reqwest response on 2xx.
    async fn dispatch(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response> {
        observability::CLIENT_REQUESTS.click();
        let url = self.resolve_url(path)?;
        let headers = self.build_headers()?;

        if let Some(logger) = &self.logger {
            logger.log_request(method.as_str(), path);
        }

        let start = Instant::now();
        let mut builder = self.client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let result = builder.send().await;
        observability::CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            let err = if e.is_timeout() {
                observability::CLIENT_TIMEOUTS.click();
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.config.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            };
            observability::CLIENT_REQUEST_ERRORS.click();
            if let Some(logger) = &self.logger {
                logger.log_failure(method.as_str(), path, &err.to_string());
            }
            err
        })?;

        let status = response.status();
        if let Some(logger) = &self.logger {
            logger.log_response(method.as_str(), path, status.as_u16());
        }

        if !status.is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            let err = Self::process_error_response(response).await;
            if err.is_auth() {
                observability::CLIENT_AUTH_FAILURES.click();
            }
            return Err(err);
        }
        Ok(response)
    }

    /// Map an error raised while reading the response body.
    ///
    /// The client-wide timeout covers the body read too, so a deadline
    /// that fires here must surface as [`Error::Timeout`] exactly as it
    /// does when the send itself times out.
    fn body_read_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            observability::CLIENT_TIMEOUTS.click();
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.config.timeout.as_secs_f64()),
            )
        } else {
            Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
        }
    }

    /// Send a request and return the status and JSON body.
    ///
    /// `path` is resolved relative to the configured base URL; `body`,
    /// when present, is serialized as JSON. Authentication and content-type
    /// headers are injected by the interceptor chain before dispatch.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let response = self.dispatch(method, path, body).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.body_read_error(e))?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })?
        };
        Ok(ApiResponse { status, body })
    }

    /// Send a request and return the raw response body as text.
    ///
    /// This is the pass-through path for endpoints that answer with
    /// streamed or non-JSON text; error mapping is identical to
    /// [`request`](Self::request).
    pub async fn request_text(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String> {
        let response = self.dispatch(method, path, body).await?;
        response.text().await.map_err(|e| self.body_read_error(e))
    }

    /// Send a request, racing it against a cancellation token.
    ///
    /// The long default timeout makes an explicit escape hatch necessary;
    /// cancelling the token fails the call with [`Error::Abort`] without
    /// waiting for the deadline.
    pub async fn request_cancellable(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse> {
        let log_method = method.clone();
        tokio::select! {
            _ = cancel.cancelled() => {
                observability::CLIENT_ABORTS.click();
                if let Some(logger) = &self.logger {
                    logger.log_failure(log_method.as_str(), path, "cancelled by caller");
                }
                Err(Error::abort("request cancelled by caller"))
            }
            result = self.request(method, path, body) => result,
        }
    }

    /// Send a request and deserialize the response body into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let response = self.request(method, path, body).await?;
        serde_json::from_value(response.body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Issue a GET request.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, None).await
    }

    /// Issue a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::POST, path, Some(body)).await
    }
}
