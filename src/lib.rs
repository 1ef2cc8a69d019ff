// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod observability;
pub mod router;

// Re-exports
pub use client::{ApiResponse, DeepSeek};
pub use client_logger::ClientLogger;
pub use config::{ClientConfig, EnvToken, StaticToken, TokenProvider};
pub use error::{Error, Result};
pub use interceptor::{AuthInterceptor, Interceptor};
pub use router::{History, Resolution, RouteEntry, Router};
