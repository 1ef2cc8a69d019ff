//! Logging trait for client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to
//! capture all traffic passing through the [`DeepSeek`](crate::DeepSeek)
//! client. The hook receives methods, paths, and statuses but never the
//! header set, so the bearer token cannot leak into logs.

/// A trait for logging client operations.
///
/// Implement this trait to record every request the client dispatches and
/// every response or failure it observes.
///
/// # Example
///
/// ```rust,ignore
/// use deepchat::ClientLogger;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, method: &str, path: &str) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "-> {} {}", method, path).unwrap();
///     }
///
///     fn log_response(&self, method: &str, path: &str, status: u16) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "<- {} {} {}", method, path, status).unwrap();
///     }
///
///     fn log_failure(&self, method: &str, path: &str, error: &str) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "!! {} {} {}", method, path, error).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request as it leaves the client.
    fn log_request(&self, method: &str, path: &str);

    /// Log the status of a completed request, 2xx or otherwise.
    fn log_response(&self, method: &str, path: &str, status: u16);

    /// Log a request that failed without producing an HTTP status,
    /// such as a timeout, connection failure, or abort.
    fn log_failure(&self, method: &str, path: &str, error: &str);
}
