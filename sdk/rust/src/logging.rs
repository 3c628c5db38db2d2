//! Request logging hook.
//!
//! The client passes each outgoing request and each raw response to a
//! [`Logger`]. Hooks only observe; they cannot alter or abort a call.

/// Receives human-readable request and response dumps.
pub trait Logger: Send + Sync {
    /// Records one message.
    fn log(&self, message: &str);
}

/// Discards every message. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _message: &str) {}
}

/// Forwards messages to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::debug!(target: "gqlmap_sdk::wire", "{message}");
    }
}

impl<F> Logger for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message);
    }
}
