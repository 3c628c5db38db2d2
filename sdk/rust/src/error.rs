//! Typed error system for the gqlmap client.
//!
//! Every failure carries an [`ErrorCode`] so callers can branch on the cause
//! without matching message text.

use gqlmap_core::EncodeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Typed error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    /// The caller's cancellation token fired before the request went out.
    Cancelled,
    /// The operation could not be rendered to text.
    Encoding,
    /// The endpoint URL is not usable.
    InvalidUrl,
    /// The round-trip failed or returned an unexpected status.
    Transport,
    /// The server answered with GraphQL errors.
    Server,
    /// The response body or payload did not decode.
    Decode,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::Encoding => "ENCODING",
            Self::InvalidUrl => "INVALID_URL",
            Self::Transport => "TRANSPORT",
            Self::Server => "SERVER",
            Self::Decode => "DECODE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to an underlying cause.
pub type ErrorSource = Arc<dyn StdError + Send + Sync>;

/// Strongly typed SDK error.
#[derive(Error, Debug, Clone)]
#[error("[{code}] {message}")]
pub struct SdkError {
    /// Typed error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Underlying cause.
    #[source]
    pub source: Option<ErrorSource>,
    /// Structured details, such as the response status and body.
    pub extensions: Option<HashMap<String, serde_json::Value>>,
}

impl SdkError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
            extensions: None,
        }
    }

    /// Adds a source error.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        self.source = Some(Arc::from(source.into()));
        self
    }

    /// Adds extension data.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let extensions = self.extensions.get_or_insert_with(HashMap::new);
        if let Ok(v) = serde_json::to_value(value) {
            extensions.insert(key.into(), v);
        }
        self
    }

    /// Returns an extension value.
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.as_ref()?.get(key)
    }

    // Convenience constructors

    /// Creates a cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorCode::Cancelled, "request cancelled")
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidUrl, message)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Server, message)
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Decode, message)
    }

    /// Returns true if the caller's token cancelled the request.
    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::Cancelled
    }
}

impl From<EncodeError> for SdkError {
    fn from(err: EncodeError) -> Self {
        Self::new(ErrorCode::Encoding, err.to_string()).with_source(err)
    }
}

impl Serialize for SdkError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SdkError", 3)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        if let Some(ref ext) = self.extensions {
            state.serialize_field("extensions", ext)?;
        }
        state.end()
    }
}

/// Type alias for SDK results.
pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Result extension for mapping errors with context.
pub trait ResultExt<T> {
    /// Maps the error to an `SdkError` with the given code, keeping it as the source.
    fn map_sdk_err(self, code: ErrorCode) -> SdkResult<T>;

    /// Maps the error to an `SdkError` with the given code and message.
    fn map_sdk_err_with(self, code: ErrorCode, message: impl Into<String>) -> SdkResult<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    fn map_sdk_err(self, code: ErrorCode) -> SdkResult<T> {
        self.map_err(|e| {
            let source = e.into();
            SdkError::new(code, source.to_string()).with_source(source)
        })
    }

    fn map_sdk_err_with(self, code: ErrorCode, message: impl Into<String>) -> SdkResult<T> {
        self.map_err(|e| SdkError::new(code, message).with_source(e))
    }
}
