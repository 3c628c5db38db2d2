//! gqlmap client.
//!
//! Runs operations derived from Rust types against a GraphQL endpoint:
//!
//! ```ignore
//! use gqlmap_sdk::{Client, CancellationToken, OperationInput};
//!
//! #[derive(Shape, Deserialize)]
//! struct Dog { id: String, name: String }
//!
//! let client = Client::new("http://localhost:8080/graphql")?;
//! let cancel = CancellationToken::new();
//! let dog: Dog = client
//!     .query(&cancel, "dog", OperationInput::new().with("id", "abc"), &[])
//!     .await?;
//! ```
//!
//! Every call is a single request: no retries and no caching. Server errors in
//! the response win over any data that came with them, and a destination passed
//! to an `_into` method is only written when the whole call succeeds.

use bytes::Bytes;
use gqlmap_core::{EncoderOptions, Operation, OperationInput, OperationKind, Shape};
use http::{HeaderMap, HeaderName, HeaderValue, Uri};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ErrorCode, ResultExt, SdkError, SdkResult};
use crate::logging::{Logger, NoopLogger};
use crate::request::Request;
use crate::response::{decode_data, decode_result, read_data};
use crate::transport::{HttpTransport, Transport, DEFAULT_TIMEOUT};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the GraphQL endpoint.
    pub url: String,
    /// Deadline for one round-trip of the default transport.
    pub timeout: Duration,
    /// Headers sent with every request, ahead of per-call headers.
    pub headers: HeaderMap,
    /// Options for rendering operation arguments.
    pub encoder_options: EncoderOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
            encoder_options: EncoderOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a new config with a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the encoder options.
    #[must_use]
    pub fn encoder_options(mut self, options: EncoderOptions) -> Self {
        self.encoder_options = options;
        self
    }

    /// Drops zero values from operation arguments.
    #[must_use]
    pub fn suppress_zero_values(mut self, suppress: bool) -> Self {
        self.encoder_options = self.encoder_options.suppress_zero_values(suppress);
        self
    }
}

/// The gqlmap client.
///
/// Cheap to clone; clones share the transport and the logger.
#[derive(Clone)]
pub struct Client {
    uri: Uri,
    headers: HeaderMap,
    options: EncoderOptions,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn Logger>,
}

impl Client {
    /// Creates a new client for the given URL.
    pub fn new(url: impl Into<String>) -> SdkResult<Self> {
        Self::with_config(ClientConfig::new(url))
    }

    /// Creates a new client with configuration.
    pub fn with_config(config: ClientConfig) -> SdkResult<Self> {
        let uri: Uri = config.url.parse().map_sdk_err_with(
            ErrorCode::InvalidUrl,
            format!("invalid endpoint URL `{}`", config.url),
        )?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(SdkError::invalid_url(format!(
                "endpoint URL `{}` must be absolute",
                config.url
            )));
        }

        Ok(Self {
            uri,
            headers: config.headers,
            options: config.encoder_options,
            transport: Arc::new(HttpTransport::new().timeout(config.timeout)),
            logger: Arc::new(NoopLogger),
        })
    }

    /// Replaces the transport.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Sets the logging hook.
    #[must_use]
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Returns the endpoint.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the encoder options.
    pub fn encoder_options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Sends a raw request and decodes the whole `data` member.
    pub async fn execute<D: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        request: Request,
    ) -> SdkResult<D> {
        let data = self.round_trip(cancel, request).await?;
        decode_data(data)
    }

    /// Like [`Client::execute`], writing into `dest` only on success.
    pub async fn execute_into<D: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        request: Request,
        dest: &mut D,
    ) -> SdkResult<()> {
        *dest = self.execute(cancel, request).await?;
        Ok(())
    }

    /// Runs an operation and decodes its aliased result.
    pub async fn run<T: Shape + DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        operation: Operation<T>,
        headers: &[HeaderMap],
    ) -> SdkResult<T> {
        check_cancelled(cancel)?;
        let request = Request::from_operation(&operation, &self.options, headers)?;
        let data = self.round_trip(cancel, request).await?;
        decode_result(data)
    }

    /// Like [`Client::run`], writing into `dest` only on success.
    pub async fn run_into<T: Shape + DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        operation: Operation<T>,
        dest: &mut T,
        headers: &[HeaderMap],
    ) -> SdkResult<()> {
        *dest = self.run(cancel, operation, headers).await?;
        Ok(())
    }

    /// Runs a query named `name` whose selection is derived from `T`.
    pub async fn query<T: Shape + DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        name: &str,
        input: OperationInput,
        headers: &[HeaderMap],
    ) -> SdkResult<T> {
        let operation = Operation::new(OperationKind::Query, name).input(input);
        self.run(cancel, operation, headers).await
    }

    /// Runs a mutation named `name` whose selection is derived from `T`.
    pub async fn mutate<T: Shape + DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        name: &str,
        input: OperationInput,
        headers: &[HeaderMap],
    ) -> SdkResult<T> {
        let operation = Operation::new(OperationKind::Mutation, name).input(input);
        self.run(cancel, operation, headers).await
    }

    async fn round_trip(
        &self,
        cancel: &CancellationToken,
        request: Request,
    ) -> SdkResult<Option<Value>> {
        check_cancelled(cancel)?;

        let request = request.with_defaults(&self.headers);
        let http_request = request.to_http_request(&self.uri)?;
        self.logger.log(&format!(
            "Executing request\nHeaders: {:?}\nQuery: {}",
            http_request.headers(),
            request.query()
        ));
        debug!(url = %self.uri, "sending GraphQL request");

        let response = self
            .transport
            .send(http_request, cancel)
            .await
            .map_err(|err| {
                warn!(url = %self.uri, error = %err, "GraphQL request failed");
                SdkError::transport(format!("failed to send request: {err}")).with_source(err)
            })?;

        let status = response.status();
        let body: &Bytes = response.body();
        self.logger.log(&format!(
            "Response status: {status}\nBody:\n{}",
            String::from_utf8_lossy(body)
        ));
        debug!(%status, bytes = body.len(), "received GraphQL response");

        read_data(status, body).map_err(|err| {
            warn!(code = %err.code, %status, "GraphQL response rejected");
            err
        })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("uri", &self.uri)
            .field("headers", &self.headers)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn check_cancelled(cancel: &CancellationToken) -> SdkResult<()> {
    if cancel.is_cancelled() {
        return Err(SdkError::cancelled());
    }
    Ok(())
}
