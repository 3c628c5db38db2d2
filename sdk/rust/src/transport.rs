//! Request transport.
//!
//! [`Transport`] is the seam between the client and the network. The default
//! [`HttpTransport`] speaks HTTP/1.1 over a plain TCP connection using hyper;
//! tests and embedders can plug in anything that turns a request into a
//! response.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::HOST;
use http::{HeaderValue, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Boxed error returned by transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Default deadline for one round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends one HTTP request and collects the full response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the round-trip.
    ///
    /// Implementations should give up when `cancel` fires.
    async fn send(
        &self,
        request: http::Request<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, BoxError>;
}

/// HTTP/1.1 transport over a fresh TCP connection per request.
///
/// Only `http://` endpoints are supported.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpTransport {
    /// Creates a transport with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline for the whole exchange.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: http::Request<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, BoxError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err("request cancelled".into()),
            result = tokio::time::timeout(self.timeout, round_trip(request)) => match result {
                Ok(response) => response,
                Err(_) => Err(format!("request timed out after {:?}", self.timeout).into()),
            },
        }
    }
}

async fn round_trip(request: http::Request<Bytes>) -> Result<http::Response<Bytes>, BoxError> {
    let (mut parts, body) = request.into_parts();
    let uri = parts.uri.clone();

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            return Err(format!("unsupported URL scheme `{other}`, only http is supported").into())
        }
        None => return Err("request URL has no scheme".into()),
    }
    let host = connect_host(uri.host().ok_or("request URL has no host")?);
    let port = uri.port_u16().unwrap_or(80);

    let stream = TcpStream::connect((host, port)).await?;
    let (mut sender, connection) =
        hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            debug!("connection error: {err}");
        }
    });

    // HTTP/1.1 wants origin-form plus a Host header.
    let path = uri.path_and_query().map_or("/", |p| p.as_str());
    parts.uri = path.parse::<Uri>()?;
    if !parts.headers.contains_key(HOST) {
        if let Some(authority) = uri.authority() {
            parts.headers.insert(HOST, HeaderValue::from_str(authority.as_str())?);
        }
    }

    let response = sender
        .send_request(http::Request::from_parts(parts, Full::new(body)))
        .await?;
    let (parts, body) = response.into_parts();
    let body = body.collect().await?.to_bytes();

    Ok(http::Response::from_parts(parts, body))
}

/// Strips the brackets `Uri::host` keeps around IPv6 literals.
fn connect_host(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}
