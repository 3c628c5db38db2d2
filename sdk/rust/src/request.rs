//! Outgoing GraphQL requests.

use bytes::Bytes;
use gqlmap_core::{EncoderOptions, Operation, Shape};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::Serialize;

use crate::error::{ErrorCode, ResultExt, SdkResult};

/// Media type sent as both `Content-Type` and `Accept`.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A GraphQL request: the query text plus the headers to send with it.
#[derive(Debug, Clone, Default)]
pub struct Request {
    query: String,
    headers: HeaderMap,
}

/// Wire body of a request.
#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    variables: Option<serde_json::Value>,
}

impl Request {
    /// Creates a request from hand-written query text.
    pub fn raw(query: impl Into<String>, headers: &[HeaderMap]) -> Self {
        Self {
            query: query.into(),
            headers: merge_headers(headers),
        }
    }

    /// Renders an operation into a request.
    pub fn from_operation<T: Shape + ?Sized>(
        operation: &Operation<T>,
        options: &EncoderOptions,
        headers: &[HeaderMap],
    ) -> SdkResult<Self> {
        Ok(Self::raw(operation.to_query_string(options)?, headers))
    }

    /// Appends a header value, keeping any existing values under the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Returns the query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Puts `defaults` ahead of this request's own headers.
    pub(crate) fn with_defaults(self, defaults: &HeaderMap) -> Self {
        if defaults.is_empty() {
            return self;
        }
        Self {
            query: self.query,
            headers: merge_headers([defaults, &self.headers]),
        }
    }

    /// Serializes the wire body.
    pub fn body(&self) -> SdkResult<Bytes> {
        let body = RequestBody {
            query: &self.query,
            operation_name: "",
            variables: None,
        };
        serde_json::to_vec(&body)
            .map(Bytes::from)
            .map_sdk_err(ErrorCode::Encoding)
    }

    /// Builds the HTTP request that carries this GraphQL request.
    ///
    /// The method is `POST`; `Content-Type` and `Accept` are always JSON,
    /// replacing any caller-supplied values.
    pub fn to_http_request(&self, uri: &Uri) -> SdkResult<http::Request<Bytes>> {
        let mut request = http::Request::builder()
            .method(Method::POST)
            .uri(uri.clone())
            .body(self.body()?)
            .map_sdk_err(ErrorCode::InvalidUrl)?;

        let headers = request.headers_mut();
        headers.extend(self.headers.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        Ok(request)
    }
}

/// Merges header maps in order, appending values that share a name.
pub fn merge_headers<'a>(maps: impl IntoIterator<Item = &'a HeaderMap>) -> HeaderMap {
    let mut merged = HeaderMap::new();
    for map in maps {
        for (name, value) in map {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}
