//! gqlmap SDK
//!
//! A GraphQL client whose operations are derived from Rust types. The type you
//! decode into describes the selection set, and typed values become argument
//! literals, so no query text is written by hand.
//!
//! # Example
//!
//! ```ignore
//! use gqlmap_sdk::{CancellationToken, Client, OperationInput, Shape};
//! use serde::Deserialize;
//!
//! #[derive(Shape, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Dog {
//!     id: String,
//!     breed_name: String,
//! }
//!
//! let client = Client::new("http://localhost:8080/graphql")?;
//! let dogs: Vec<Dog> = client
//!     .query(&CancellationToken::new(), "dogs", OperationInput::new().with("first", 10), &[])
//!     .await?;
//! // sends: query { result: dogs(first: 10) { id breedName } }
//! ```
//!
//! The derive macros expand to `::gqlmap_core` paths, so crates deriving
//! [`Shape`] or [`ToInput`] depend on `gqlmap_core` directly.

pub mod client;
pub mod error;
pub mod logging;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{Client, ClientConfig};
pub use error::{ErrorCode, ErrorSource, ResultExt, SdkError, SdkResult};
pub use logging::{Logger, NoopLogger, TracingLogger};
pub use request::{merge_headers, Request, JSON_CONTENT_TYPE};
pub use response::{GraphQLError, Response};
pub use transport::{BoxError, HttpTransport, Transport, DEFAULT_TIMEOUT};

// Re-exports for convenience
pub use gqlmap_core::{
    encode_input, encode_selection, EncodeError, EncoderOptions, FieldPath, InputValue,
    NestedOperationInput, Operation, OperationInput, OperationKind, Shape, ShapeDescriptor,
    ToInput,
};
pub use tokio_util::sync::CancellationToken;
