//! Core mapping between typed Rust values and GraphQL text.
//!
//! This crate provides the pure, transport-free half of gqlmap:
//! - `shape`: Type-level field descriptors used to build selection sets
//! - `value`: The `InputValue` union and the `ToInput` capability
//! - `selection`: Selection set encoder
//! - `input`: Input literal encoder
//! - `path`: Field paths and nested operation inputs
//! - `operation`: Query/mutation text builder
//!
//! # Example
//!
//! ```ignore
//! use gqlmap_core::{Operation, OperationInput, Shape, ToInput, EncoderOptions};
//!
//! #[derive(Shape)]
//! struct Dog {
//!     id: String,
//!     #[gql(rename = "breedName")]
//!     breed_name: String,
//! }
//!
//! let op = Operation::<Dog>::query("dog").input(OperationInput::new().with("id", "abc"));
//! let text = op.to_query_string(&EncoderOptions::default())?;
//! assert_eq!(text, r#"query { result: dog(id: "abc") { id breedName } }"#);
//! ```

// Lets the derive output (which names `::gqlmap_core`) resolve inside this crate.
extern crate self as gqlmap_core;

pub mod error;
pub mod input;
pub mod operation;
pub mod path;
pub mod selection;
pub mod shape;
pub mod value;

pub use error::{EncodeError, EncodeResult};
pub use input::{encode_input, encode_value, EncoderOptions, OperationInput};
pub use operation::{Operation, OperationKind, RESULT_ALIAS};
pub use path::{FieldPath, NestedOperationInput};
pub use selection::{encode_selection, encode_selection_with, MAX_SELECTION_DEPTH};
pub use shape::{FieldDescriptor, Shape, ShapeDescriptor};
pub use value::{InputValue, ToInput};

// Derive macros share names with the traits they implement.
pub use gqlmap_macros::{Shape, ToInput};
