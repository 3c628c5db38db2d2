//! Operation text builder.

use std::fmt;
use std::marker::PhantomData;

use crate::error::EncodeResult;
use crate::input::{encode_input, EncoderOptions, OperationInput};
use crate::path::NestedOperationInput;
use crate::selection::encode_selection_with;
use crate::shape::Shape;

/// Alias under which every operation's payload is requested.
///
/// Aliasing lets the response always be read from `data.result`, whatever the
/// field is called on the server.
pub const RESULT_ALIAS: &str = "result";

/// The kind of GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// Returns the keyword that starts the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-field query or mutation whose selection is requested by `T`.
///
/// # Example
///
/// ```ignore
/// let op = Operation::<Vec<Dog>>::query("dogs")
///     .input(OperationInput::new().with("first", 10))
///     .nested_input(NestedOperationInput::new("owner", "active: true"));
/// ```
pub struct Operation<T: ?Sized> {
    kind: OperationKind,
    name: String,
    input: OperationInput,
    nested_inputs: Vec<NestedOperationInput>,
    _shape: PhantomData<fn() -> Box<T>>,
}

impl<T: Shape + ?Sized> Operation<T> {
    /// Creates an operation of the given kind.
    pub fn new(kind: OperationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            input: OperationInput::new(),
            nested_inputs: Vec::new(),
            _shape: PhantomData,
        }
    }

    /// Creates a query.
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(OperationKind::Query, name)
    }

    /// Creates a mutation.
    pub fn mutation(name: impl Into<String>) -> Self {
        Self::new(OperationKind::Mutation, name)
    }

    /// Sets the arguments of the operation field.
    #[must_use]
    pub fn input(mut self, input: OperationInput) -> Self {
        self.input = input;
        self
    }

    /// Adds arguments for a nested field.
    #[must_use]
    pub fn nested_input(mut self, nested: NestedOperationInput) -> Self {
        self.nested_inputs.push(nested);
        self
    }

    /// Returns the operation kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the operation field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the operation text.
    ///
    /// The output has the form
    /// `query { result: name(arg: literal) { field ... } }`; the argument list
    /// is left out when there are no arguments and the selection set when `T`
    /// is a leaf.
    pub fn to_query_string(&self, options: &EncoderOptions) -> EncodeResult<String> {
        let arguments = encode_input(&self.input, options)?;
        let selection = encode_selection_with::<T>(&self.nested_inputs)?;

        let mut text = format!("{} {{ {RESULT_ALIAS}: {}", self.kind, self.name);
        if !arguments.is_empty() {
            text.push('(');
            text.push_str(&arguments);
            text.push(')');
        }
        if !selection.is_empty() {
            text.push(' ');
            text.push_str(&selection);
        }
        text.push_str(" }");

        Ok(text)
    }
}

impl<T: ?Sized> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            name: self.name.clone(),
            input: self.input.clone(),
            nested_inputs: self.nested_inputs.clone(),
            _shape: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("input", &self.input)
            .field("nested_inputs", &self.nested_inputs)
            .finish()
    }
}
