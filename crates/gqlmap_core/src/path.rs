//! Field paths and nested operation inputs.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::EncodeResult;
use crate::input::{encode_input, EncoderOptions, OperationInput};

const SEPARATOR: char = '.';

/// A dot-delimited path to a field in a selection tree, relative to its root.
///
/// Paths built while walking a selection start with a separator (`.dog.owner`),
/// paths written by hand usually do not (`dog.owner`); both compare equal.
#[derive(Debug, Clone, Default, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Creates a path from its textual form.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path extended by one field name.
    #[must_use]
    pub fn append(&self, name: &str) -> Self {
        Self(format!("{}{SEPARATOR}{name}", self.0))
    }

    /// Returns true if any of `others` names the same field.
    pub fn matches<'a>(&self, others: impl IntoIterator<Item = &'a FieldPath>) -> bool {
        others.into_iter().any(|other| self == other)
    }

    /// Returns the path with one leading separator removed.
    pub fn trimmed(&self) -> &str {
        self.0.strip_prefix(SEPARATOR).unwrap_or(&self.0)
    }

    /// Returns the raw textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.trimmed() == other.trimmed()
    }
}

impl Hash for FieldPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trimmed().hash(state);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Arguments for a nested field of the selection.
///
/// `input` is an already encoded argument list such as
/// `first: 10, filter: { name: "rex" }`, typically produced by [`encode_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedOperationInput {
    /// Path of the field the arguments belong to.
    pub field_path: FieldPath,
    /// Encoded argument list, without parentheses.
    pub input: String,
}

impl NestedOperationInput {
    /// Creates a nested input from a pre-encoded argument list.
    pub fn new(field_path: impl Into<FieldPath>, input: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            input: input.into(),
        }
    }

    /// Creates a nested input by encoding `input` with the given options.
    pub fn encode(
        field_path: impl Into<FieldPath>,
        input: &OperationInput,
        options: &EncoderOptions,
    ) -> EncodeResult<Self> {
        Ok(Self::new(field_path, encode_input(input, options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_from_root() {
        let path = FieldPath::root().append("dog").append("owner");
        assert_eq!(path.as_str(), ".dog.owner");
        assert_eq!(path.trimmed(), "dog.owner");
    }

    #[test]
    fn test_equality_ignores_one_leading_separator() {
        assert_eq!(FieldPath::new(".dog.owner"), FieldPath::new("dog.owner"));
        assert_ne!(FieldPath::new("..dog"), FieldPath::new("dog"));
        assert_ne!(FieldPath::new("dog.owner"), FieldPath::new("dog"));
    }

    #[test]
    fn test_matches_any() {
        let path = FieldPath::new(".owners");
        let candidates = [FieldPath::new("dogs"), FieldPath::new("owners")];
        assert!(path.matches(&candidates));
        assert!(!path.matches(&candidates[..1]));
    }

    #[test]
    fn test_nested_input_encode() {
        let input = OperationInput::new().with("first", 10).with("after", "c1");
        let nested =
            NestedOperationInput::encode("dogs", &input, &EncoderOptions::default()).unwrap();
        assert_eq!(nested.field_path, FieldPath::new(".dogs"));
        assert_eq!(nested.input, r#"after: "c1", first: 10"#);
    }
}
