//! Input literal encoder.
//!
//! Turns named parameters into GraphQL argument text:
//!
//! ```text
//! id: "abcd", in: { name: "rex", tags: ["a", "b"] }, limit: 20
//! ```
//!
//! Parameters are always written in sorted name order so the same input gives
//! byte-identical text.

use std::collections::BTreeMap;

use crate::error::{EncodeError, EncodeResult};
use crate::value::{InputValue, ToInput};

/// Options controlling input encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Treat zero values (`""`, `0`, `false`, `None`, empty sequences, all-zero
    /// records) as absent. Note that this also drops a deliberate `false` or `0`.
    pub suppress_zero_values: bool,
}

impl EncoderOptions {
    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            suppress_zero_values: false,
        }
    }

    /// Sets zero value suppression.
    #[must_use]
    pub const fn suppress_zero_values(mut self, suppress: bool) -> Self {
        self.suppress_zero_values = suppress;
        self
    }
}

/// Named parameters of an operation, kept in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationInput {
    params: BTreeMap<String, InputValue>,
}

impl OperationInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToInput) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToInput) -> Option<InputValue> {
        self.params.insert(name.into(), value.to_input())
    }

    /// Returns the value of a parameter.
    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.params.get(name)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates parameters in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: ToInput> FromIterator<(K, V)> for OperationInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = Self::new();
        for (name, value) in iter {
            input.insert(name, value);
        }
        input
    }
}

/// Encodes all parameters as `name: literal` pairs joined by `, `.
///
/// Each parameter must produce some output: a parameter that resolves to
/// nothing, or whose value has no literal form, is an error naming it.
pub fn encode_input(input: &OperationInput, options: &EncoderOptions) -> EncodeResult<String> {
    let mut pairs = Vec::with_capacity(input.len());

    for (name, value) in input.iter() {
        if let InputValue::Unsupported(kind) = value {
            return Err(EncodeError::UnsupportedParameter {
                name: name.to_string(),
                kind: *kind,
            });
        }

        let literal = encode_value(value, options)
            .map_err(|e| e.in_parameter(name))?
            .ok_or_else(|| EncodeError::AbsentParameter {
                name: name.to_string(),
            })?;

        pairs.push(format!("{name}: {literal}"));
    }

    Ok(pairs.join(", "))
}

/// Encodes a single value as a bare literal.
///
/// Returns `Ok(None)` when the value is absent and contributes no text.
pub fn encode_value(value: &InputValue, options: &EncoderOptions) -> EncodeResult<Option<String>> {
    if options.suppress_zero_values && value.is_zero() {
        return Ok(None);
    }

    let literal = match value {
        InputValue::Int(v) => v.to_string(),
        InputValue::UInt(v) => v.to_string(),
        InputValue::Float32(v) if v.is_finite() => format!("{v:.8}"),
        InputValue::Float64(v) if v.is_finite() => format!("{v:.20}"),
        // No literal for NaN or infinities.
        InputValue::Float32(_) | InputValue::Float64(_) => return Ok(None),
        InputValue::String(v) => serde_json::to_string(v)?,
        InputValue::Bool(v) => v.to_string(),
        InputValue::Enum(name) => (*name).to_string(),
        InputValue::Optional(None) => return Ok(None),
        InputValue::Optional(Some(inner)) => return encode_value(inner, options),
        InputValue::Record(fields) => return encode_record(fields, options),
        InputValue::List(None) => return Ok(None),
        InputValue::List(Some(items)) => encode_list(items, options)?,
        InputValue::Map(None) => return Ok(None),
        InputValue::Map(Some(entries)) => return encode_map(entries, options),
        InputValue::Unsupported(_) => return Ok(None),
    };

    Ok(Some(literal))
}

fn encode_record(
    fields: &[(&'static str, InputValue)],
    options: &EncoderOptions,
) -> EncodeResult<Option<String>> {
    let mut written = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        if let Some(literal) = encode_value(value, options)? {
            written.push(format!("{name}: {literal}"));
        }
    }

    if written.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!("{{ {} }}", written.join(", "))))
}

fn encode_list(items: &[InputValue], options: &EncoderOptions) -> EncodeResult<String> {
    let mut written = Vec::with_capacity(items.len());
    for item in items {
        // Absent elements are dropped, never written as null.
        if let Some(literal) = encode_value(item, options)? {
            written.push(literal);
        }
    }
    Ok(format!("[{}]", written.join(", ")))
}

fn encode_map(
    entries: &[(InputValue, InputValue)],
    options: &EncoderOptions,
) -> EncodeResult<Option<String>> {
    let mut keyed = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match key {
            InputValue::String(key) => keyed.push((key.as_str(), value)),
            other => return Err(EncodeError::UnsupportedMapKey { kind: other.kind() }),
        }
    }
    keyed.sort_by(|a, b| a.0.cmp(b.0));

    if keyed.is_empty() {
        return Ok(Some("{}".to_string()));
    }

    let mut written = Vec::with_capacity(keyed.len());
    for (key, value) in keyed {
        // One absent value makes the whole map absent.
        let Some(literal) = encode_value(value, options)? else {
            return Ok(None);
        };
        written.push(format!("{key}: {literal}"));
    }
    Ok(Some(format!("{{ {} }}", written.join(", "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn encode(input: &OperationInput) -> String {
        encode_input(input, &EncoderOptions::default()).unwrap()
    }

    fn encode_suppressed(input: &OperationInput) -> EncodeResult<String> {
        encode_input(input, &EncoderOptions::new().suppress_zero_values(true))
    }

    fn record(fields: Vec<(&'static str, InputValue)>) -> InputValue {
        InputValue::Record(fields)
    }

    #[test]
    fn test_sorted_parameters() {
        let input = OperationInput::new()
            .with("limit", 20)
            .with("id", "abcd-efgh")
            .with("in", true);
        assert_eq!(encode(&input), r#"id: "abcd-efgh", in: true, limit: 20"#);
    }

    #[test]
    fn test_deterministic_output() {
        let mut map = HashMap::new();
        for key in ["zeta", "alpha", "mid", "beta", "omega"] {
            map.insert(key.to_string(), key.len());
        }
        let input = OperationInput::new().with("m", map.clone()).with("a", 1);
        let first = encode(&input);
        let second = encode(&OperationInput::new().with("a", 1).with("m", map));
        assert_eq!(first, second);
        assert_eq!(
            first,
            "a: 1, m: { alpha: 5, beta: 4, mid: 3, omega: 5, zeta: 4 }"
        );
    }

    #[test]
    fn test_float_precision() {
        let input = OperationInput::new()
            .with("narrow", vec![21.2_f32, 64.3534])
            .with("wide", 20.000203_f64);
        assert_eq!(
            encode(&input),
            "narrow: [21.20000076, 64.35340118], wide: 20.00020299999999906504"
        );
    }

    #[test]
    fn test_string_escaping() {
        let input = OperationInput::new().with("s", "say \"hi\"\n\\");
        assert_eq!(encode(&input), r#"s: "say \"hi\"\n\\""#);
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let value = record(vec![
            ("StringField", InputValue::String("test".into())),
            ("IntField", InputValue::Int(3)),
            ("StringPtrField", InputValue::none()),
            ("BoolField", InputValue::Bool(false)),
        ]);
        let input = OperationInput::new().with("in", value);
        assert_eq!(
            encode(&input),
            r#"in: { StringField: "test", IntField: 3, BoolField: false }"#
        );
    }

    #[test]
    fn test_list_drops_absent_elements() {
        let input = OperationInput::new()
            .with("pointers", vec![Some(1), None, Some(3)])
            .with("empty", Vec::<i32>::new());
        assert_eq!(encode(&input), "empty: [], pointers: [1, 3]");
    }

    #[test]
    fn test_enum_written_bare() {
        let input = OperationInput::new().with("color", InputValue::Enum("RED"));
        assert_eq!(encode(&input), "color: RED");
    }

    #[test]
    fn test_map_with_absent_value_is_absent() {
        let mut pointers: HashMap<String, Option<i32>> = HashMap::new();
        pointers.insert("k2".into(), None);
        let value = record(vec![
            ("PointersMap", pointers.to_input()),
            ("Name", InputValue::String("x".into())),
        ]);
        let input = OperationInput::new().with("in", value);
        assert_eq!(encode(&input), r#"in: { Name: "x" }"#);
    }

    #[test]
    fn test_non_string_map_key_fails() {
        let mut map = HashMap::new();
        map.insert(10_i32, "ten");
        let value = record(vec![("Map", map.to_input())]);
        let err = encode_input(&OperationInput::new().with("in", value), &EncoderOptions::default())
            .unwrap_err();
        match err {
            EncodeError::Parameter { ref name, ref source } => {
                assert_eq!(name, "in");
                assert!(matches!(**source, EncodeError::UnsupportedMapKey { kind: "int" }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_char_map_key_fails() {
        let map = HashMap::from([('k', true)]);
        let err = encode_input(&OperationInput::new().with("in", map), &EncoderOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::Parameter { ref source, .. }
                if matches!(**source, EncodeError::UnsupportedMapKey { kind: "int" })
        ));
    }

    #[test]
    fn test_absent_parameter_fails() {
        let input = OperationInput::new().with("test", "test").with("object", None::<i32>);
        let err = encode_input(&input, &EncoderOptions::default()).unwrap_err();
        assert!(matches!(err, EncodeError::AbsentParameter { ref name } if name == "object"));
    }

    #[test]
    fn test_unsupported_parameter_fails() {
        let input = OperationInput::new().with("unit", ());
        let err = encode_input(&input, &EncoderOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::UnsupportedParameter { kind: "unit", .. }
        ));
    }

    #[test]
    fn test_nested_unsupported_is_absent() {
        let value = record(vec![
            ("a", InputValue::Int(1)),
            ("b", InputValue::Unsupported("fn")),
            ("c", InputValue::Float64(f64::NAN)),
        ]);
        assert_eq!(encode(&OperationInput::new().with("in", value)), "in: { a: 1 }");
    }

    #[test]
    fn test_suppress_zero_values() {
        let inner = record(vec![
            ("StringField", InputValue::String(String::new())),
            ("IntField", InputValue::Int(0)),
            ("BoolField", InputValue::Bool(false)),
        ]);
        let value = record(vec![
            ("StringField", InputValue::String("test".into())),
            ("IntField", InputValue::Int(0)),
            ("SimpleStructField", inner),
            ("SliceField", InputValue::List(Some(vec![]))),
        ]);
        let input = OperationInput::new().with("in", value);
        assert_eq!(encode_suppressed(&input).unwrap(), r#"in: { StringField: "test" }"#);
    }

    #[test]
    fn test_suppress_zero_values_on_pointee() {
        let input = OperationInput::new()
            .with("a", Some(0))
            .with("b", Some(2));
        assert!(matches!(
            encode_suppressed(&input),
            Err(EncodeError::AbsentParameter { ref name }) if name == "a"
        ));
        assert_eq!(
            encode_suppressed(&OperationInput::new().with("b", Some(2))).unwrap(),
            "b: 2"
        );
    }

    #[test]
    fn test_all_zero_only_parameter_fails() {
        let value = record(vec![
            ("StringField", InputValue::String(String::new())),
            ("IntField", InputValue::Int(0)),
        ]);
        let err = encode_suppressed(&OperationInput::new().with("in", value)).unwrap_err();
        assert!(matches!(err, EncodeError::AbsentParameter { ref name } if name == "in"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode(&OperationInput::new()), "");
    }

    #[test]
    fn test_from_iterator() {
        let input: OperationInput = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(encode(&input), "a: 1, b: 2");
    }
}
