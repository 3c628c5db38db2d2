//! Input values and the `ToInput` capability.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

/// A typed value captured for input literal encoding.
///
/// This is the closed set of kinds the input encoder understands. Every
/// encodable type maps itself onto it through [`ToInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Narrow float, written with 8 fractional digits.
    Float32(f32),
    /// Wide float, written with 20 fractional digits.
    Float64(f64),
    /// String, written quoted.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Enum value, written bare.
    Enum(&'static str),
    /// Optional value; `None` is absent.
    Optional(Option<Box<InputValue>>),
    /// Object with fields in declaration order.
    Record(Vec<(&'static str, InputValue)>),
    /// Sequence; `None` is absent.
    List(Option<Vec<InputValue>>),
    /// Associative map; `None` is absent. Keys must be strings to encode.
    Map(Option<Vec<(InputValue, InputValue)>>),
    /// A value with no literal form, tagged with its kind.
    Unsupported(&'static str),
}

impl InputValue {
    /// Shorthand for a present optional value.
    #[must_use]
    pub fn some(value: InputValue) -> Self {
        Self::Optional(Some(Box::new(value)))
    }

    /// Shorthand for an absent optional value.
    #[must_use]
    pub const fn none() -> Self {
        Self::Optional(None)
    }

    /// Returns the kind name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Enum(_) => "enum",
            Self::Optional(_) => "optional",
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Unsupported(kind) => *kind,
        }
    }

    /// Returns true if this value is the zero value of its kind.
    ///
    /// Empty strings, numeric zero, `false`, `None`, empty sequences and maps
    /// are zero; a record is zero when all of its fields are.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(v) => *v == 0,
            Self::UInt(v) => *v == 0,
            Self::Float32(v) => *v == 0.0,
            Self::Float64(v) => *v == 0.0,
            Self::String(v) => v.is_empty(),
            Self::Bool(v) => !v,
            Self::Optional(v) => v.is_none(),
            Self::Record(fields) => fields.iter().all(|(_, value)| value.is_zero()),
            Self::List(items) => items.as_ref().map_or(true, Vec::is_empty),
            Self::Map(entries) => entries.as_ref().map_or(true, Vec::is_empty),
            Self::Enum(_) | Self::Unsupported(_) => false,
        }
    }
}

/// A value that can be captured as an [`InputValue`].
///
/// Usually derived with `#[derive(ToInput)]`.
pub trait ToInput {
    /// Captures this value.
    fn to_input(&self) -> InputValue;
}

impl ToInput for InputValue {
    fn to_input(&self) -> InputValue {
        self.clone()
    }
}

macro_rules! signed_input {
    ($($ty:ty),*) => {
        $(
            impl ToInput for $ty {
                fn to_input(&self) -> InputValue {
                    InputValue::Int(i64::from(*self))
                }
            }
        )*
    };
}

macro_rules! unsigned_input {
    ($($ty:ty),*) => {
        $(
            impl ToInput for $ty {
                fn to_input(&self) -> InputValue {
                    InputValue::UInt(u64::from(*self))
                }
            }
        )*
    };
}

signed_input!(i8, i16, i32, i64);
unsigned_input!(u8, u16, u32, u64);

// Wider than 64 bits: encoded when the value fits, unsupported otherwise.
macro_rules! wide_input {
    ($($ty:ident => $variant:ident($target:ty)),*) => {
        $(
            impl ToInput for $ty {
                fn to_input(&self) -> InputValue {
                    <$target>::try_from(*self)
                        .map_or(InputValue::Unsupported(stringify!($ty)), InputValue::$variant)
                }
            }
        )*
    };
}

wide_input!(isize => Int(i64), i128 => Int(i64), usize => UInt(u64), u128 => UInt(u64));

impl ToInput for f32 {
    fn to_input(&self) -> InputValue {
        InputValue::Float32(*self)
    }
}

impl ToInput for f64 {
    fn to_input(&self) -> InputValue {
        InputValue::Float64(*self)
    }
}

impl ToInput for bool {
    fn to_input(&self) -> InputValue {
        InputValue::Bool(*self)
    }
}

// A `char` is a code point and encodes as an integer.
impl ToInput for char {
    fn to_input(&self) -> InputValue {
        InputValue::Int(i64::from(u32::from(*self)))
    }
}

impl ToInput for str {
    fn to_input(&self) -> InputValue {
        InputValue::String(self.to_owned())
    }
}

impl ToInput for String {
    fn to_input(&self) -> InputValue {
        InputValue::String(self.clone())
    }
}

impl ToInput for () {
    fn to_input(&self) -> InputValue {
        InputValue::Unsupported("unit")
    }
}

impl<T: ToInput> ToInput for Option<T> {
    fn to_input(&self) -> InputValue {
        InputValue::Optional(self.as_ref().map(|value| Box::new(value.to_input())))
    }
}

macro_rules! delegate_input {
    ($($ty:ty),*) => {
        $(
            impl<T: ToInput + ?Sized> ToInput for $ty {
                fn to_input(&self) -> InputValue {
                    (**self).to_input()
                }
            }
        )*
    };
}

delegate_input!(Box<T>, Arc<T>, Rc<T>, &T, &mut T);

fn list<'a, T: ToInput + 'a>(items: impl IntoIterator<Item = &'a T>) -> InputValue {
    InputValue::List(Some(items.into_iter().map(ToInput::to_input).collect()))
}

impl<T: ToInput> ToInput for [T] {
    fn to_input(&self) -> InputValue {
        list(self)
    }
}

impl<T: ToInput, const N: usize> ToInput for [T; N] {
    fn to_input(&self) -> InputValue {
        list(self)
    }
}

impl<T: ToInput> ToInput for Vec<T> {
    fn to_input(&self) -> InputValue {
        list(self)
    }
}

impl<T: ToInput> ToInput for VecDeque<T> {
    fn to_input(&self) -> InputValue {
        list(self)
    }
}

fn map<'a, K: ToInput + 'a, V: ToInput + 'a>(
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
) -> InputValue {
    InputValue::Map(Some(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_input(), value.to_input()))
            .collect(),
    ))
}

impl<K: ToInput, V: ToInput, S> ToInput for HashMap<K, V, S> {
    fn to_input(&self) -> InputValue {
        map(self)
    }
}

impl<K: ToInput, V: ToInput> ToInput for BTreeMap<K, V> {
    fn to_input(&self) -> InputValue {
        map(self)
    }
}

impl<K: ToInput, V: ToInput, S> ToInput for IndexMap<K, V, S> {
    fn to_input(&self) -> InputValue {
        map(self)
    }
}

impl ToInput for serde_json::Value {
    fn to_input(&self) -> InputValue {
        use serde_json::Value;

        match self {
            Value::Null => InputValue::none(),
            Value::Bool(v) => InputValue::Bool(*v),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    InputValue::Int(v)
                } else if let Some(v) = n.as_u64() {
                    InputValue::UInt(v)
                } else {
                    n.as_f64()
                        .map_or(InputValue::Unsupported("number"), InputValue::Float64)
                }
            }
            Value::String(v) => InputValue::String(v.clone()),
            Value::Array(items) => list(items),
            Value::Object(entries) => InputValue::Map(Some(
                entries
                    .iter()
                    .map(|(key, value)| (InputValue::String(key.clone()), value.to_input()))
                    .collect(),
            )),
        }
    }
}
