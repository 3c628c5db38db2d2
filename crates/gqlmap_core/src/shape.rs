//! Type-level shape descriptors.
//!
//! A [`Shape`] describes which fields a type requests from the server. It is a
//! property of the type, not of a value: an `Option<Dog>` that is `None` and a
//! `Vec<Dog>` that is empty both request exactly the fields of `Dog`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

/// Structural description of a shape.
#[derive(Debug, Clone)]
pub enum ShapeDescriptor {
    /// A scalar or otherwise opaque value; selected by name only.
    Leaf,
    /// An object with fields in declaration order.
    Record(Vec<FieldDescriptor>),
}

impl ShapeDescriptor {
    /// Returns true if this is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Returns the names of the declared fields; empty for a leaf.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        match self {
            Self::Leaf => Vec::new(),
            Self::Record(fields) => fields.iter().map(|field| field.name).collect(),
        }
    }
}

/// One declared field of a record shape.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Name requested from the server.
    pub name: &'static str,
    /// Produces the field's own shape. Deferred so recursive types stay finite.
    pub shape: fn() -> ShapeDescriptor,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field of shape `T`.
    #[must_use]
    pub fn of<T: Shape + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            shape: T::describe,
        }
    }
}

/// A type that can describe the selection set it requests.
///
/// Usually derived with `#[derive(Shape)]`.
pub trait Shape {
    /// Returns the descriptor of this type.
    fn describe() -> ShapeDescriptor;
}

macro_rules! leaf_shape {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Shape for $ty {
                fn describe() -> ShapeDescriptor {
                    ShapeDescriptor::Leaf
                }
            }
        )*
    };
}

leaf_shape!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    String, str, (), serde_json::Value,
);

impl<K, V, S> Shape for HashMap<K, V, S> {
    fn describe() -> ShapeDescriptor {
        ShapeDescriptor::Leaf
    }
}

impl<K, V> Shape for BTreeMap<K, V> {
    fn describe() -> ShapeDescriptor {
        ShapeDescriptor::Leaf
    }
}

impl<K, V, S> Shape for IndexMap<K, V, S> {
    fn describe() -> ShapeDescriptor {
        ShapeDescriptor::Leaf
    }
}

// Indirections and sequences take the shape of what they hold.
macro_rules! delegate_shape {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: Shape + ?Sized> Shape for $ty {
                fn describe() -> ShapeDescriptor {
                    T::describe()
                }
            }
        )*
    };
}

delegate_shape!(Box<T>, Arc<T>, Rc<T>, &T, &mut T);

impl<T: Shape> Shape for Option<T> {
    fn describe() -> ShapeDescriptor {
        T::describe()
    }
}

impl<T: Shape> Shape for Vec<T> {
    fn describe() -> ShapeDescriptor {
        T::describe()
    }
}

impl<T: Shape> Shape for VecDeque<T> {
    fn describe() -> ShapeDescriptor {
        T::describe()
    }
}

impl<T: Shape> Shape for [T] {
    fn describe() -> ShapeDescriptor {
        T::describe()
    }
}

impl<T: Shape, const N: usize> Shape for [T; N] {
    fn describe() -> ShapeDescriptor {
        T::describe()
    }
}

impl<T: Shape> Shape for BTreeSet<T> {
    fn describe() -> ShapeDescriptor {
        T::describe()
    }
}

impl<T: Shape, S> Shape for HashSet<T, S> {
    fn describe() -> ShapeDescriptor {
        T::describe()
    }
}
