//! Selection set encoder.
//!
//! Walks a [`Shape`] descriptor and writes the fields it requests:
//!
//! ```text
//! { id name owner(first: 1) { id } tags }
//! ```
//!
//! Only names are written, never values, and fields keep their declaration order.

use crate::error::{EncodeError, EncodeResult};
use crate::path::{FieldPath, NestedOperationInput};
use crate::shape::{Shape, ShapeDescriptor};

/// Maximum nesting depth of a selection set.
///
/// Applies to every shape. Self-referential types hit it and fail instead of
/// recursing forever, so it sits well above what a real query nests.
pub const MAX_SELECTION_DEPTH: usize = 128;

/// Encodes the selection set requested by `T`.
///
/// A leaf type has no selection set and encodes to an empty string.
pub fn encode_selection<T: Shape + ?Sized>() -> EncodeResult<String> {
    encode_selection_with::<T>(&[])
}

/// Encodes the selection set requested by `T`, attaching nested arguments.
///
/// Each nested input whose path names a field is written in parentheses right
/// after that field's name.
pub fn encode_selection_with<T: Shape + ?Sized>(
    nested: &[NestedOperationInput],
) -> EncodeResult<String> {
    let mut out = String::new();
    write_selection(&T::describe(), &FieldPath::root(), nested, 0, &mut out)?;
    Ok(out)
}

fn write_selection(
    shape: &ShapeDescriptor,
    path: &FieldPath,
    nested: &[NestedOperationInput],
    depth: usize,
    out: &mut String,
) -> EncodeResult<()> {
    let ShapeDescriptor::Record(fields) = shape else {
        return Ok(());
    };

    if depth >= MAX_SELECTION_DEPTH {
        return Err(EncodeError::SelectionTooDeep {
            path: path.trimmed().to_string(),
        });
    }

    out.push('{');
    for field in fields {
        let field_path = path.append(field.name);

        out.push(' ');
        out.push_str(field.name);

        if let Some(input) = nested.iter().find(|n| n.field_path == field_path) {
            out.push('(');
            out.push_str(&input.input);
            out.push(')');
        }

        let child = (field.shape)();
        if !child.is_leaf() {
            out.push(' ');
            write_selection(&child, &field_path, nested, depth + 1, out)?;
        }
    }
    out.push_str(" }");

    Ok(())
}
