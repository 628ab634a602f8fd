//! C3/C4 for the `PrimitiveArray` structural category (spec.md §4.3/§4.4):
//! fixed-size arrays of unboxed numeric/boolean/character elements.
//!
//! Elements are not stored as `Value`s, so a read materializes a fresh
//! `Value::Scalar` from the unboxed element (see `access` module docs), and
//! a write narrows/widens through [`PrimitiveArray::set`] — "implicit
//! numeric narrowing is the underlying primitive's responsibility" per
//! spec.md §4.4.

use crate::error::{DeadEnd, ErrorCode};
use crate::path::Path;
use crate::value::primitive::{PrimitiveArray, PrimitiveElement, TypeMismatch};
use crate::value::{Scalar, Value};

fn index_at(len: usize, path: &Path, index: usize) -> Result<usize, DeadEnd> {
    let segment = path.segment(index as isize);
    let idx = super::parse_index(segment).ok_or_else(|| {
        DeadEnd::new(
            ErrorCode::IndexExpected,
            index,
            "primitive array segment is not a nonnegative integer",
        )
    })?;
    if idx >= len {
        return Err(DeadEnd::new(
            ErrorCode::IndexOutOfBounds,
            index,
            format!("index {idx} out of bounds for array of length {len}"),
        ));
    }
    Ok(idx)
}

pub(super) fn read(arr: &PrimitiveArray, path: &Path, index: usize) -> Result<Value, DeadEnd> {
    let idx = index_at(arr.len(), path, index)?;
    let element = arr.get(idx).expect("bounds checked above");
    let scalar = match element {
        PrimitiveElement::Int(i) => Scalar::Integer(i),
        PrimitiveElement::Float(f) => Scalar::Float(f),
        PrimitiveElement::Bool(b) => Scalar::Boolean(b),
        PrimitiveElement::Char(c) => Scalar::Bytes(c.to_string()),
    };
    // This is necessarily the final segment: a materialized scalar has no
    // further structure, so a non-empty remaining path is a dead end.
    if index + 1 == path.size() {
        Ok(Value::Scalar(scalar))
    } else {
        Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index + 1,
            "primitive array element has no properties to descend into",
        ))
    }
}

fn scalar_to_element(value: &Value, target_is_char: bool) -> Option<PrimitiveElement> {
    match value {
        Value::Scalar(Scalar::Integer(i)) => Some(PrimitiveElement::Int(*i)),
        Value::Scalar(Scalar::Float(f)) => Some(PrimitiveElement::Float(*f)),
        Value::Scalar(Scalar::Boolean(b)) => Some(PrimitiveElement::Bool(*b)),
        Value::Scalar(Scalar::Bytes(s)) if target_is_char => {
            let mut chars = s.chars();
            let c = chars.next()?;
            if chars.next().is_none() {
                Some(PrimitiveElement::Char(c))
            } else {
                None
            }
        }
        _ => None,
    }
}

pub(super) fn write(arr: &mut PrimitiveArray, path: &Path, index: usize, value: Value) -> Result<(), DeadEnd> {
    let idx = index_at(arr.len(), path, index)?;
    let target_is_char = matches!(arr, PrimitiveArray::Chars(_));
    let element = scalar_to_element(&value, target_is_char).ok_or_else(|| {
        DeadEnd::new(
            ErrorCode::TypeMismatch,
            index,
            "value not assignable to the array's unboxed element type",
        )
    })?;
    match arr.set(idx, element) {
        Ok(()) => Ok(()),
        Err(TypeMismatch::Kind) => Err(DeadEnd::new(
            ErrorCode::TypeMismatch,
            index,
            "value not assignable to the array's unboxed element type",
        )),
        Err(TypeMismatch::IndexOutOfBounds) => Err(DeadEnd::new(
            ErrorCode::IndexOutOfBounds,
            index,
            "index out of bounds",
        )),
    }
}
