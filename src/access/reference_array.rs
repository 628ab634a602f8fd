//! C3/C4 for the `ReferenceArray` structural category (spec.md §4.3/§4.4).

use crate::error::{DeadEnd, ErrorCode};
use crate::path::Path;
use crate::value::{ReferenceArray, Value};

use super::KeyDeserializer;

fn index_at(arr_len: usize, path: &Path, index: usize) -> Result<usize, DeadEnd> {
    let segment = path.segment(index as isize);
    let idx = super::parse_index(segment).ok_or_else(|| {
        DeadEnd::new(
            ErrorCode::IndexExpected,
            index,
            "reference array segment is not a nonnegative integer",
        )
    })?;
    if idx >= arr_len {
        return Err(DeadEnd::new(
            ErrorCode::IndexOutOfBounds,
            index,
            format!("index {idx} out of bounds for array of length {arr_len}"),
        ));
    }
    Ok(idx)
}

pub(super) fn read(
    arr: &ReferenceArray,
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<Value, DeadEnd> {
    let idx = index_at(arr.len(), path, index)?;
    super::read(arr.get(idx).expect("bounds checked above"), path, index + 1, key_deser)
}

pub(super) fn get_mut<'v>(
    arr: &'v mut ReferenceArray,
    path: &Path,
    index: usize,
) -> Result<&'v mut Value, DeadEnd> {
    let idx = index_at(arr.len(), path, index)?;
    Ok(arr.get_mut(idx).expect("bounds checked above"))
}

pub(super) fn write(arr: &mut ReferenceArray, path: &Path, index: usize, value: Value) -> Result<(), DeadEnd> {
    let idx = index_at(arr.len(), path, index)?;
    if !arr.component.accepts(&value) {
        return Err(DeadEnd::new(
            ErrorCode::TypeMismatch,
            index,
            "value not assignable to the array's declared component type",
        ));
    }
    *arr.get_mut(idx).expect("bounds checked above") = value;
    Ok(())
}
