//! C3/C4 for the `OrderedSequence` structural category (spec.md §4.3/§4.4).
//!
//! Backed by a `VecDeque<Value>`, walked "by iterator position" as spec.md
//! §4.3 describes (`VecDeque::get`/`get_mut` already address by that same
//! ordinal position, so this crate uses them directly instead of manually
//! stepping an iterator — same semantics, no behavioral difference).
//!
//! Unlike `ReferenceArray`/`PrimitiveArray`, an `OrderedSequence` is not
//! fixed-size, so a write past the current end grows it with `Value::Null`
//! padding first — the teacher's auto-vivification convenience (see
//! `SPEC_FULL.md` §C), granted here specifically because spec.md is silent
//! on whether an ordered sequence may grow on write.

use std::collections::VecDeque;

use crate::error::{DeadEnd, ErrorCode};
use crate::path::Path;
use crate::value::Value;

use super::KeyDeserializer;

fn parse_index_segment(path: &Path, index: usize) -> Result<usize, DeadEnd> {
    let segment = path.segment(index as isize);
    super::parse_index(segment).ok_or_else(|| {
        DeadEnd::new(
            ErrorCode::IndexExpected,
            index,
            "ordered sequence segment is not a nonnegative integer",
        )
    })
}

pub(super) fn read(
    seq: &VecDeque<Value>,
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<Value, DeadEnd> {
    let idx = parse_index_segment(path, index)?;
    let child = seq.get(idx).ok_or_else(|| {
        DeadEnd::new(
            ErrorCode::IndexOutOfBounds,
            index,
            format!("index {idx} out of bounds for sequence of length {}", seq.len()),
        )
    })?;
    super::read(child, path, index + 1, key_deser)
}

pub(super) fn get_mut<'v>(
    seq: &'v mut VecDeque<Value>,
    path: &Path,
    index: usize,
) -> Result<&'v mut Value, DeadEnd> {
    let idx = parse_index_segment(path, index)?;
    let len = seq.len();
    seq.get_mut(idx).ok_or_else(|| {
        DeadEnd::new(
            ErrorCode::IndexOutOfBounds,
            index,
            format!("index {idx} out of bounds for sequence of length {len}"),
        )
    })
}

pub(super) fn write(seq: &mut VecDeque<Value>, path: &Path, index: usize, value: Value) -> Result<(), DeadEnd> {
    let idx = parse_index_segment(path, index)?;
    while seq.len() <= idx {
        seq.push_back(Value::Null);
    }
    seq[idx] = value;
    Ok(())
}
