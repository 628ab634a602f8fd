//! C5: the object reader / object writer dispatch switch, plus (in the five
//! submodules) the C3/C4 segment readers and writers for each structural
//! category spec.md §3 defines.
//!
//! Two of the five categories have no addressable `Value` child to hand
//! back by reference: `PrimitiveArray` elements are unboxed, and `Record`
//! properties are synthesized by an accessor call rather than stored as a
//! `Value` at all. So, unlike the teacher's `get`/`get_mut` pair (which can
//! return a `&Value` because every `vrl::Value` child really is a `Value`),
//! this engine's read side returns an *owned* `Value`, materializing
//! primitive elements and record properties on the fly. The write side
//! still mutates in place through `&mut Value` wherever an addressable
//! child exists (`Mapping`, `ReferenceArray`, `OrderedSequence`); for
//! `Record` it falls back to get-recurse-then-set-back, since a record
//! property can only be reached through its accessor pair (see
//! `record::write_through`).

mod mapping;
mod ordered_sequence;
mod primitive_array;
mod record;
mod reference_array;

use crate::error::{DeadEnd, ErrorCode};
use crate::path::{Path, Segment};
use crate::value::Value;

/// User-supplied hook for producing a mapping key from a path segment,
/// spec.md §4.3's Mapping row and §6's `KeyDeserializer`. Only ever invoked
/// at a segment about to be looked up in a `Value::Mapping`.
pub trait KeyDeserializer {
    /// Produce the key to look up for `path.segment(segment_index)`. An
    /// `Err` becomes `KEY_DESERIALIZATION_FAILED`.
    fn deserialize(&self, path: &Path, segment_index: usize) -> Result<String, String>;
}

/// Parses a path segment into a nonnegative integer index. Spec.md §1 names
/// this contract ("a numeric parser ... returns present/absent") as an
/// external collaborator, out of scope for the engine itself; this is this
/// crate's instance of that collaborator, used by every array/sequence
/// segment handler.
pub(crate) fn parse_index(segment: &Segment) -> Option<usize> {
    match segment {
        Segment::Key(k) if !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()) => {
            k.as_str().parse::<usize>().ok()
        }
        _ => None,
    }
}

/// The object reader (C5). `index == path.size()` is the recursion's base
/// case: return (a clone of) the current node. Otherwise classify `node`
/// by the fixed priority order of spec.md §3 and delegate to the matching
/// segment reader.
pub(crate) fn read(
    node: &Value,
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<Value, DeadEnd> {
    if index == path.size() {
        return Ok(node.clone());
    }
    match node {
        Value::Null => Err(DeadEnd::new(
            ErrorCode::NullValue,
            index,
            "cannot descend into a null value",
        )),
        Value::Mapping(map) => mapping::read(map, path, index, key_deser),
        Value::ReferenceArray(arr) => reference_array::read(arr, path, index, key_deser),
        Value::OrderedSequence(seq) => ordered_sequence::read(seq, path, index, key_deser),
        Value::PrimitiveArray(arr) => primitive_array::read(arr, path, index),
        Value::Record(rec) => record::read(rec.as_ref(), path, index, key_deser),
        Value::Scalar(_) => Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index,
            "scalar value has no properties to descend into",
        )),
    }
}

/// The object writer (C5). Structurally the same dispatch as [`read`],
/// except the *last* segment is routed to a segment writer instead of a
/// segment reader (spec.md §4.4). `index == path.size()` (which includes
/// the empty-path case) overwrites `node` outright.
pub(crate) fn write(
    node: &mut Value,
    path: &Path,
    index: usize,
    value: Value,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<(), DeadEnd> {
    if index == path.size() {
        *node = value;
        return Ok(());
    }
    if index + 1 == path.size() {
        return write_terminal(node, path, index, value, key_deser);
    }
    match node {
        Value::Record(rec) => record::write_through(rec.as_mut(), path, index, value, key_deser),
        _ => {
            let child = get_mut_child(node, path, index, key_deser)?;
            write(child, path, index + 1, value, key_deser)
        }
    }
}

/// Dispatches the terminal segment of a write to the matching segment
/// writer.
fn write_terminal(
    node: &mut Value,
    path: &Path,
    index: usize,
    value: Value,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<(), DeadEnd> {
    match node {
        Value::Null => Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index,
            "cannot write through a null value",
        )),
        Value::Mapping(map) => mapping::write(map, path, index, value, key_deser),
        Value::ReferenceArray(arr) => reference_array::write(arr, path, index, value),
        Value::OrderedSequence(seq) => ordered_sequence::write(seq, path, index, value),
        Value::PrimitiveArray(arr) => primitive_array::write(arr, path, index, value),
        Value::Record(rec) => record::write(rec.as_mut(), path, index, value),
        Value::Scalar(_) => Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index,
            "scalar value has no properties to write into",
        )),
    }
}

/// Descends one *intermediate* (non-terminal) segment for a write, mirroring
/// the segment reader's contract exactly — spec.md §4.4: "all earlier
/// segments are traversed by readers." A `Null` node here is therefore
/// `NULL_VALUE`, not `TERMINAL_VALUE` (that code is reserved for the
/// terminal write dispatch point, per spec.md §4.5). Never called with a
/// `Value::Record` node: [`write`] routes those to
/// `record::write_through` directly, since a record property has no
/// addressable `&mut Value` to hand back.
fn get_mut_child<'v>(
    node: &'v mut Value,
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<&'v mut Value, DeadEnd> {
    match node {
        Value::Null => Err(DeadEnd::new(
            ErrorCode::NullValue,
            index,
            "cannot descend into a null value",
        )),
        Value::Mapping(map) => mapping::get_mut(map, path, index, key_deser),
        Value::ReferenceArray(arr) => reference_array::get_mut(arr, path, index),
        Value::OrderedSequence(seq) => ordered_sequence::get_mut(seq, path, index),
        Value::PrimitiveArray(_) => Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index,
            "primitive array elements have no further structure to descend into",
        )),
        Value::Record(_) => unreachable!("write() routes Record nodes to record::write_through"),
        Value::Scalar(_) => Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index,
            "scalar value has no properties to descend into",
        )),
    }
}
