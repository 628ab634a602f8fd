//! C3/C4 for the `Record` structural category (spec.md §4.3/§4.4), backed
//! by the accessor registry in [`crate::record`].
//!
//! A record property is not an addressable `Value`: it is produced by an
//! accessor call. Reading recurses on a materialized copy (cheap, since the
//! copy only needs to live for the duration of the recursive call — see
//! `access` module docs). Writing through an intermediate record segment
//! (one that is not the path's last segment) has no `&mut Value` to hand
//! back either, so it reads the current property, recurses the write into
//! that owned copy, then writes the modified copy back through the
//! property's writer — see [`write_through`].

use crate::error::{DeadEnd, ErrorCode};
use crate::path::{Path, Segment};
use crate::record::{self, ReadOutcome, RecordObject, WriteOutcome};
use crate::value::Value;

use super::KeyDeserializer;

fn property_name(path: &Path, index: usize) -> Result<String, DeadEnd> {
    match path.segment(index as isize) {
        Segment::Key(k) if k.is_empty() => Err(DeadEnd::new(
            ErrorCode::EmptySegment,
            index,
            "empty segment applied to a record",
        )),
        Segment::Key(k) => Ok(k.as_str().to_owned()),
        Segment::Null => Err(DeadEnd::new(
            ErrorCode::NoSuchProperty,
            index,
            "the null-key segment does not name a record property",
        )),
    }
}

pub(super) fn read(
    rec: &dyn RecordObject,
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<Value, DeadEnd> {
    let property = property_name(path, index)?;
    match record::read_property(rec, &property) {
        ReadOutcome::Value(value) => super::read(&value, path, index + 1, key_deser),
        ReadOutcome::NoSuchProperty => Err(DeadEnd::new(
            ErrorCode::NoSuchProperty,
            index,
            format!("no such property `{property}`"),
        )),
        ReadOutcome::Terminal => Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index,
            "record type exposes no readable properties",
        )),
    }
}

/// The terminal-segment writer: the property named by the last segment is
/// set directly.
pub(super) fn write(rec: &mut dyn RecordObject, path: &Path, index: usize, value: Value) -> Result<(), DeadEnd> {
    let property = property_name(path, index)?;
    match record::write_property(rec, &property, value) {
        WriteOutcome::Ok => Ok(()),
        WriteOutcome::NoSuchProperty => Err(DeadEnd::new(
            ErrorCode::NoSuchProperty,
            index,
            format!("no such property `{property}`"),
        )),
        WriteOutcome::Terminal => Err(DeadEnd::new(
            ErrorCode::TerminalValue,
            index,
            "record type exposes no writable properties",
        )),
        WriteOutcome::TypeMismatch => Err(DeadEnd::new(
            ErrorCode::TypeMismatch,
            index,
            format!("value not assignable to property `{property}`"),
        )),
        WriteOutcome::Unexpected(message) => Err(DeadEnd::new(ErrorCode::Exception, index, message)),
    }
}

/// The intermediate-segment writer: read the current property value,
/// recurse the remainder of the write into an owned copy of it, then write
/// the copy back. If the property has no writer, the record rejects
/// modification — `NOT_MODIFIABLE`, spec.md §4.4's Mapping-row code reused
/// here for the same "container refuses to take the new value" shape.
pub(super) fn write_through(
    rec: &mut dyn RecordObject,
    path: &Path,
    index: usize,
    value: Value,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<(), DeadEnd> {
    let property = property_name(path, index)?;
    let mut current = match record::read_property(rec, &property) {
        ReadOutcome::Value(v) => v,
        ReadOutcome::NoSuchProperty => {
            return Err(DeadEnd::new(
                ErrorCode::NoSuchProperty,
                index,
                format!("no such property `{property}`"),
            ))
        }
        ReadOutcome::Terminal => {
            return Err(DeadEnd::new(
                ErrorCode::TerminalValue,
                index,
                "record type exposes no readable properties",
            ))
        }
    };
    super::write(&mut current, path, index + 1, value, key_deser)?;
    match record::write_property(rec, &property, current) {
        WriteOutcome::Ok => Ok(()),
        WriteOutcome::NoSuchProperty | WriteOutcome::Terminal => Err(DeadEnd::new(
            ErrorCode::NotModifiable,
            index,
            format!("property `{property}` has no writer to publish the modified value through"),
        )),
        WriteOutcome::TypeMismatch => Err(DeadEnd::new(
            ErrorCode::TypeMismatch,
            index,
            format!("modified value not assignable back to property `{property}`"),
        )),
        WriteOutcome::Unexpected(message) => Err(DeadEnd::new(ErrorCode::Exception, index, message)),
    }
}
