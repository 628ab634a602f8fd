//! C3/C4 for the `Mapping` structural category (spec.md §4.3/§4.4).

use crate::error::{DeadEnd, ErrorCode};
use crate::path::{Path, Segment};
use crate::value::{KeyString, Mapping, Value};

use super::KeyDeserializer;

/// Resolves the key to look up/insert for `path.segment(index)`: the key
/// deserializer's output if one is configured, otherwise the segment's raw
/// key string — including the null-key sentinel, represented here as the
/// literal key `"^0"`, exactly as spec.md §4.3 prescribes.
fn resolve_key(
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<KeyString, DeadEnd> {
    if let Some(deser) = key_deser {
        return deser
            .deserialize(path, index)
            .map(KeyString::from)
            .map_err(|msg| DeadEnd::new(ErrorCode::KeyDeserializationFailed, index, msg));
    }
    match path.segment(index as isize) {
        Segment::Key(k) => Ok(k.clone()),
        Segment::Null => Ok(KeyString::from("^0")),
    }
}

/// Spec.md §9's "null as absent vs present-with-null" distinction needs two
/// probes (get + contains) only when absence can't otherwise be told from a
/// null value; this crate's `Value::Null` is an ordinary enum variant, so
/// `Mapping::get` already distinguishes "absent" (`None`) from
/// "present, holds null" (`Some(&Value::Null)`) in a single probe — the
/// distinction the spec requires is preserved, just without a second call.
pub(super) fn read(
    map: &Mapping,
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<Value, DeadEnd> {
    let key = resolve_key(path, index, key_deser)?;
    match map.get(key.as_str()) {
        Some(child) => super::read(child, path, index + 1, key_deser),
        None => Err(DeadEnd::new(
            ErrorCode::NoSuchKey,
            index,
            format!("no such key `{key}`"),
        )),
    }
}

pub(super) fn get_mut<'v>(
    map: &'v mut Mapping,
    path: &Path,
    index: usize,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<&'v mut Value, DeadEnd> {
    let key = resolve_key(path, index, key_deser)?;
    map.get_mut(key.as_str()).ok_or_else(|| {
        DeadEnd::new(ErrorCode::NoSuchKey, index, format!("no such key `{key}`"))
    })
}

pub(super) fn write(
    map: &mut Mapping,
    path: &Path,
    index: usize,
    value: Value,
    key_deser: Option<&dyn KeyDeserializer>,
) -> Result<(), DeadEnd> {
    let key = resolve_key(path, index, key_deser)?;
    map.insert(key, value);
    Ok(())
}
