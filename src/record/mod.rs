//! C2: the record-accessor registry.
//!
//! `spec.md` §4.2 describes a reflective getter/setter discovery pass keyed by
//! naming convention (`getFoo`/`isFoo`/`setFoo`). Rust has no runtime
//! reflection, so this module replaces discovery with registration: a type
//! either derives [`Record`] (the compile-time equivalent of "strict
//! discovery" — every named field becomes a property, spelled exactly as the
//! field is named) or hand-builds a [`RecordSchema`] via
//! [`BeanReaderBuilder`]/[`BeanWriterBuilder`] for types that cannot carry a
//! derive. Either way, the resulting schema is cached process-wide, keyed by
//! `TypeId`, exactly once per type — see [`registry`].

mod bean;
mod registry;
mod schema;

use std::any::Any;
use std::fmt;

pub use bean::{BeanReader, BeanReaderBuilder, BeanWriter, BeanWriterBuilder};
pub use schema::{AccessError, PropertyType, ReadAccessor, RecordSchema, WriteAccessor};

/// Re-exported so `#[derive(Record)]`'s generated code can build the two
/// accessor maps without requiring downstream crates to add `indexmap` as a
/// direct dependency of their own.
pub use indexmap::IndexMap;

use crate::value::Value;

/// A value reachable through the engine whose named properties are exposed
/// through a [`RecordSchema`] instead of through mapping/array indexing.
///
/// Implemented automatically by `#[derive(Record)]`, or by hand for external
/// types that cannot carry the derive (register a schema with
/// [`BeanReaderBuilder`]/[`BeanWriterBuilder`] and implement this trait's
/// three methods directly).
pub trait RecordObject: fmt::Debug {
    /// The stable type identity this record's schema is cached under.
    fn record_type_id(&self) -> std::any::TypeId;

    /// The schema for this record's concrete type. Implementations backed by
    /// `#[derive(Record)]` delegate to [`registry::schema_for`], which
    /// performs the lazy, cache-once-per-type introspection spec.md §4.2/§5
    /// describe.
    fn schema(&self) -> std::sync::Arc<RecordSchema>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Boxed-clone of the concrete record, so [`Value`] (which must be
    /// `Clone` for the engine's read side to materialize owned copies) can
    /// clone through a `Box<dyn RecordObject>`.
    fn clone_boxed(&self) -> Box<dyn RecordObject>;
}

impl Clone for Box<dyn RecordObject> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// A concrete record type, implemented by `#[derive(Record)]` or by hand.
///
/// Separate from [`RecordObject`] so the schema-building associated function
/// can be generic over `Self` (a trait object cannot carry an associated
/// function), while traversal code only ever needs to hold a
/// `&dyn RecordObject`.
pub trait Record: RecordObject + Sized + Any + 'static {
    fn build_schema() -> RecordSchema;
}

/// The outcome of reading a named property off a record, per spec.md §4.3's
/// Record row: a successful read, an unknown property name, or — when the
/// type has no readers at all — a terminal value (the node is a leaf for
/// path purposes even though technically reachable).
pub enum ReadOutcome {
    Value(Value),
    NoSuchProperty,
    Terminal,
}

/// The outcome of writing a named property, per spec.md §4.4's Record row.
pub enum WriteOutcome {
    Ok,
    NoSuchProperty,
    Terminal,
    TypeMismatch,
    Unexpected(String),
}

/// Reads `name` off `record`, consulting (and populating, on first touch)
/// the process-wide reader cache for `record`'s concrete type.
pub fn read_property(record: &dyn RecordObject, name: &str) -> ReadOutcome {
    let schema = record.schema();
    if schema.readers.is_empty() {
        return ReadOutcome::Terminal;
    }
    match schema.readers.get(name) {
        Some(accessor) => ReadOutcome::Value(accessor.read(record)),
        None => ReadOutcome::NoSuchProperty,
    }
}

/// Writes `value` into property `name` on `record`.
pub fn write_property(record: &mut dyn RecordObject, name: &str, value: Value) -> WriteOutcome {
    let schema = record.schema();
    if schema.writers.is_empty() {
        return WriteOutcome::Terminal;
    }
    let Some(accessor) = schema.writers.get(name).cloned() else {
        return WriteOutcome::NoSuchProperty;
    };
    match accessor.write(record, value) {
        Ok(()) => WriteOutcome::Ok,
        Err(AccessError::TypeMismatch { .. }) => WriteOutcome::TypeMismatch,
        Err(err) => WriteOutcome::Unexpected(err.to_string()),
    }
}

pub use registry::schema_for;
