//! The accessor map cached per record type: [`RecordSchema`], plus the
//! individual bound [`ReadAccessor`]/[`WriteAccessor`] handles it holds.

use std::sync::Arc;

use indexmap::IndexMap;
use snafu::Snafu;

use crate::value::{KeyString, Value};

use super::RecordObject;

/// The declared type of a record property, used to reject a
/// [`WriteAccessor`] call whose supplied value is not assignable — spec.md
/// §4.2's "type mismatch (including null supplied to a property of an
/// unboxed primitive type)".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyType {
    Any,
    Bytes,
    Integer,
    Float,
    Boolean,
    Mapping,
}

impl PropertyType {
    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (PropertyType::Any, _) => true,
            (PropertyType::Bytes, Value::Scalar(crate::value::Scalar::Bytes(_))) => true,
            (PropertyType::Integer, Value::Scalar(crate::value::Scalar::Integer(_))) => true,
            (PropertyType::Float, Value::Scalar(crate::value::Scalar::Float(_))) => true,
            (PropertyType::Boolean, Value::Scalar(crate::value::Scalar::Boolean(_))) => true,
            (PropertyType::Mapping, Value::Mapping(_)) => true,
            // Unboxed-primitive-shaped properties never accept null.
            (
                PropertyType::Bytes
                | PropertyType::Integer
                | PropertyType::Float
                | PropertyType::Boolean,
                _,
            ) => false,
            (PropertyType::Mapping, _) => false,
        }
    }
}

#[derive(Clone, Debug, Snafu)]
pub enum AccessError {
    #[snafu(display("no such property `{property}` on type `{type_name}`"))]
    NoSuchProperty {
        type_name: &'static str,
        property: String,
    },
    #[snafu(display("type `{type_name}` exposes no writable properties"))]
    Terminal { type_name: &'static str },
    #[snafu(display(
        "value not assignable to property `{property}` of type `{type_name}` (declared {declared:?})"
    ))]
    TypeMismatch {
        type_name: &'static str,
        property: String,
        declared: PropertyType,
    },
    #[snafu(display("unexpected error invoking accessor for `{property}` on `{type_name}`: {message}"))]
    Unexpected {
        type_name: &'static str,
        property: String,
        message: String,
    },
}

type ReadFn = Arc<dyn Fn(&dyn RecordObject) -> Value + Send + Sync>;
type WriteFn = Arc<dyn Fn(&mut dyn RecordObject, Value) -> Result<(), AccessError> + Send + Sync>;

/// A bound read-handle for a single named record property (spec.md §3
/// "Accessor"). Created once (by the derive macro or a
/// [`super::BeanReaderBuilder`]) and cached for the process lifetime inside
/// a [`RecordSchema`].
#[derive(Clone)]
pub struct ReadAccessor {
    pub name: KeyString,
    pub declared_type: PropertyType,
    type_name: &'static str,
    f: ReadFn,
}

impl ReadAccessor {
    pub fn new(
        name: impl Into<KeyString>,
        declared_type: PropertyType,
        type_name: &'static str,
        f: impl Fn(&dyn RecordObject) -> Value + Send + Sync + 'static,
    ) -> Self {
        ReadAccessor {
            name: name.into(),
            declared_type,
            type_name,
            f: Arc::new(f),
        }
    }

    pub(crate) fn read(&self, record: &dyn RecordObject) -> Value {
        (self.f)(record)
    }
}

/// A bound write-handle for a single named record property.
#[derive(Clone)]
pub struct WriteAccessor {
    pub name: KeyString,
    pub declared_type: PropertyType,
    type_name: &'static str,
    f: WriteFn,
}

impl WriteAccessor {
    pub fn new(
        name: impl Into<KeyString>,
        declared_type: PropertyType,
        type_name: &'static str,
        f: impl Fn(&mut dyn RecordObject, Value) -> Result<(), AccessError> + Send + Sync + 'static,
    ) -> Self {
        WriteAccessor {
            name: name.into(),
            declared_type,
            type_name,
            f: Arc::new(f),
        }
    }

    pub(crate) fn write(&self, record: &mut dyn RecordObject, value: Value) -> Result<(), AccessError> {
        if !self.declared_type.accepts(&value) {
            return Err(AccessError::TypeMismatch {
                type_name: self.type_name,
                property: self.name.to_string(),
                declared: self.declared_type,
            });
        }
        (self.f)(record, value)
    }
}

/// The per-record-type accessor map: two insertion-ordered mappings,
/// `propertyName -> accessor`, one for reads and one for writes, matching
/// spec.md §4.2's "two singleton caches" (here consolidated into one
/// `RecordSchema` per type, since a derived or hand-built type produces both
/// maps in the same pass — see `DESIGN.md`).
pub struct RecordSchema {
    pub type_name: &'static str,
    pub readers: IndexMap<KeyString, ReadAccessor>,
    pub writers: IndexMap<KeyString, WriteAccessor>,
}

impl RecordSchema {
    pub fn new(
        type_name: &'static str,
        readers: IndexMap<KeyString, ReadAccessor>,
        writers: IndexMap<KeyString, WriteAccessor>,
    ) -> Self {
        RecordSchema {
            type_name,
            readers,
            writers,
        }
    }
}
