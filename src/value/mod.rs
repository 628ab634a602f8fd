//! The object graph node type.
//!
//! [`Value`] is a closed, tagged variant over the five structural categories
//! an object graph node can fall into (plus `Null`), per the classification
//! priority mandated by the engine: `Null` → [`Value::Mapping`] →
//! [`Value::ReferenceArray`] → [`Value::OrderedSequence`] →
//! [`Value::PrimitiveArray`] → [`Value::Record`]/[`Value::Scalar`].
//!
//! A plain leaf scalar (a string, number, or boolean that is not itself a
//! collection or record) is represented by [`Value::Scalar`] and is always
//! classified alongside `Record`, at the bottom of the priority list: it
//! carries no accessors, so it is always a terminal value once reached,
//! exactly as a record type with no readers would be.

mod keystring;
pub(crate) mod primitive;
mod reference_array;
mod scalar;

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;

pub use keystring::KeyString;
pub use primitive::PrimitiveArray;
pub use reference_array::{ComponentType, ReferenceArray};
pub use scalar::Scalar;

use crate::record::RecordObject;

/// An insertion-ordered keyed collection, the `Mapping` structural category.
pub type Mapping = IndexMap<KeyString, Value>;

/// Any value in the object graph the engine can classify and traverse.
pub enum Value {
    Null,
    Mapping(Mapping),
    ReferenceArray(ReferenceArray),
    OrderedSequence(VecDeque<Value>),
    PrimitiveArray(PrimitiveArray),
    Record(Box<dyn RecordObject>),
    Scalar(Scalar),
}

impl Value {
    pub fn mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_ordered_sequence(&self) -> Option<&VecDeque<Value>> {
        match self {
            Value::OrderedSequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ordered_sequence_mut(&mut self) -> Option<&mut VecDeque<Value>> {
        match self {
            Value::OrderedSequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference_array(&self) -> Option<&ReferenceArray> {
        match self {
            Value::ReferenceArray(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_reference_array_mut(&mut self) -> Option<&mut ReferenceArray> {
        match self {
            Value::ReferenceArray(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_primitive_array(&self) -> Option<&PrimitiveArray> {
        match self {
            Value::PrimitiveArray(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_primitive_array_mut(&mut self) -> Option<&mut PrimitiveArray> {
        match self {
            Value::PrimitiveArray(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&dyn RecordObject> {
        match self {
            Value::Record(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut dyn RecordObject> {
        match self {
            Value::Record(r) => Some(r.as_mut()),
            _ => None,
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Mapping(m) => Value::Mapping(m.clone()),
            Value::ReferenceArray(a) => Value::ReferenceArray(a.clone()),
            Value::OrderedSequence(s) => Value::OrderedSequence(s.clone()),
            Value::PrimitiveArray(p) => Value::PrimitiveArray(p.clone()),
            Value::Record(r) => Value::Record(r.clone()),
            Value::Scalar(s) => Value::Scalar(s.clone()),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality for every category except `Record`, which has no
    /// general notion of equality (two dynamic records could legitimately
    /// disagree on what "equal" means); two `Record`s compare equal here
    /// only when their debug representations match, which is enough for
    /// tests but not a substitute for a real equality contract.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            (Value::ReferenceArray(a), Value::ReferenceArray(b)) => a == b,
            (Value::OrderedSequence(a), Value::OrderedSequence(b)) => a == b,
            (Value::PrimitiveArray(a), Value::PrimitiveArray(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => format!("{a:?}") == format!("{b:?}"),
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Mapping(m) => f.debug_map().entries(m.iter()).finish(),
            Value::ReferenceArray(a) => f.debug_tuple("ReferenceArray").field(a).finish(),
            Value::OrderedSequence(s) => f.debug_tuple("OrderedSequence").field(s).finish(),
            Value::PrimitiveArray(p) => f.debug_tuple("PrimitiveArray").field(p).finish(),
            Value::Record(r) => f.debug_tuple("Record").field(r).finish(),
            Value::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::from(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Boolean(b))
    }
}
