//! Path-based read/write access into heterogeneous in-memory object graphs.
//!
//! A caller supplies an opaque root [`Value`] and a textual or structured
//! [`Path`] such as `employee.address.city` or `orders.3.items.0.price`, and
//! [`PathWalker`] reads or writes the referenced location, transparently
//! descending through mixed structural shapes: keyed mappings, ordered
//! sequences, fixed reference arrays, fixed primitive arrays, and records
//! whose properties are exposed through a derived or hand-registered
//! [`record::RecordSchema`].
//!
//! ```
//! use objectpath::{Path, PathWalker, Value};
//!
//! let mut root = Value::mapping();
//! if let Value::Mapping(map) = &mut root {
//!     map.insert("city".into(), Value::from("Springfield"));
//! }
//!
//! let walker = PathWalker::new();
//! let value = walker.read(&root, &Path::from("city")).unwrap();
//! assert_eq!(value, Value::from("Springfield"));
//! ```
//!
//! Separately, [`map_builder::MapBuilder`] lets callers assemble a tree of
//! nested mappings by writing leaf values directly at deep paths, without
//! walking a pre-existing graph.

#![deny(unused_must_use)]
#![allow(clippy::module_name_repetitions)]

mod access;
pub mod error;
mod map_builder;
pub mod path;
pub mod record;
mod value;
mod walker;

pub use error::{ErrorCode, TraversalError};
pub use map_builder::{MapBuilder, MapBuilderError};
pub use path::{Path, Segment};
pub use value::{ComponentType, KeyString, Mapping, PrimitiveArray, ReferenceArray, Scalar, Value};
pub use walker::PathWalker;

pub use access::KeyDeserializer;
pub use objectpath_derive::Record;
