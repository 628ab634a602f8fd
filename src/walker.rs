//! C6: [`PathWalker`], the public top-level read/write entry point.
//!
//! The walker owns exactly the policy spec.md §4.6 assigns it — whether a
//! dead-end is suppressed or thrown, plus an optional [`KeyDeserializer`] —
//! and nothing else. It holds no traversal state: every `read`/`write` call
//! is single-shot, recursing through [`crate::access::read`]/
//! [`crate::access::write`] and converting the resulting [`DeadEnd`] (if
//! any) at this one boundary, per spec.md §9's "optional vs exception for
//! dead-ends" design note.

use tracing::debug;

use crate::access::{self, KeyDeserializer};
use crate::error::TraversalError;
use crate::path::Path;
use crate::value::Value;

/// Top-level facade for path-based reads and writes over a [`Value`] graph.
///
/// Construct with [`PathWalker::new`] (throw mode) or
/// [`PathWalker::suppressing`] (suppress mode), optionally attaching a
/// [`KeyDeserializer`] with [`PathWalker::with_key_deserializer`].
pub struct PathWalker {
    suppress_exceptions: bool,
    key_deserializer: Option<Box<dyn KeyDeserializer>>,
}

impl Default for PathWalker {
    /// Throw mode, no key deserializer — the strictest configuration.
    fn default() -> Self {
        PathWalker {
            suppress_exceptions: false,
            key_deserializer: None,
        }
    }
}

impl PathWalker {
    /// A walker in throw mode: dead-ends raise a [`TraversalError`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A walker in suppress mode: dead-ends return `Ok(Value::Null)` from
    /// [`PathWalker::read`] and `Ok(false)` from [`PathWalker::write`].
    #[must_use]
    pub fn suppressing() -> Self {
        PathWalker {
            suppress_exceptions: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_key_deserializer(mut self, deserializer: impl KeyDeserializer + 'static) -> Self {
        self.key_deserializer = Some(Box::new(deserializer));
        self
    }

    #[must_use]
    pub fn suppresses_exceptions(&self) -> bool {
        self.suppress_exceptions
    }

    /// Reads the value at `path` inside `root`.
    ///
    /// In throw mode a dead-end is `Err(TraversalError)`; in suppress mode it
    /// is `Ok(Value::Null)`, matching spec.md §4.6's "dead-ends return null
    /// (read)".
    pub fn read(&self, root: &Value, path: &Path) -> Result<Value, TraversalError> {
        match access::read(root, path, 0, self.key_deserializer.as_deref()) {
            Ok(value) => Ok(value),
            Err(dead_end) => {
                if self.suppress_exceptions {
                    Ok(Value::Null)
                } else {
                    let error = TraversalError::from_dead_end(path.clone(), dead_end);
                    debug!(code = %error.code, path = %error.path, segment = error.segment_index, "path read dead-end");
                    Err(error)
                }
            }
        }
    }

    /// Writes `value` at `path` inside `root`.
    ///
    /// Returns `Ok(true)` on success. In throw mode a dead-end is
    /// `Err(TraversalError)`; in suppress mode it is `Ok(false)`, matching
    /// spec.md §4.6's "dead-ends return ... false (write)".
    pub fn write(&self, root: &mut Value, path: &Path, value: Value) -> Result<bool, TraversalError> {
        match access::write(root, path, 0, value, self.key_deserializer.as_deref()) {
            Ok(()) => Ok(true),
            Err(dead_end) => {
                if self.suppress_exceptions {
                    Ok(false)
                } else {
                    let error = TraversalError::from_dead_end(path.clone(), dead_end);
                    debug!(code = %error.code, path = %error.path, segment = error.segment_index, "path write dead-end");
                    Err(error)
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Mapping;

    fn mapping_of(pairs: &[(&str, Value)]) -> Value {
        let mut m = Mapping::new();
        for (k, v) in pairs {
            m.insert((*k).into(), v.clone());
        }
        Value::Mapping(m)
    }

    /// S1 from the test matrix.
    #[test]
    fn write_through_nested_sequence() {
        let seq = Value::OrderedSequence(
            ["to", "be", "or", "not", "to", "be"]
                .iter()
                .map(|s| Value::from(*s))
                .collect(),
        );
        let bar = mapping_of(&[("bozo", seq)]);
        let foo = mapping_of(&[("bar", bar)]);
        let mut root = mapping_of(&[("foo", foo)]);

        let walker = PathWalker::new();
        let path = Path::from("foo.bar.bozo.2");
        assert_eq!(walker.write(&mut root, &path, Value::from("nor")).unwrap(), true);

        let read = walker.read(&root, &path).unwrap();
        assert_eq!(read, Value::from("nor"));
    }

    /// S3 from the test matrix: writing through a null in throw mode.
    #[test]
    fn write_through_null_is_terminal_value() {
        let bar = mapping_of(&[("bozo", Value::Null)]);
        let foo = mapping_of(&[("bar", bar)]);
        let mut root = mapping_of(&[("foo", foo)]);

        let walker = PathWalker::new();
        let path = Path::from("foo.bar.bozo.teapot");
        let err = walker.write(&mut root, &path, Value::from(42_i64)).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::TerminalValue);
    }

    #[test]
    fn suppress_mode_returns_null_and_false() {
        let root = mapping_of(&[]);
        let walker = PathWalker::suppressing();
        let path = Path::from("missing.key");

        assert!(matches!(walker.read(&root, &path).unwrap(), Value::Null));

        let mut root2 = mapping_of(&[]);
        assert_eq!(walker.write(&mut root2, &path, Value::from(1_i64)).unwrap(), false);
    }

    #[test]
    fn read_of_empty_path_returns_root() {
        let root = mapping_of(&[("a", Value::from(1_i64))]);
        let walker = PathWalker::new();
        let value = walker.read(&root, &Path::empty()).unwrap();
        assert!(matches!(value, Value::Mapping(_)));
    }

    struct UppercaseKeys;

    impl KeyDeserializer for UppercaseKeys {
        fn deserialize(&self, path: &Path, index: usize) -> Result<String, String> {
            match path.segment(index as isize).as_key() {
                Some(k) => Ok(k.to_uppercase()),
                None => Err("null key segment is not a valid mapping key".to_owned()),
            }
        }
    }

    #[test]
    fn key_deserializer_transforms_mapping_lookups() {
        let root = mapping_of(&[("FOO", Value::from(1_i64))]);
        let walker = PathWalker::new().with_key_deserializer(UppercaseKeys);
        let value = walker.read(&root, &Path::from("foo")).unwrap();
        assert_eq!(value, Value::from(1_i64));
    }
}
