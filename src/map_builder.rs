//! C7: the map-path builder — an auxiliary structure that lets callers
//! assemble a tree of nested insertion-ordered mappings by writing leaf
//! values directly at deep paths, per spec.md §4.7.
//!
//! Internally the builder is a tree of [`Node`]s (`IndexMap<KeyString,
//! Slot>`) shared through `Rc<RefCell<_>>`, so a cursor returned by
//! [`MapBuilder::enter`]/[`MapBuilder::jump`] still writes into the same
//! underlying storage the root cursor sees. The cursor itself is just a
//! stack of `(name, node)` pairs from the root down to the current
//! position — `up`/`root` simply pop/clear that stack, no parent-pointer
//! chain needed.

use std::cell::RefCell;
use std::rc::Rc;

use snafu::Snafu;

use crate::path::{Path, Segment};
use crate::value::{KeyString, Mapping, Value};

/// The private null-value sentinel (spec.md §3/§9): stored in place of a
/// real `Value::Null` leaf so the builder's internal maps can distinguish
/// "key present, holds null" from "key absent" with a single lookup. Never
/// observable through `get`/`poll`/`build`.
#[derive(Clone, Debug)]
enum Slot {
    Leaf(Value),
    NullSentinel,
    Branch(Rc<RefCell<Node>>),
}

type Node = indexmap::IndexMap<KeyString, Slot>;

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
pub enum MapBuilderError {
    #[snafu(display("path `{path}` is blocked: an intermediate or terminal segment is already bound to a non-mapping value"))]
    PathBlocked { path: String },
    #[snafu(display("illegal argument: {message}"))]
    IllegalArgument { message: String },
    #[snafu(display("illegal state: {message}"))]
    IllegalState { message: String },
}

/// Splits a dotted path string into plain string keys, using the same
/// `^`-escape grammar as [`Path`] (so a builder path may still escape a
/// literal `.` inside a key). The null-key sentinel (`^0`) is not a valid
/// map-builder key, since `Mapping` keys here are always plain strings.
fn split(path: &str) -> Result<Vec<KeyString>, MapBuilderError> {
    let parsed = Path::from(path);
    parsed
        .iter()
        .map(|segment| match segment {
            Segment::Key(k) => Ok(k.clone()),
            Segment::Null => Err(MapBuilderError::IllegalArgument {
                message: "map builder paths may not contain the null-key sentinel `^0`".to_owned(),
            }),
        })
        .collect()
}

/// Builder/cursor for a tree of nested insertion-ordered mappings (spec.md
/// §4.7, C7).
#[derive(Clone)]
pub struct MapBuilder {
    root: Rc<RefCell<Node>>,
    // Cursor position: the chain of (key-used-to-reach-this-node, node)
    // from directly under the root down to the current local map.
    stack: Vec<(KeyString, Rc<RefCell<Node>>)>,
}

impl Default for MapBuilder {
    fn default() -> Self {
        MapBuilder {
            root: Rc::new(RefCell::new(Node::new())),
            stack: Vec::new(),
        }
    }
}

impl MapBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a `MapBuilder` seeded from an existing mapping. Every key
    /// must be non-empty (spec.md §4.7's "validate all keys are non-null,
    /// non-empty strings" — `KeyString` already rules out null); nested
    /// mappings are recursively wrapped into branch nodes.
    pub fn from_mapping(source: &Mapping) -> Result<Self, MapBuilderError> {
        Ok(MapBuilder {
            root: Rc::new(RefCell::new(wrap_mapping(source)?)),
            stack: Vec::new(),
        })
    }

    fn current(&self) -> Rc<RefCell<Node>> {
        match self.stack.last() {
            Some((_, node)) => Rc::clone(node),
            None => Rc::clone(&self.root),
        }
    }

    /// The cursor's absolute path, formatted. Empty string at the root.
    #[must_use]
    pub fn where_(&self) -> String {
        Path::of(self.stack.iter().map(|(k, _)| k.clone())).format()
    }

    /// The last segment of the cursor's path, or empty string at the root.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.stack.last() {
            Some((k, _)) => k.as_str(),
            None => "",
        }
    }

    /// Descends from `from`, creating missing branch nodes along the way.
    /// Fails with [`MapBuilderError::PathBlocked`] if an intermediate
    /// segment is already bound to a non-mapping slot.
    fn descend_create(from: &Rc<RefCell<Node>>, keys: &[KeyString]) -> Result<Rc<RefCell<Node>>, MapBuilderError> {
        Ok(Self::descend_create_stack(from, keys)?
            .pop()
            .map(|(_, node)| node)
            .unwrap_or_else(|| Rc::clone(from)))
    }

    /// Like [`Self::descend_create`], but returns every intermediate node
    /// visited (paired with the key used to reach it), so [`Self::enter`]
    /// can push the whole chain onto the cursor stack in one pass.
    fn descend_create_stack(
        from: &Rc<RefCell<Node>>,
        keys: &[KeyString],
    ) -> Result<Vec<(KeyString, Rc<RefCell<Node>>)>, MapBuilderError> {
        let mut node = Rc::clone(from);
        let mut visited = Vec::with_capacity(keys.len());
        for key in keys {
            let next = {
                let mut borrowed = node.borrow_mut();
                match borrowed.get(key) {
                    Some(Slot::Branch(child)) => Rc::clone(child),
                    Some(Slot::Leaf(_) | Slot::NullSentinel) => {
                        return Err(MapBuilderError::PathBlocked {
                            path: key.to_string(),
                        })
                    }
                    None => {
                        let child = Rc::new(RefCell::new(Node::new()));
                        borrowed.insert(key.clone(), Slot::Branch(Rc::clone(&child)));
                        child
                    }
                }
            };
            visited.push((key.clone(), Rc::clone(&next)));
            node = next;
        }
        Ok(visited)
    }

    /// Descends from `from` following only existing branch nodes, without
    /// creating anything. Returns `None` the moment an intermediate segment
    /// is absent or bound to a non-mapping slot.
    fn descend_existing(from: &Rc<RefCell<Node>>, keys: &[KeyString]) -> Option<Rc<RefCell<Node>>> {
        let mut node = Rc::clone(from);
        for key in keys {
            let next = match node.borrow().get(key) {
                Some(Slot::Branch(child)) => Rc::clone(child),
                _ => return None,
            };
            node = next;
        }
        Some(node)
    }

    /// `set(pathString, value)`: inserts a leaf at `path`. Refuses if the
    /// key is already present, even if the present value is null — spec.md
    /// §4.7/§8 property 5. `value` must not be a mapping; use
    /// [`MapBuilder::enter`] to build nested mappings instead.
    pub fn set(&mut self, path: &str, value: Value) -> Result<&mut Self, MapBuilderError> {
        if matches!(value, Value::Mapping(_)) {
            return Err(MapBuilderError::IllegalArgument {
                message: "set() value must not be a mapping; use enter() to build nested mappings".to_owned(),
            });
        }
        let keys = split(path)?;
        let Some((last, prefix)) = keys.split_last() else {
            return Err(MapBuilderError::IllegalArgument {
                message: "set() path must have at least one segment".to_owned(),
            });
        };
        let node = Self::descend_create(&self.current(), prefix)?;
        let mut borrowed = node.borrow_mut();
        if borrowed.contains_key(last) {
            return Err(MapBuilderError::PathBlocked { path: path.to_owned() });
        }
        let slot = match value {
            Value::Null => Slot::NullSentinel,
            other => Slot::Leaf(other),
        };
        borrowed.insert(last.clone(), slot);
        drop(borrowed);
        Ok(self)
    }

    /// `in(pathString)` in spec.md §4.7 — named `enter` here since `in` is a
    /// Rust keyword. Descends, creating missing mappings along the way, and
    /// moves the cursor there.
    pub fn enter(&mut self, path: &str) -> Result<&mut Self, MapBuilderError> {
        let keys = split(path)?;
        if keys.is_empty() {
            return Err(MapBuilderError::IllegalArgument {
                message: "enter() path must have at least one segment".to_owned(),
            });
        }
        let visited = Self::descend_create_stack(&self.current(), &keys)?;
        self.stack.extend(visited);
        Ok(self)
    }

    /// `jump(pathString)`: like [`MapBuilder::enter`] but starts from the
    /// root cursor regardless of the current position.
    pub fn jump(&mut self, path: &str) -> Result<&mut Self, MapBuilderError> {
        self.stack.clear();
        self.enter(path)
    }

    /// `up(name)`: moves to the parent cursor. `name` must equal the last
    /// segment of the current cursor's path, or be empty if the current
    /// cursor is directly under the root.
    pub fn up(&mut self, name: Option<&str>) -> Result<&mut Self, MapBuilderError> {
        let Some((current_name, _)) = self.stack.last() else {
            return Err(MapBuilderError::IllegalState {
                message: "already at the root cursor".to_owned(),
            });
        };
        let directly_under_root = self.stack.len() == 1;
        let matches_name = name == Some(current_name.as_str());
        let empty_at_root = directly_under_root && matches!(name, None | Some(""));
        if !matches_name && !empty_at_root {
            return Err(MapBuilderError::IllegalArgument {
                message: format!(
                    "up() name {name:?} does not match current cursor name `{current_name}`"
                ),
            });
        }
        self.stack.pop();
        Ok(self)
    }

    /// `root()`: walks to the topmost cursor.
    pub fn root(&mut self) -> &mut Self {
        self.stack.clear();
        self
    }

    /// `poll(pathString) -> Result` in spec.md §4.7 terms — `Option<Value>`
    /// is this crate's instance of the out-of-scope "present/absent"
    /// collaborator type named in spec.md §1. Descent across a non-mapping
    /// mid-path returns `None`.
    #[must_use]
    pub fn poll(&self, path: &str) -> Option<Value> {
        let keys = split(path).ok()?;
        let (last, prefix) = keys.split_last()?;
        let node = Self::descend_existing(&self.current(), prefix)?;
        let borrowed = node.borrow();
        match borrowed.get(last)? {
            Slot::Leaf(v) => Some(v.clone()),
            Slot::NullSentinel => Some(Value::Null),
            Slot::Branch(child) => Some(Value::Mapping(build_node(&child.borrow()))),
        }
    }

    /// `get(pathString)`: shorthand for `poll(...).orElseNull`.
    #[must_use]
    pub fn get(&self, path: &str) -> Value {
        self.poll(path).unwrap_or(Value::Null)
    }

    /// `isSet(pathString)`: per spec.md §9's Open Question, preserved
    /// exactly as "true iff the first probed segment has any entry in its
    /// local map" — which also makes this true for an ancestor path of a
    /// set leaf, not just an exact terminal leaf path.
    #[must_use]
    pub fn is_set(&self, path: &str) -> bool {
        let Ok(keys) = split(path) else { return false };
        let Some((last, prefix)) = keys.split_last() else {
            return false;
        };
        match Self::descend_existing(&self.current(), prefix) {
            Some(node) => node.borrow().contains_key(last),
            None => false,
        }
    }

    /// `unset(pathString)`: removes the key if present; silent otherwise.
    pub fn unset(&mut self, path: &str) -> Result<&mut Self, MapBuilderError> {
        let keys = split(path)?;
        if let Some((last, prefix)) = keys.split_last() {
            if let Some(node) = Self::descend_existing(&self.current(), prefix) {
                node.borrow_mut().shift_remove(last);
            }
        }
        Ok(self)
    }

    /// `add(pathString, element)`: appends to (or creates) an ordered
    /// sequence at `path`.
    pub fn add(&mut self, path: &str, element: Value) -> Result<&mut Self, MapBuilderError> {
        let keys = split(path)?;
        let Some((last, prefix)) = keys.split_last() else {
            return Err(MapBuilderError::IllegalArgument {
                message: "add() path must have at least one segment".to_owned(),
            });
        };
        let node = Self::descend_create(&self.current(), prefix)?;
        let mut borrowed = node.borrow_mut();
        match borrowed.get_mut(last) {
            None => {
                let seq = Value::OrderedSequence(std::iter::once(element).collect());
                borrowed.insert(last.clone(), Slot::Leaf(seq));
            }
            Some(Slot::Leaf(Value::OrderedSequence(seq))) => seq.push_back(element),
            Some(_) => {
                return Err(MapBuilderError::PathBlocked { path: path.to_owned() });
            }
        }
        Ok(self)
    }

    /// `build()`: produces a plain insertion-ordered mapping tree by deep
    /// copy, swapping the null sentinel back for real `Value::Null`. Always
    /// builds from the root regardless of the current cursor position; the
    /// builder remains fully usable afterward.
    #[must_use]
    pub fn build(&self) -> Mapping {
        build_node(&self.root.borrow())
    }
}

fn build_node(node: &Node) -> Mapping {
    node.iter()
        .map(|(k, slot)| {
            let value = match slot {
                Slot::Leaf(v) => v.clone(),
                Slot::NullSentinel => Value::Null,
                Slot::Branch(child) => Value::Mapping(build_node(&child.borrow())),
            };
            (k.clone(), value)
        })
        .collect()
}

fn wrap_mapping(source: &Mapping) -> Result<Node, MapBuilderError> {
    let mut node = Node::new();
    for (key, value) in source {
        if key.is_empty() {
            return Err(MapBuilderError::IllegalArgument {
                message: "map builder source mapping keys must be non-empty".to_owned(),
            });
        }
        let slot = match value {
            Value::Null => Slot::NullSentinel,
            Value::Mapping(m) => Slot::Branch(Rc::new(RefCell::new(wrap_mapping(m)?))),
            other => Slot::Leaf(other.clone()),
        };
        node.insert(key.clone(), slot);
    }
    Ok(node)
}

#[cfg(test)]
mod test {
    use super::*;

    /// S6 from the test matrix.
    #[test]
    fn set_twice_is_blocked() {
        let mut mb = MapBuilder::new();
        mb.enter("person.address").unwrap().set("street", "X".into()).unwrap();
        let err = mb.set("street", "Y".into()).unwrap_err();
        assert_eq!(
            err,
            MapBuilderError::PathBlocked {
                path: "street".to_owned()
            }
        );
    }

    /// S6 variant: blocked even when the present value is null.
    #[test]
    fn set_twice_blocked_even_if_present_value_is_null() {
        let mut mb = MapBuilder::new();
        mb.set("x", Value::Null).unwrap();
        let err = mb.set("x", "Y".into()).unwrap_err();
        assert!(matches!(err, MapBuilderError::PathBlocked { .. }));
    }

    /// S7 from the test matrix.
    #[test]
    fn enter_set_up_set_builds_expected_tree() {
        let mut mb = MapBuilder::new();
        mb.enter("person.address")
            .unwrap()
            .set("street", "X".into())
            .unwrap()
            .up(Some("address"))
            .unwrap()
            .up(Some("person"))
            .unwrap()
            .set("firstName", "J".into())
            .unwrap();

        let built = mb.build();
        let person = built.get("person").unwrap().as_mapping().unwrap();
        assert_eq!(person.get("firstName").unwrap(), &Value::from("J"));
        let address = person.get("address").unwrap().as_mapping().unwrap();
        assert_eq!(address.get("street").unwrap(), &Value::from("X"));
    }

    /// S8 from the test matrix.
    #[test]
    fn add_appends_to_existing_sequence() {
        let mut mb = MapBuilder::new();
        mb.add("foo", Value::from(1_i64)).unwrap();
        mb.add("foo", Value::from(2_i64)).unwrap();
        mb.add("foo", Value::from(3_i64)).unwrap();

        let built = mb.build();
        let seq = built.get("foo").unwrap().as_ordered_sequence().unwrap();
        let values: Vec<_> = seq.iter().cloned().collect();
        assert_eq!(values, vec![Value::from(1_i64), Value::from(2_i64), Value::from(3_i64)]);
    }

    #[test]
    fn add_on_non_sequence_is_blocked() {
        let mut mb = MapBuilder::new();
        mb.set("foo", Value::from(1_i64)).unwrap();
        let err = mb.add("foo", Value::from(2_i64)).unwrap_err();
        assert!(matches!(err, MapBuilderError::PathBlocked { .. }));
    }

    #[test]
    fn poll_and_is_set_and_unset() {
        let mut mb = MapBuilder::new();
        mb.enter("a.b").unwrap().set("c", Value::from(1_i64)).unwrap();

        assert!(mb.is_set("a"));
        assert!(mb.is_set("a.b"));
        assert!(mb.is_set("a.b.c"));
        assert!(!mb.is_set("a.b.d"));

        assert_eq!(mb.get("a.b.c"), Value::from(1_i64));
        assert_eq!(mb.poll("missing"), None);

        mb.root();
        mb.unset("a.b.c").unwrap();
        assert!(!mb.is_set("a.b.c"));
    }

    #[test]
    fn up_name_mismatch_is_illegal_argument() {
        let mut mb = MapBuilder::new();
        mb.enter("person.address").unwrap();
        let err = mb.up(Some("wrong")).unwrap_err();
        assert!(matches!(err, MapBuilderError::IllegalArgument { .. }));
    }

    #[test]
    fn up_at_root_is_illegal_state() {
        let mut mb = MapBuilder::new();
        let err = mb.up(None).unwrap_err();
        assert!(matches!(err, MapBuilderError::IllegalState { .. }));
    }

    #[test]
    fn from_mapping_round_trips() {
        let mut inner = Mapping::new();
        inner.insert("street".into(), Value::from("X"));
        let mut source = Mapping::new();
        source.insert("address".into(), Value::Mapping(inner));
        source.insert("age".into(), Value::Null);

        let mb = MapBuilder::from_mapping(&source).unwrap();
        assert_eq!(mb.build(), source);
    }

    #[test]
    fn where_and_name_track_cursor() {
        let mut mb = MapBuilder::new();
        assert_eq!(mb.name(), "");
        assert_eq!(mb.where_(), "");
        mb.enter("a.b").unwrap();
        assert_eq!(mb.name(), "b");
        assert_eq!(mb.where_(), "a.b");
    }
}
