use super::Value;

/// The declared element type of a [`ReferenceArray`], carried alongside the
/// elements so a write can be rejected with `TYPE_MISMATCH` rather than
/// silently accepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComponentType {
    Any,
    Mapping,
    Scalar,
}

impl ComponentType {
    /// Whether a candidate value may be stored in an array declared with
    /// this component type. `Any` accepts everything; the engine never
    /// needs anything stricter than this for the spec's own test matrix,
    /// but a concrete declared type still lets callers opt into rejecting
    /// the wrong shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ComponentType::Any => true,
            ComponentType::Mapping => matches!(value, Value::Mapping(_) | Value::Null),
            ComponentType::Scalar => matches!(value, Value::Scalar(_) | Value::Null),
        }
    }
}

/// A fixed-size sequence of boxed [`Value`] elements with a declared
/// component type, the `ReferenceArray` structural category.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceArray {
    pub component: ComponentType,
    pub(crate) items: Vec<Value>,
}

impl ReferenceArray {
    pub fn new(component: ComponentType, items: Vec<Value>) -> Self {
        ReferenceArray { component, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}
