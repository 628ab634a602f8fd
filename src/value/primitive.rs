use std::fmt;

/// A fixed-size array of unboxed primitives: numeric, boolean, or character.
/// Distinct from [`super::ReferenceArray`], which holds boxed `Value`
/// elements, `PrimitiveArray` variants hold their elements unboxed, matching
/// how a language with unboxed primitive arrays (e.g. Java's `int[]`)
/// represents them.
#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveArray {
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Bools(Vec<bool>),
    Chars(Vec<char>),
}

impl PrimitiveArray {
    pub fn len(&self) -> usize {
        match self {
            PrimitiveArray::Ints(v) => v.len(),
            PrimitiveArray::Floats(v) => v.len(),
            PrimitiveArray::Bools(v) => v.len(),
            PrimitiveArray::Chars(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<PrimitiveElement> {
        match self {
            PrimitiveArray::Ints(v) => v.get(index).copied().map(PrimitiveElement::Int),
            PrimitiveArray::Floats(v) => v.get(index).copied().map(PrimitiveElement::Float),
            PrimitiveArray::Bools(v) => v.get(index).copied().map(PrimitiveElement::Bool),
            PrimitiveArray::Chars(v) => v.get(index).copied().map(PrimitiveElement::Char),
        }
    }

    /// Writes `element` at `index`, narrowing/widening numerically where the
    /// underlying primitive allows it (e.g. an `Int` written into a
    /// `Floats` array is narrowed to `f64`, matching how an unboxed numeric
    /// array write is "the underlying primitive's responsibility").
    pub fn set(&mut self, index: usize, element: PrimitiveElement) -> Result<(), TypeMismatch> {
        if index >= self.len() {
            return Err(TypeMismatch::IndexOutOfBounds);
        }
        match (self, element) {
            (PrimitiveArray::Ints(v), PrimitiveElement::Int(i)) => v[index] = i,
            (PrimitiveArray::Floats(v), PrimitiveElement::Float(f)) => v[index] = f,
            (PrimitiveArray::Floats(v), PrimitiveElement::Int(i)) => v[index] = i as f64,
            (PrimitiveArray::Bools(v), PrimitiveElement::Bool(b)) => v[index] = b,
            (PrimitiveArray::Chars(v), PrimitiveElement::Char(c)) => v[index] = c,
            _ => return Err(TypeMismatch::Kind),
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrimitiveElement {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl fmt::Display for PrimitiveElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveElement::Int(i) => write!(f, "{i}"),
            PrimitiveElement::Float(v) => write!(f, "{v}"),
            PrimitiveElement::Bool(b) => write!(f, "{b}"),
            PrimitiveElement::Char(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeMismatch {
    Kind,
    IndexOutOfBounds,
}
