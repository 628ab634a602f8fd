use std::fmt;

/// A leaf value: not a mapping, array, sequence, or record. Scalars are
/// always classified as a terminal value, since they carry no accessors.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bytes(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Bytes(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Bytes(s)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bytes(s) => write!(f, "{s}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Boolean(b) => write!(f, "{b}"),
        }
    }
}
