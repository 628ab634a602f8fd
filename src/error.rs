//! The error taxonomy described in spec §7.
//!
//! Segment readers/writers never propagate failures through `Result` chains
//! that carry full context — they short-circuit by returning a
//! [`DeadEnd`], a lightweight sentinel carrying just the error code, the
//! segment index at which traversal stopped, and a human-readable message.
//! The [`crate::walker::PathWalker`] is the single place a `DeadEnd` is
//! converted into either a suppressed `None`/`false` or a thrown
//! [`TraversalError`] carrying the full path. This keeps the hot traversal
//! path free of path-cloning and try/catch-style overhead, per spec §9.

use std::fmt;

use snafu::Snafu;

use crate::path::Path;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorCode {
    NullValue,
    NoSuchKey,
    NoSuchProperty,
    IndexExpected,
    IndexOutOfBounds,
    EmptySegment,
    TerminalValue,
    TypeMismatch,
    NotModifiable,
    KeyDeserializationFailed,
    Exception,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NullValue => "NULL_VALUE",
            ErrorCode::NoSuchKey => "NO_SUCH_KEY",
            ErrorCode::NoSuchProperty => "NO_SUCH_PROPERTY",
            ErrorCode::IndexExpected => "INDEX_EXPECTED",
            ErrorCode::IndexOutOfBounds => "INDEX_OUT_OF_BOUNDS",
            ErrorCode::EmptySegment => "EMPTY_SEGMENT",
            ErrorCode::TerminalValue => "TERMINAL_VALUE",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::NotModifiable => "NOT_MODIFIABLE",
            ErrorCode::KeyDeserializationFailed => "KEY_DESERIALIZATION_FAILED",
            ErrorCode::Exception => "EXCEPTION",
        };
        f.write_str(s)
    }
}

/// The dead-end sentinel a segment reader/writer returns instead of
/// propagating a fully-contextualized error. Not itself a public error type;
/// see [`TraversalError`] for what callers observe.
#[derive(Clone, Debug)]
pub(crate) struct DeadEnd {
    pub code: ErrorCode,
    pub segment_index: usize,
    pub message: String,
}

impl DeadEnd {
    pub fn new(code: ErrorCode, segment_index: usize, message: impl Into<String>) -> Self {
        DeadEnd {
            code,
            segment_index,
            message: message.into(),
        }
    }
}

/// Thrown by [`crate::walker::PathWalker`] in throw mode. Carries the error
/// code, the offending path, and the segment index traversal stopped at.
#[derive(Clone, Debug, Snafu)]
#[snafu(display("{code} at segment {segment_index} of path `{path}`: {message}"))]
pub struct TraversalError {
    pub code: ErrorCode,
    pub path: Path,
    pub segment_index: usize,
    pub message: String,
}

impl TraversalError {
    pub(crate) fn from_dead_end(path: Path, dead_end: DeadEnd) -> Self {
        TraversalError {
            code: dead_end.code,
            path,
            segment_index: dead_end.segment_index,
            message: dead_end.message,
        }
    }
}
