//! This module contains all of the logic for paths.
//!
//! A [`Path`] is an immutable, ordered sequence of [`Segment`]s pointing at a
//! location inside an object graph, much like a filesystem path points at a
//! location inside a directory tree. Segments are separated by `.`; the
//! escape character is `^`. See [`Path::from`] for the exact grammar.
//!
//! # Example
//! Given the object graph
//! ```json
//! { "foo": { "bar": 1 }, "baz": ["a", "b", "c"] }
//! ```
//! the path `foo.bar` points at `1`, and `baz.0` points at `"a"`.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter, Write as _};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::value::KeyString;

/// One atomic step of a [`Path`].
///
/// A segment is either a key (which may be the empty string, distinct from
/// an absent segment) or the distinguished *null key* sentinel, written
/// `^0` in path syntax. Numeric-looking keys are not a distinct segment
/// kind: whether a segment is treated as a sequence index is decided at
/// traversal time by the segment reader/writer that receives it, based on
/// the structural category of the node it is applied to.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// A string key, possibly empty.
    Key(KeyString),
    /// The null-key sentinel (`^0` in path syntax).
    Null,
}

impl Segment {
    pub fn key(value: &str) -> Self {
        Segment::Key(value.into())
    }

    /// Returns the key string for this segment, if it is not the null
    /// sentinel.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Segment::Null)
    }
}

impl<'a> From<&'a str> for Segment {
    fn from(value: &'a str) -> Self {
        Segment::key(value)
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Segment::Key(value.into())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Snafu)]
pub enum PathParseError {
    #[snafu(display("index {index} out of bounds for path of length {len}"))]
    IndexOutOfBounds { index: isize, len: usize },
}

/// An immutable, ordered sequence of [`Segment`]s.
///
/// `Path`s are cheap to clone and safe to share across threads: segments are
/// never mutated in place, every transformation (`append`, `shift`, `parent`,
/// ...) returns a new `Path`.
#[derive(Clone, Debug, Default)]
pub struct Path {
    segments: Vec<Segment>,
    // Computed lazily and cached, mirroring how the source implementation
    // memoizes `hashCode()` after first use.
    hash: once_cell::sync::OnceCell<u64>,
}

static EMPTY_PATH: Lazy<Path> = Lazy::new(Path::new_empty);

impl Path {
    fn new_empty() -> Self {
        Path {
            segments: Vec::new(),
            hash: once_cell::sync::OnceCell::new(),
        }
    }

    /// The shared empty-path singleton.
    #[must_use]
    pub fn empty() -> Self {
        EMPTY_PATH.clone()
    }

    fn from_segments(segments: Vec<Segment>) -> Self {
        Path {
            segments,
            hash: once_cell::sync::OnceCell::new(),
        }
    }

    /// Build a path from segments taken *verbatim* — no escaping or parsing
    /// is performed, unlike [`Path::from`].
    #[must_use]
    pub fn of<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        Self::from_segments(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a path string using the `^`-escaped, `.`-separated grammar.
    ///
    /// An empty string parses to the shared empty path. Parsing never fails:
    /// any input has a well-defined segment sequence.
    #[must_use]
    pub fn from(source: &str) -> Self {
        if source.is_empty() {
            return Self::empty();
        }
        let segments = split_raw(source).iter().map(|raw| to_segment(raw)).collect();
        Self::from_segments(segments)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True iff non-empty and every segment is non-null and non-empty.
    #[must_use]
    pub fn is_deep_not_empty(&self) -> bool {
        !self.is_empty()
            && self
                .segments
                .iter()
                .all(|s| matches!(s, Segment::Key(k) if !k.is_empty()))
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    fn resolve_index(&self, index: isize) -> Option<usize> {
        let len = self.segments.len() as isize;
        let normalized = if index < 0 { len + index } else { index };
        if normalized < 0 || normalized >= len {
            None
        } else {
            Some(normalized as usize)
        }
    }

    /// Returns the segment at `i`. Negative indices count from the end.
    ///
    /// # Panics
    /// Panics with *index out of bounds* if `i` is out of range. This is a
    /// programmer error on the `Path` API itself, not a traversal dead-end,
    /// and is therefore never suppressed.
    #[must_use]
    pub fn segment(&self, i: isize) -> &Segment {
        match self.resolve_index(i) {
            Some(idx) => &self.segments[idx],
            None => panic!(
                "{}",
                IndexOutOfBoundsSnafu {
                    index: i,
                    len: self.segments.len(),
                }
                .build()
            ),
        }
    }

    /// Returns a sub-path starting at `offset` (negative counts from the
    /// end) with at most `length` segments (`None` means "to the end").
    #[must_use]
    pub fn sub_path(&self, offset: isize, length: Option<usize>) -> Self {
        let len = self.segments.len() as isize;
        let start = if offset < 0 {
            (len + offset).max(0)
        } else {
            offset.min(len)
        } as usize;
        let end = match length {
            Some(l) => (start + l).min(self.segments.len()),
            None => self.segments.len(),
        };
        if start >= end {
            return Self::empty();
        }
        Self::from_segments(self.segments[start..end].to_vec())
    }

    /// Drop the first segment. Returns `None` on an empty path (the source
    /// implementation returns a null reference here; this crate uses `None`
    /// since Rust has no null — see `DESIGN.md`).
    #[must_use]
    pub fn shift(&self) -> Option<Self> {
        match self.segments.len() {
            0 => None,
            1 => Some(Self::empty()),
            _ => Some(Self::from_segments(self.segments[1..].to_vec())),
        }
    }

    /// Drop the last segment. Symmetric to [`Path::shift`].
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.segments.len() {
            0 => None,
            1 => Some(Self::empty()),
            n => Some(Self::from_segments(self.segments[..n - 1].to_vec())),
        }
    }

    #[must_use]
    pub fn append(&self, other: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self::from_segments(segments)
    }

    #[must_use]
    pub fn append_str(&self, other: &str) -> Self {
        self.append(&Path::from(other))
    }

    /// Returns a copy of this path with the segment at `i` replaced.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds, for the same reason as [`Path::segment`].
    #[must_use]
    pub fn replace(&self, i: isize, segment: impl Into<Segment>) -> Self {
        let idx = self.resolve_index(i).unwrap_or_else(|| {
            panic!(
                "{}",
                IndexOutOfBoundsSnafu {
                    index: i,
                    len: self.segments.len(),
                }
                .build()
            )
        });
        let mut segments = self.segments.clone();
        segments[idx] = segment.into();
        Self::from_segments(segments)
    }

    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.reverse();
        Self::from_segments(segments)
    }

    /// Strips every segment that parses as a nonnegative integer (in
    /// arbitrary precision — a 40-digit all-digit segment still counts).
    /// Intended to turn an index-bearing path like `items.3.price` into a
    /// shape-only path like `items.price`, useful for grouping by schema
    /// rather than by instance.
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self::from_segments(
            self.segments
                .iter()
                .filter(|s| !matches!(s, Segment::Key(k) if is_nonnegative_integer(k)))
                .cloned()
                .collect(),
        )
    }

    #[must_use]
    pub fn format(&self) -> String {
        self.to_string()
    }
}

fn is_nonnegative_integer(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Path {}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let cached = *self.hash.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.segments.hash(&mut hasher);
            hasher.finish()
        });
        state.write_u64(cached);
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i != 0 {
                f.write_str(".")?;
            }
            format_segment(segment, f)?;
        }
        Ok(())
    }
}

fn format_segment(segment: &Segment, f: &mut Formatter<'_>) -> fmt::Result {
    match segment {
        Segment::Null => f.write_str("^0"),
        Segment::Key(k) if k.as_str() == "^0" => f.write_str("^^0"),
        Segment::Key(k) => {
            for c in k.chars() {
                match c {
                    '.' => f.write_str("^.")?,
                    '^' => f.write_str("^^")?,
                    other => f.write_char(other)?,
                }
            }
            Ok(())
        }
    }
}

impl FromStr for Path {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::from(s))
    }
}

impl TryFrom<String> for Path {
    type Error = std::convert::Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Path::from(&s))
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(|s| Path::from(&s))
    }
}

/// Splits a path string on unescaped `.` separators, leaving each returned
/// segment still in its escaped, unparsed form. `^.` and `^^` are consumed
/// as atomic two-character units so an escaped dot never becomes a
/// separator.
fn split_raw(source: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '^' {
            current.push('^');
            match chars.peek() {
                Some('.') | Some('^') => {
                    current.push(chars.next().expect("peeked"));
                }
                _ => {}
            }
        } else if c == '.' {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    segments.push(current);
    segments
}

/// Converts one raw (still-escaped) segment into a `Segment`, recognizing
/// the `^0` null-key sentinel before unescaping anything else.
fn to_segment(raw: &str) -> Segment {
    if raw == "^0" {
        return Segment::Null;
    }
    Segment::Key(unescape(raw).into())
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '^' {
            match chars.peek() {
                Some('.') => {
                    out.push('.');
                    chars.next();
                }
                Some('^') => {
                    out.push('^');
                    chars.next();
                }
                _ => out.push('^'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(any(test, feature = "arbitrary"))]
impl quickcheck::Arbitrary for Segment {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        if bool::arbitrary(g) {
            Segment::Null
        } else {
            Segment::Key(KeyString::arbitrary(g))
        }
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl quickcheck::Arbitrary for Path {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let len = usize::arbitrary(g) % 6;
        Path::from_segments((0..len).map(|_| Segment::arbitrary(g)).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_string_is_empty_path() {
        let path = Path::from("");
        assert_eq!(path.size(), 0);
        assert!(path.is_empty());
        assert_eq!(path, Path::empty());
    }

    #[test]
    fn simple_segments() {
        let path = Path::from("foo.bar.bozo");
        assert_eq!(path.size(), 3);
        assert_eq!(path.segment(0).as_key(), Some("foo"));
        assert_eq!(path.segment(1).as_key(), Some("bar"));
        assert_eq!(path.segment(-1).as_key(), Some("bozo"));
    }

    /// S4 from the test matrix: `a.^0.b` has segments `["a", null, "b"]`.
    #[test]
    fn null_key_segment() {
        let path = Path::from("a.^0.b");
        assert_eq!(path.size(), 3);
        assert_eq!(path.segment(0).as_key(), Some("a"));
        assert!(path.segment(1).is_null());
        assert_eq!(path.segment(2).as_key(), Some("b"));
    }

    /// S5 from the test matrix: `a..b` has segments `["a", "", "b"]`.
    #[test]
    fn empty_segment_preserved() {
        let path = Path::from("a..b");
        assert_eq!(path.size(), 3);
        assert_eq!(path.segment(1).as_key(), Some(""));
    }

    #[test]
    fn leading_and_trailing_dot() {
        assert_eq!(Path::from(".b").size(), 2);
        assert_eq!(Path::from("a.").size(), 2);
    }

    #[test]
    fn escaped_dot_is_literal() {
        let path = Path::from("a^.b.c");
        assert_eq!(path.size(), 2);
        assert_eq!(path.segment(0).as_key(), Some("a.b"));
        assert_eq!(path.segment(1).as_key(), Some("c"));
    }

    #[test]
    fn literal_caret_key_round_trips_distinct_from_null() {
        let literal = Path::from("a.^^0.b");
        assert_eq!(literal.segment(1).as_key(), Some("^0"));

        let null = Path::from("a.^0.b");
        assert!(null.segment(1).is_null());

        assert_eq!(literal.format(), "a.^^0.b");
        assert_eq!(null.format(), "a.^0.b");
    }

    #[test]
    fn format_round_trips() {
        for source in [
            "foo.bar.bozo",
            "a.^0.b",
            "a..b",
            ".b",
            "a.",
            "a^.b.c",
            "a.^^0.b",
            "a^^b",
        ] {
            let parsed = Path::from(source);
            let reparsed = Path::from(&parsed.format());
            assert_eq!(parsed, reparsed, "round trip failed for {source:?}");
        }
    }

    #[test]
    fn shift_and_parent() {
        let path = Path::from("a.b.c");
        assert_eq!(path.shift().unwrap(), Path::from("b.c"));
        assert_eq!(path.parent().unwrap(), Path::from("a.b"));

        let single = Path::from("a");
        assert_eq!(single.shift().unwrap(), Path::empty());
        assert_eq!(single.parent().unwrap(), Path::empty());

        assert_eq!(Path::empty().shift(), None);
        assert_eq!(Path::empty().parent(), None);
    }

    #[test]
    fn sub_path_negative_offset() {
        let path = Path::from("a.b.c.d");
        assert_eq!(path.sub_path(-2, None), Path::from("c.d"));
        assert_eq!(path.sub_path(1, Some(2)), Path::from("b.c"));
    }

    #[test]
    fn canonical_strips_integer_segments() {
        let path = Path::from("orders.3.items.0.price");
        assert_eq!(path.canonical(), Path::from("orders.items.price"));
    }

    #[test]
    fn is_deep_not_empty() {
        assert!(Path::from("a.b").is_deep_not_empty());
        assert!(!Path::from("a..b").is_deep_not_empty());
        assert!(!Path::from("a.^0").is_deep_not_empty());
        assert!(!Path::empty().is_deep_not_empty());
    }

    #[test]
    #[should_panic]
    fn segment_out_of_bounds_panics() {
        let path = Path::from("a.b");
        let _ = path.segment(5);
    }

    quickcheck::quickcheck! {
        fn round_trips_for_arbitrary_paths(path: Path) -> bool {
            // A path consisting of a single empty-string segment cannot be
            // told apart from the zero-segment empty path once formatted,
            // since both render to the empty string. This is an inherent
            // grammar ambiguity (see DESIGN.md), not a bug, so it is the one
            // shape excluded from this property.
            if path.size() == 1 && path.segment(0).as_key() == Some("") {
                return true;
            }
            Path::from(&path.format()) == path
        }
    }
}
