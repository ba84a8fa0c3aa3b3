//! Field path representation for locating members in nested structures.
//!
//! This module provides [`FieldPath`] and [`PathSegment`]. The same type is used
//! for internal paths (member names as a rule engine reports them) and for the
//! public paths produced by resolution.

use std::fmt::{self, Display};

/// A segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A struct member (e.g., `Server`, `port`)
    Field(String),
    /// A slice element (e.g., `[0]`)
    Index(usize),
    /// A map entry (e.g., `[env]`)
    Key(String),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }

    /// Creates a new map key segment.
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }
}

/// A path to a member in a nested structure, root excluded.
///
/// # Example
///
/// ```rust
/// use tagpath::FieldPath;
///
/// let path = FieldPath::root()
///     .push_field("servers")
///     .push_index(0)
///     .push_field("port");
///
/// assert_eq!(path.to_string(), "servers[0].port");
/// assert_eq!(FieldPath::parse("servers[0].port"), path);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Parses a dotted path such as `Server.Port` or `Items[2].Labels[env]`.
    ///
    /// Each dot-separated part is a member name followed by any number of
    /// `[..]` suffixes; numeric suffixes become [`PathSegment::Index`], the
    /// rest [`PathSegment::Key`]. A part that does not have this shape is
    /// kept whole as a field name. Dots inside `[..]` belong to the key.
    /// An empty input is the root path.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::root();
        }

        let mut segments = Vec::new();
        for part in split_parts(raw) {
            match split_brackets(part) {
                Some((name, suffixes)) => {
                    segments.push(PathSegment::Field(name.to_string()));
                    segments.extend(suffixes);
                }
                None => segments.push(PathSegment::Field(part.to_string())),
            }
        }
        Self { segments }
    }

    /// Parses a namespace that still starts with the root type name, such as
    /// `Config.Server.Port`, dropping that first part.
    pub fn parse_namespace(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((_, rest)) => Self::parse(rest),
            None => Self::root(),
        }
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        self.with_segment(PathSegment::Field(name.into()))
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        self.with_segment(PathSegment::Index(index))
    }

    /// Returns a new path with a map key segment appended.
    pub fn push_key(&self, key: impl Into<String>) -> Self {
        self.with_segment(PathSegment::Key(key.into()))
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    fn with_segment(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path (all segments except the last), or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                PathSegment::Key(key) => write!(f, "[{}]", key)?,
            }
        }
        Ok(())
    }
}

/// Splits on dots that are not inside `[..]`.
fn split_parts(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in raw.bytes().enumerate() {
        match b {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}

/// Splits `Items[0][key]` into `("Items", [Index(0), Key("key")])`.
///
/// Returns `None` when the part has no brackets or they are malformed.
fn split_brackets(part: &str) -> Option<(&str, Vec<PathSegment>)> {
    let open = part.find('[')?;
    let name = &part[..open];
    if name.is_empty() {
        return None;
    }

    let mut suffixes = Vec::new();
    let mut rest = &part[open..];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let content = &inner[..close];
        if content.is_empty() || content.contains('[') {
            return None;
        }
        suffixes.push(match content.parse::<usize>() {
            Ok(idx) => PathSegment::Index(idx),
            Err(_) => PathSegment::Key(content.to_string()),
        });
        rest = &inner[close + 1..];
    }
    Some((name, suffixes))
}
