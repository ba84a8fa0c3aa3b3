//! Value kinds reported by the object model.

use std::fmt::{self, Display};

/// The structural kind of a value in the object model.
///
/// Kinds drive traversal: only [`Kind::Struct`] values have named members,
/// [`Kind::Pointer`] values are dereferenced before inspection, and
/// [`Kind::Slice`] / [`Kind::Map`] values can be indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No value at all, e.g. the target of an empty optional reference.
    Invalid,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Struct,
    /// An optional reference (`Option<T>`).
    Pointer,
    Slice,
    Map,
}

impl Kind {
    /// Returns the lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Struct => "struct",
            Kind::Pointer => "ptr",
            Kind::Slice => "slice",
            Kind::Map => "map",
        }
    }

    /// Returns true for the numeric kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Int | Kind::Uint | Kind::Float)
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
