//! Raw constraint violations as a rule engine reports them.
//!
//! This module provides [`RawFailure`] for a single violated constraint,
//! [`RawFailures`] for a non-empty batch, and the [`FieldFailure`] trait that
//! the mapper accepts so failures from any rule engine can be mapped.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::kind::Kind;

/// The input boundary of the mapper: anything that names a failing member
/// by its internal path and says which rule it violated.
pub trait FieldFailure {
    /// Dot-separated internal member names, root excluded.
    fn internal_path(&self) -> &str;

    /// Identifier of the violated rule, e.g. `required`.
    fn rule(&self) -> &str;

    /// The rule's parameter, empty when it takes none.
    fn param(&self) -> &str;
}

impl<T: FieldFailure + ?Sized> FieldFailure for &T {
    fn internal_path(&self) -> &str {
        (**self).internal_path()
    }

    fn rule(&self) -> &str {
        (**self).rule()
    }

    fn param(&self) -> &str {
        (**self).param()
    }
}

/// One constraint violation.
///
/// # Example
///
/// ```rust
/// use tagpath::{FieldFailure, Kind, RawFailure};
///
/// let failure = RawFailure::new("Server.Port", "max")
///     .with_param("65535")
///     .with_kind(Kind::Uint);
///
/// assert_eq!(failure.internal_path(), "Server.Port");
/// assert_eq!(failure.rule(), "max");
/// assert_eq!(failure.param(), "65535");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure {
    /// Dot-separated internal member names, root excluded.
    pub internal_path: String,
    /// Identifier of the violated rule.
    pub rule: String,
    /// The rule's parameter, empty when it takes none.
    pub param: String,
    /// Kind of the failing value. Informational only.
    pub kind: Kind,
}

impl RawFailure {
    /// Creates a failure with an empty parameter and [`Kind::Invalid`].
    pub fn new(internal_path: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            internal_path: internal_path.into(),
            rule: rule.into(),
            param: String::new(),
            kind: Kind::Invalid,
        }
    }

    /// Sets the rule parameter and returns self for chaining.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Sets the failing value's kind and returns self for chaining.
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }
}

impl FieldFailure for RawFailure {
    fn internal_path(&self) -> &str {
        &self.internal_path
    }

    fn rule(&self) -> &str {
        &self.rule
    }

    fn param(&self) -> &str {
        &self.param
    }
}

impl Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: failed '{}'", self.internal_path, self.rule)?;
        if !self.param.is_empty() {
            write!(f, "={}", self.param)?;
        }
        Ok(())
    }
}

/// A non-empty, ordered batch of raw failures.
///
/// This is the failure side of the rule engine's `Validation`. Batches
/// combine through `Semigroup`, keeping insertion order.
///
/// ```rust
/// use tagpath::{RawFailure, RawFailures};
/// use stillwater::prelude::*;
///
/// let first = RawFailures::single(RawFailure::new("Log.Level", "oneof"));
/// let second = RawFailures::single(RawFailure::new("Server.Port", "required"));
///
/// let combined = first.combine(second);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined.first().internal_path, "Log.Level");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailures(NonEmptyVec<RawFailure>);

impl RawFailures {
    /// Creates a batch containing a single failure.
    pub fn single(failure: RawFailure) -> Self {
        Self(NonEmptyVec::singleton(failure))
    }

    /// Creates a batch from a `Vec`, or `None` if it is empty.
    pub fn from_vec(failures: Vec<RawFailure>) -> Option<Self> {
        NonEmptyVec::from_vec(failures).map(Self)
    }

    /// Returns the number of failures in this batch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a batch holds at least one failure.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the failures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RawFailure> {
        self.0.iter()
    }

    /// Returns the first failure.
    pub fn first(&self) -> &RawFailure {
        self.0.head()
    }

    /// Returns all failures of the given rule.
    pub fn with_rule(&self, rule: &str) -> Vec<&RawFailure> {
        self.0.iter().filter(|f| f.rule == rule).collect()
    }

    /// Returns all failures at the given internal path.
    pub fn at_path(&self, internal_path: &str) -> Vec<&RawFailure> {
        self.0
            .iter()
            .filter(|f| f.internal_path == internal_path)
            .collect()
    }

    pub fn into_vec(self) -> Vec<RawFailure> {
        self.0.into_vec()
    }
}

impl Semigroup for RawFailures {
    fn combine(self, other: Self) -> Self {
        RawFailures(self.0.combine(other.0))
    }
}

impl Display for RawFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} constraint(s) violated:", self.len())?;
        for (i, failure) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for RawFailures {}

impl IntoIterator for RawFailures {
    type Item = RawFailure;
    type IntoIter = std::vec::IntoIter<RawFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a RawFailures {
    type Item = &'a RawFailure;
    type IntoIter = Box<dyn Iterator<Item = &'a RawFailure> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<RawFailures>();
    assert_sync::<RawFailures>();
};
