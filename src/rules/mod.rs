//! A declarative rule engine driven by struct tags.
//!
//! [`Validator`] reads the rule list from each member's `validate` tag, walks
//! the object graph, and reports the first violated rule of each member as a
//! [`RawFailure`]. Failures across members accumulate; only configuration
//! errors ([`RuleError`]) abort the run.
//!
//! # Example
//!
//! ```rust
//! use tagpath::{reflect_struct, Validator};
//!
//! struct Server {
//!     port: u16,
//!     request_timeout_seconds: u16,
//! }
//!
//! reflect_struct!(Server {
//!     port as "Port": r#"json:"port" validate:"required,min=1,max=65535""#,
//!     request_timeout_seconds as "RequestTimeoutSeconds": r#"validate:"required,min=1,max=60""#,
//! });
//!
//! let validator = Validator::new();
//! let result = validator
//!     .validate(&Server { port: 0, request_timeout_seconds: 90 })
//!     .unwrap();
//!
//! let failures = result.into_result().unwrap_err();
//! assert_eq!(failures.len(), 2);
//! assert_eq!(failures.first().internal_path, "Port");
//! assert_eq!(failures.first().rule, "required");
//! ```

mod builtin;
mod constraint;

pub use constraint::{Constraint, RuleSet};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use stillwater::Validation;

use crate::error::{RawFailure, RawFailures};
use crate::kind::Kind;
use crate::path::FieldPath;
use crate::schema::{deref, is_zero, Reflect, Scalar};
use crate::ValidationResult;

use builtin::{Builtin, CheckError};

/// Tag key rules are read from by default.
pub const DEFAULT_RULE_TAG: &str = "validate";

/// Signature of a custom rule: returns true when the value is valid.
pub type RuleFn = dyn Fn(&dyn Reflect) -> bool + Send + Sync;

type RuleMap = Arc<RwLock<HashMap<String, Arc<RuleFn>>>>;

const MARKERS: [&str; 3] = ["omitempty", "dive", "-"];

/// Walks structs and evaluates their tag-declared rules.
///
/// # Thread Safety
///
/// Custom rules live behind an `Arc<RwLock<...>>`: clones share them, many
/// threads can validate at once, and registration only briefly takes the
/// write lock.
#[derive(Clone)]
pub struct Validator {
    tag: String,
    custom: RuleMap,
}

impl Validator {
    /// Creates a validator reading the `validate` tag, with the
    /// `request_id_header` rule registered.
    pub fn new() -> Self {
        let validator = Self::empty();
        validator.custom.write().insert(
            "request_id_header".to_string(),
            Arc::new(is_request_id_header),
        );
        validator
    }

    /// Creates a validator with no custom rules.
    pub fn empty() -> Self {
        Self {
            tag: DEFAULT_RULE_TAG.to_string(),
            custom: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Reads rules from `tag` instead of `validate`.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// The tag key rules are read from.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Registers a custom rule.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::DuplicateRule` if `name` is already registered,
    /// names a built-in rule, or is one of the `omitempty`, `dive` and `-` markers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagpath::{Reflect, Validator};
    ///
    /// let validator = Validator::new();
    /// validator
    ///     .register_rule("even", |v: &dyn Reflect| {
    ///         v.scalar().and_then(|s| s.as_f64()).is_some_and(|n| n % 2.0 == 0.0)
    ///     })
    ///     .unwrap();
    ///
    /// assert!(validator.has_rule("even"));
    /// assert!(validator.register_rule("even", |_: &dyn Reflect| true).is_err());
    /// assert!(validator.register_rule("required", |_: &dyn Reflect| true).is_err());
    /// ```
    pub fn register_rule<F>(&self, name: impl Into<String>, rule: F) -> Result<(), RuleError>
    where
        F: Fn(&dyn Reflect) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        if Builtin::NAMES.contains(&name.as_str()) || MARKERS.contains(&name.as_str()) {
            return Err(RuleError::DuplicateRule(name));
        }

        let mut custom = self.custom.write();
        if custom.contains_key(&name) {
            return Err(RuleError::DuplicateRule(name));
        }
        tracing::debug!(target: "tagpath::rules", rule = %name, "registered custom rule");
        custom.insert(name, Arc::new(rule));
        Ok(())
    }

    /// Returns true if `name` is a built-in or registered rule.
    pub fn has_rule(&self, name: &str) -> bool {
        Builtin::parse(name).is_some() || self.custom.read().contains_key(name)
    }

    /// Validates `root`, which must be a struct or a reference to one.
    ///
    /// Members are visited in declaration order. Each member reports at most
    /// one failure, for the first rule it violates, and nested structs are
    /// walked only when the member holding them passed its own rules.
    ///
    /// # Errors
    ///
    /// Returns a `RuleError` when a root is not a struct or a tag names an
    /// unknown rule, carries an unusable parameter, or applies a rule to a
    /// kind it cannot check.
    pub fn validate(&self, root: &dyn Reflect) -> Result<ValidationResult<()>, RuleError> {
        let result = self.collect(root);
        match &result {
            Ok(failures) => {
                tracing::debug!(
                    target: "tagpath::rules",
                    failures = failures.len(),
                    "validation finished"
                );
            }
            Err(error) => {
                tracing::error!(target: "tagpath::rules", %error, "validation rules are misconfigured");
            }
        }

        Ok(match RawFailures::from_vec(result?) {
            Some(failures) => Validation::Failure(failures),
            None => Validation::Success(()),
        })
    }

    fn collect(&self, root: &dyn Reflect) -> Result<Vec<RawFailure>, RuleError> {
        let value = deref(root).ok_or(RuleError::NotAStruct { kind: Kind::Invalid })?;
        if value.kind() != Kind::Struct {
            return Err(RuleError::NotAStruct { kind: value.kind() });
        }

        let mut failures = Vec::new();
        self.walk_struct(value, &FieldPath::root(), &mut failures)?;
        Ok(failures)
    }

    fn walk_struct(
        &self,
        value: &dyn Reflect,
        path: &FieldPath,
        out: &mut Vec<RawFailure>,
    ) -> Result<(), RuleError> {
        let Some(schema) = value.schema() else {
            return Ok(());
        };

        for def in schema.fields() {
            let Some(member) = value.field(def.name()) else {
                continue;
            };
            let rules = RuleSet::parse(def.tag().lookup(&self.tag).unwrap_or_default());
            self.apply(&rules, member, &path.push_field(def.name()), out)?;
        }
        Ok(())
    }

    fn apply(
        &self,
        rules: &RuleSet,
        value: &dyn Reflect,
        path: &FieldPath,
        out: &mut Vec<RawFailure>,
    ) -> Result<(), RuleError> {
        if rules.skip || (rules.omit_empty && is_zero(value)) {
            return Ok(());
        }

        for constraint in &rules.constraints {
            if !self.check(constraint, value, path)? {
                out.push(
                    RawFailure::new(path.to_string(), constraint.rule.as_str())
                        .with_param(constraint.param.as_str())
                        .with_kind(value.kind()),
                );
                return Ok(());
            }
        }

        match &rules.elements {
            Some(element_rules) => self.dive(element_rules, value, path, out),
            None => match deref(value) {
                Some(inner) if inner.kind() == Kind::Struct => self.walk_struct(inner, path, out),
                _ => Ok(()),
            },
        }
    }

    fn dive(
        &self,
        rules: &RuleSet,
        value: &dyn Reflect,
        path: &FieldPath,
        out: &mut Vec<RawFailure>,
    ) -> Result<(), RuleError> {
        let Some(target) = deref(value) else {
            return Ok(());
        };
        if target.kind() != Kind::Slice {
            return Err(RuleError::UnsupportedKind {
                rule: "dive".to_string(),
                kind: target.kind(),
                field: path.to_string(),
            });
        }

        for idx in 0..target.length().unwrap_or(0) {
            if let Some(element) = target.index(idx) {
                self.apply(rules, element, &path.push_index(idx), out)?;
            }
        }
        Ok(())
    }

    fn check(
        &self,
        constraint: &Constraint,
        value: &dyn Reflect,
        path: &FieldPath,
    ) -> Result<bool, RuleError> {
        if let Some(builtin) = Builtin::parse(&constraint.rule) {
            return builtin.check(value, &constraint.param).map_err(|e| match e {
                CheckError::InvalidParam => RuleError::InvalidParam {
                    rule: constraint.rule.clone(),
                    param: constraint.param.clone(),
                    field: path.to_string(),
                },
                CheckError::UnsupportedKind(kind) => RuleError::UnsupportedKind {
                    rule: constraint.rule.clone(),
                    kind,
                    field: path.to_string(),
                },
            });
        }

        let custom = self.custom.read().get(&constraint.rule).cloned();
        match custom {
            Some(rule) => Ok(rule(value)),
            None => Err(RuleError::UnknownRule {
                rule: constraint.rule.clone(),
                field: path.to_string(),
            }),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<_> = self.custom.read().keys().cloned().collect();
        rules.sort();
        f.debug_struct("Validator")
            .field("tag", &self.tag)
            .field("custom_rules", &rules)
            .finish()
    }
}

fn is_request_id_header(value: &dyn Reflect) -> bool {
    match deref(value).and_then(|v| v.scalar()) {
        Some(Scalar::Str(s)) => builtin::request_id_header().is_match(s),
        _ => false,
    }
}

/// Errors in the rule configuration itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A tag names a rule that is neither built in nor registered.
    #[error("unknown rule '{rule}' on field '{field}'")]
    UnknownRule { rule: String, field: String },

    /// A rule parameter could not be parsed.
    #[error("invalid parameter '{param}' for rule '{rule}' on field '{field}'")]
    InvalidParam {
        rule: String,
        param: String,
        field: String,
    },

    /// A rule was applied to a kind of value it cannot check.
    #[error("rule '{rule}' cannot be applied to a {kind} (field '{field}')")]
    UnsupportedKind {
        rule: String,
        kind: Kind,
        field: String,
    },

    /// Attempted to register a rule under a name that is already taken.
    #[error("rule '{0}' already registered")]
    DuplicateRule(String),

    /// The validated root is not a struct.
    #[error("expected a struct but got a {kind}")]
    NotAStruct { kind: Kind },
}
