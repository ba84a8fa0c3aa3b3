//! Mapping raw failures to public field errors.
//!
//! [`ErrorMapper`] takes the failures a rule engine produced for one root
//! object, resolves each failure's internal path into a public path through
//! the configured tag, and pairs it with a message from a
//! [`MessageCatalog`]. Mapping is all-or-nothing: the first
//! [`MappingError`] aborts the whole batch.

use std::sync::Arc;

use stillwater::Validation;

use crate::error::{ApiError, Error, FieldError, FieldFailure, MappingError};
use crate::kind::Kind;
use crate::message::MessageCatalog;
use crate::resolve::resolve_field_path;
use crate::rules::Validator;
use crate::schema::{deref, Reflect};

/// Tag key used for public names unless overridden.
pub const DEFAULT_TAG: &str = "json";

/// Converts raw failures into ordered `{field, message}` pairs.
///
/// # Example
///
/// ```rust
/// use tagpath::{reflect_struct, ErrorMapper, FieldError, RawFailure};
///
/// struct Server { port: u16 }
/// struct Config { server: Server }
///
/// reflect_struct!(Server { port as "Port": r#"json:"port" query:"p""# });
/// reflect_struct!(Config { server as "Server": r#"json:"server" query:"srv""# });
///
/// let config = Config { server: Server { port: 0 } };
/// let failures = vec![RawFailure::new("Server.Port", "required")];
///
/// let mapper = ErrorMapper::new();
/// assert_eq!(
///     mapper.map(&failures, &config).unwrap(),
///     vec![FieldError::new("server.port", "This field is required.")]
/// );
///
/// let by_query = mapper.map_with_tag(&failures, &config, Some("query")).unwrap();
/// assert_eq!(by_query[0].field, "srv.p");
/// ```
#[derive(Debug, Clone)]
pub struct ErrorMapper {
    tag: String,
    catalog: Arc<MessageCatalog>,
}

impl ErrorMapper {
    /// Creates a mapper using the `json` tag and the standard catalog.
    pub fn new() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            catalog: MessageCatalog::standard(),
        }
    }

    /// Sets the default tag key. An empty tag keeps the current one.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !tag.is_empty() {
            self.tag = tag;
        }
        self
    }

    /// Uses `catalog` for messages.
    pub fn with_catalog(mut self, catalog: impl Into<Arc<MessageCatalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// The default tag key.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Maps `failures` against `root` using the mapper's tag.
    pub fn map<I>(&self, failures: I, root: &dyn Reflect) -> Result<Vec<FieldError>, MappingError>
    where
        I: IntoIterator,
        I::Item: FieldFailure,
    {
        self.map_with_tag(failures, root, None)
    }

    /// Maps `failures` against `root`, resolving names through `tag` when it
    /// is given and non-empty.
    ///
    /// Output order follows input order. Failures whose public path resolves
    /// to nothing are dropped.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::NonTraversableType` before looking at any failure
    /// if `root` is not a struct (or a reference to one), and otherwise the
    /// first error any failure's path produces.
    pub fn map_with_tag<I>(
        &self,
        failures: I,
        root: &dyn Reflect,
        tag: Option<&str>,
    ) -> Result<Vec<FieldError>, MappingError>
    where
        I: IntoIterator,
        I::Item: FieldFailure,
    {
        let tag = match tag {
            Some(tag) if !tag.is_empty() => tag,
            _ => self.tag.as_str(),
        };

        let root = match deref(root) {
            Some(value) if value.kind() == Kind::Struct => value,
            Some(value) => {
                return Err(fail(MappingError::non_traversable(value.kind()), "", tag));
            }
            None => return Err(fail(MappingError::non_traversable(Kind::Invalid), "", tag)),
        };

        let mut errors = Vec::new();
        for failure in failures {
            let path = resolve_field_path(root, failure.internal_path(), tag)
                .map_err(|e| fail(e, failure.internal_path(), tag))?;

            if path.is_empty() {
                tracing::debug!(
                    target: "tagpath::mapper",
                    internal_path = failure.internal_path(),
                    rule = failure.rule(),
                    tag,
                    "dropping failure without a public field path"
                );
                continue;
            }

            errors.push(FieldError::new(
                path.to_string(),
                self.catalog.format(failure.rule(), failure.param()),
            ));
        }

        tracing::debug!(target: "tagpath::mapper", tag, mapped = errors.len(), "mapped validation failures");
        Ok(errors)
    }

    /// Maps `failures` and wraps them into the standard API error body.
    pub fn map_to_api_error<I>(&self, failures: I, root: &dyn Reflect) -> Result<ApiError, MappingError>
    where
        I: IntoIterator,
        I::Item: FieldFailure,
    {
        self.map(failures, root).map(ApiError::validation)
    }

    /// Validates `root` with `validator` and maps any failures.
    ///
    /// Returns `Validation::Success` when every rule holds. If all failures
    /// were dropped as having no public path, the result is also a success.
    pub fn report(
        &self,
        validator: &Validator,
        root: &dyn Reflect,
    ) -> Result<Validation<(), ApiError>, Error> {
        let failures = match validator.validate(root)? {
            Validation::Success(()) => return Ok(Validation::Success(())),
            Validation::Failure(failures) => failures,
        };

        let details = self.map(&failures, root)?;
        if details.is_empty() {
            Ok(Validation::Success(()))
        } else {
            Ok(Validation::Failure(ApiError::validation(details)))
        }
    }
}

fn fail(error: MappingError, internal_path: &str, tag: &str) -> MappingError {
    tracing::error!(
        target: "tagpath::mapper",
        %error,
        internal_path,
        tag,
        "validation failures do not match the object's structure"
    );
    error
}

impl Default for ErrorMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps `failures` against `root` with a default [`ErrorMapper`].
///
/// `tag` overrides the `json` tag when given and non-empty.
pub fn map_validation_errors<I>(
    failures: I,
    root: &dyn Reflect,
    tag: Option<&str>,
) -> Result<Vec<FieldError>, MappingError>
where
    I: IntoIterator,
    I::Item: FieldFailure,
{
    ErrorMapper::new().map_with_tag(failures, root, tag)
}
