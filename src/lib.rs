//! # tagpath
//!
//! Turns low-level field validation failures into a stable list of
//! `{field, message}` pairs whose field paths use each member's external
//! (tag) name instead of its internal one.
//!
//! ## Overview
//!
//! A rule engine reports failures by internal member path, e.g.
//! `Server.Port`. API consumers know the same member by its serialized
//! name, e.g. `server.port`. tagpath walks the validated object along the
//! internal path, resolves every segment through a configurable struct tag
//! (`json` by default), and pairs the result with a human-readable message.
//! A path that does not match the object's shape is a [`MappingError`] and
//! aborts the whole batch.
//!
//! ## Core Types
//!
//! - [`TypeSchema`] and [`Reflect`]: the per-type member tables and structural
//!   access that stand in for runtime reflection; [`reflect_struct!`] derives both
//! - [`FieldPath`]: internal and public paths (e.g. `replicas[0].port`)
//! - [`Validator`]: a tag-driven rule engine producing [`RawFailures`]
//! - [`ErrorMapper`]: maps failures to [`FieldError`]s and [`ApiError`] bodies
//! - [`MessageCatalog`]: rule identifier to message templates
//!
//! ## Example
//!
//! ```rust
//! use tagpath::{reflect_struct, ErrorMapper, Validator};
//! use stillwater::Validation;
//!
//! struct Server {
//!     port: u16,
//! }
//!
//! struct Config {
//!     server: Server,
//! }
//!
//! reflect_struct!(Server {
//!     port as "Port": r#"json:"port" validate:"required,min=1,max=65535""#,
//! });
//! reflect_struct!(Config {
//!     server as "Server": r#"json:"server" validate:"required""#,
//! });
//!
//! let config = Config { server: Server { port: 0 } };
//! let report = ErrorMapper::new().report(&Validator::new(), &config).unwrap();
//!
//! match report {
//!     Validation::Failure(body) => {
//!         assert_eq!(
//!             serde_json::to_string(&body).unwrap(),
//!             r#"{"message":"Validation failed.","details":[{"field":"server","message":"This field is required."}]}"#
//!         );
//!     }
//!     Validation::Success(()) => unreachable!(),
//! }
//! ```

pub mod error;
pub mod kind;
pub mod mapper;
pub mod message;
pub mod path;
pub mod resolve;
pub mod rules;
pub mod schema;
pub mod tag;

pub use error::{
    ApiError, Error, FieldError, FieldFailure, MappingError, RawFailure, RawFailures,
    VALIDATION_FAILED,
};
pub use kind::Kind;
pub use mapper::{map_validation_errors, ErrorMapper, DEFAULT_TAG};
pub use message::{format_rule_message, MessageCatalog, MessageTemplate, FALLBACK_MESSAGE};
pub use path::{FieldPath, PathSegment};
pub use resolve::{resolve_field_path, resolve_path};
pub use rules::{RuleError, Validator, DEFAULT_RULE_TAG};
pub use schema::{FieldDef, PublicName, Reflect, Scalar, TypeSchema, OMIT_SENTINEL};
pub use tag::StructTag;

/// Type alias for rule engine results.
pub type ValidationResult<T> = stillwater::Validation<T, RawFailures>;
