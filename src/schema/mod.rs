//! The object model: per-type member tables and structural access to values.
//!
//! There is no runtime reflection in Rust, so each struct type describes
//! itself. A [`TypeSchema`] lists the type's members and their tags, and
//! the [`Reflect`] trait lets traversal code step through a value without
//! knowing its concrete type.

mod reflect;
mod type_schema;

pub use reflect::{deref, is_zero, Reflect, Scalar};
pub use type_schema::{FieldDef, PublicName, TypeSchema, OMIT_SENTINEL};
