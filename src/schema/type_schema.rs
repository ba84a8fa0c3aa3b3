//! Per-type member tables.
//!
//! A [`TypeSchema`] records, for one struct type, its members in declaration
//! order together with their parsed [`StructTag`]s. Schemas are built once per
//! type (usually by [`reflect_struct!`](crate::reflect_struct)) and shared
//! read-only afterwards.

use indexmap::IndexMap;

use crate::tag::StructTag;

/// Tag value meaning "this member has no external name".
pub const OMIT_SENTINEL: &str = "-";

/// The external name of a member under a given tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicName<'a> {
    /// The member is addressable under this name.
    Named(&'a str),
    /// The member's tag is the omit sentinel.
    Omitted,
}

/// A single member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    tag: StructTag,
}

impl FieldDef {
    /// Creates a member definition with an already parsed tag.
    pub fn new(name: impl Into<String>, tag: StructTag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    /// The internal member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member's tag.
    pub fn tag(&self) -> &StructTag {
        &self.tag
    }

    /// Resolves the member's external name under the tag `key`.
    ///
    /// Only the primary component of the tag value counts. A missing key,
    /// an empty value, or an empty primary component all fall back to the
    /// internal member name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagpath::{FieldDef, PublicName, StructTag};
    ///
    /// let host = FieldDef::new("Host", StructTag::parse(r#"json:"host,omitempty""#));
    /// assert_eq!(host.public_name("json"), PublicName::Named("host"));
    /// assert_eq!(host.public_name("form"), PublicName::Named("Host"));
    ///
    /// let secret = FieldDef::new("Password", StructTag::parse(r#"json:"-""#));
    /// assert_eq!(secret.public_name("json"), PublicName::Omitted);
    /// ```
    pub fn public_name(&self, key: &str) -> PublicName<'_> {
        match self.tag.name(key) {
            Some(OMIT_SENTINEL) => PublicName::Omitted,
            Some(name) if !name.is_empty() => PublicName::Named(name),
            _ => PublicName::Named(&self.name),
        }
    }
}

/// The member table of a struct type.
///
/// # Example
///
/// ```rust
/// use tagpath::TypeSchema;
///
/// let schema = TypeSchema::new("Server")
///     .field("Port", r#"json:"port" validate:"required,min=1,max=65535""#)
///     .field("Debug", "");
///
/// assert_eq!(schema.name(), "Server");
/// assert_eq!(schema.len(), 2);
/// assert!(schema.get("Port").is_some());
/// assert!(schema.get("port").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    name: String,
    fields: IndexMap<String, FieldDef>,
}

impl TypeSchema {
    /// Creates an empty schema for the type `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Adds a member, parsing `tag` as a struct tag string.
    pub fn field(self, name: impl Into<String>, tag: &str) -> Self {
        self.field_def(FieldDef::new(name, StructTag::parse(tag)))
    }

    /// Adds a prebuilt member definition. A member with the same name is
    /// replaced in place.
    pub fn field_def(mut self, def: FieldDef) -> Self {
        self.fields.insert(def.name.clone(), def);
        self
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a member by its internal name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Iterates over members in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
