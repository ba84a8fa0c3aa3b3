//! The [`Reflect`] trait: read-only structural access to values.
//!
//! Resolution and rule evaluation never need to know the concrete Rust type
//! of a value. They only need its [`Kind`], the [`TypeSchema`] of structs,
//! and a way to step into members, elements and optional references.
//! Implementations are provided for the primitive types, `String`, `Option`,
//! `Box`, references, `Vec`, arrays and string-keyed maps. Structs implement
//! it with [`reflect_struct!`](crate::reflect_struct) or by hand.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

use crate::kind::Kind;

use super::type_schema::TypeSchema;

/// A borrowed primitive value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
}

impl Scalar<'_> {
    /// Returns the numeric value as `f64`, or `None` for bools and strings.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Scalar::Int(v) => Some(v as f64),
            Scalar::Uint(v) => Some(v as f64),
            Scalar::Float(v) => Some(v),
            Scalar::Bool(_) | Scalar::Str(_) => None,
        }
    }

    /// Returns true if this is the zero value of its type.
    pub fn is_zero(&self) -> bool {
        match *self {
            Scalar::Bool(v) => !v,
            Scalar::Int(v) => v == 0,
            Scalar::Uint(v) => v == 0,
            Scalar::Float(v) => v == 0.0,
            Scalar::Str(v) => v.is_empty(),
        }
    }
}

impl Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Uint(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

/// Read-only structural access to a value.
///
/// Only [`kind`](Reflect::kind) is required; every other method defaults to
/// "not applicable". A struct implementation returns its schema from
/// [`schema`](Reflect::schema) and its members from
/// [`field`](Reflect::field), keyed by the same internal names the schema
/// declares.
///
/// # Example
///
/// ```rust
/// use std::sync::OnceLock;
/// use tagpath::{Kind, Reflect, TypeSchema};
///
/// struct Server {
///     port: u16,
/// }
///
/// impl Reflect for Server {
///     fn kind(&self) -> Kind {
///         Kind::Struct
///     }
///
///     fn schema(&self) -> Option<&'static TypeSchema> {
///         static SCHEMA: OnceLock<TypeSchema> = OnceLock::new();
///         Some(SCHEMA.get_or_init(|| TypeSchema::new("Server").field("Port", r#"json:"port""#)))
///     }
///
///     fn field(&self, name: &str) -> Option<&dyn Reflect> {
///         match name {
///             "Port" => Some(&self.port),
///             _ => None,
///         }
///     }
/// }
///
/// let server = Server { port: 8080 };
/// assert_eq!(server.kind(), Kind::Struct);
/// assert_eq!(server.field("Port").map(|v| v.kind()), Some(Kind::Uint));
/// ```
pub trait Reflect {
    /// The structural kind of this value.
    fn kind(&self) -> Kind;

    /// The member table, for struct values.
    fn schema(&self) -> Option<&'static TypeSchema> {
        None
    }

    /// A member by internal name, for struct values.
    fn field(&self, _name: &str) -> Option<&dyn Reflect> {
        None
    }

    /// The referenced value, for optional references. `None` when empty.
    fn elem(&self) -> Option<&dyn Reflect> {
        None
    }

    /// An element by position, for slices.
    fn index(&self, _index: usize) -> Option<&dyn Reflect> {
        None
    }

    /// An entry by key, for maps.
    fn entry(&self, _key: &str) -> Option<&dyn Reflect> {
        None
    }

    /// Character count for strings, element count for slices and maps.
    fn length(&self) -> Option<usize> {
        None
    }

    /// The primitive value, for bools, numbers and strings.
    fn scalar(&self) -> Option<Scalar<'_>> {
        None
    }
}

/// Follows optional references until a non-reference value is reached.
///
/// Returns `None` if any reference along the way is empty.
pub fn deref(mut value: &dyn Reflect) -> Option<&dyn Reflect> {
    while value.kind() == Kind::Pointer {
        value = value.elem()?;
    }
    Some(value)
}

/// Returns true if `value` is the zero value of its type.
///
/// Empty references, empty strings and collections, numeric zero and
/// `false` are zero. A struct is zero when all of its members are.
pub fn is_zero(value: &dyn Reflect) -> bool {
    match value.kind() {
        Kind::Invalid => true,
        Kind::Pointer => value.elem().is_none(),
        Kind::String | Kind::Slice | Kind::Map => value.length().map_or(true, |len| len == 0),
        Kind::Struct => value.schema().map_or(true, |schema| {
            schema
                .fields()
                .all(|def| value.field(def.name()).map_or(true, is_zero))
        }),
        Kind::Bool | Kind::Int | Kind::Uint | Kind::Float => {
            value.scalar().map_or(true, |s| s.is_zero())
        }
    }
}

macro_rules! reflect_numeric {
    ($kind:ident, $variant:ident as $cast:ty: $($t:ty),*) => {
        $(
            impl Reflect for $t {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn scalar(&self) -> Option<Scalar<'_>> {
                    Some(Scalar::$variant(*self as $cast))
                }
            }
        )*
    };
}

reflect_numeric!(Int, Int as i64: i8, i16, i32, i64, isize);
reflect_numeric!(Uint, Uint as u64: u8, u16, u32, u64, usize);
reflect_numeric!(Float, Float as f64: f32, f64);

impl Reflect for bool {
    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Bool(*self))
    }
}

impl Reflect for String {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn length(&self) -> Option<usize> {
        Some(self.chars().count())
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Str(self))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn elem(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|v| v as &dyn Reflect)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Slice
    }

    fn index(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|v| v as &dyn Reflect)
    }

    fn length(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Slice
    }

    fn index(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|v| v as &dyn Reflect)
    }

    fn length(&self) -> Option<usize> {
        Some(N)
    }
}

impl<V: Reflect, S> Reflect for HashMap<String, V, S>
where
    S: std::hash::BuildHasher,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn entry(&self, key: &str) -> Option<&dyn Reflect> {
        self.get(key).map(|v| v as &dyn Reflect)
    }

    fn length(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<V: Reflect> Reflect for BTreeMap<String, V> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn entry(&self, key: &str) -> Option<&dyn Reflect> {
        self.get(key).map(|v| v as &dyn Reflect)
    }

    fn length(&self) -> Option<usize> {
        Some(self.len())
    }
}

macro_rules! reflect_transparent {
    ($($wrapper:ty),*) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $wrapper {
                fn kind(&self) -> Kind {
                    (**self).kind()
                }

                fn schema(&self) -> Option<&'static TypeSchema> {
                    (**self).schema()
                }

                fn field(&self, name: &str) -> Option<&dyn Reflect> {
                    (**self).field(name)
                }

                fn elem(&self) -> Option<&dyn Reflect> {
                    (**self).elem()
                }

                fn index(&self, index: usize) -> Option<&dyn Reflect> {
                    (**self).index(index)
                }

                fn entry(&self, key: &str) -> Option<&dyn Reflect> {
                    (**self).entry(key)
                }

                fn length(&self) -> Option<usize> {
                    (**self).length()
                }

                fn scalar(&self) -> Option<Scalar<'_>> {
                    (**self).scalar()
                }
            }
        )*
    };
}

reflect_transparent!(&T, Box<T>, std::sync::Arc<T>);

/// Implements [`Reflect`] for a plain struct.
///
/// Each member is listed by its Rust field name, optionally followed by
/// `as "InternalName"` (the name failures refer to it by, defaulting to the
/// field name) and `: "tag string"`. The member table is built once, on
/// first use.
///
/// # Example
///
/// ```rust
/// use tagpath::{reflect_struct, Kind, Reflect};
///
/// struct Redis {
///     host: String,
///     port: u16,
///     password: String,
/// }
///
/// reflect_struct!(Redis {
///     host as "Host": r#"json:"host,omitempty" validate:"required,hostname""#,
///     port as "Port": r#"json:"port""#,
///     password: r#"json:"-""#,
/// });
///
/// let redis = Redis { host: "localhost".into(), port: 6379, password: String::new() };
/// let schema = redis.schema().unwrap();
/// assert_eq!(schema.name(), "Redis");
/// assert!(schema.get("Host").is_some());
/// assert!(schema.get("password").is_some());
/// assert_eq!(redis.field("Port").map(|v| v.kind()), Some(Kind::Uint));
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:ident $internal:literal) => {
        $internal
    };
    (@tag) => {
        ""
    };
    (@tag $tag:literal) => {
        $tag
    };
    ($ty:ident { $( $field:ident $(as $internal:literal)? $(: $tag:literal)? ),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn kind(&self) -> $crate::Kind {
                $crate::Kind::Struct
            }

            fn schema(&self) -> ::std::option::Option<&'static $crate::TypeSchema> {
                static SCHEMA: ::std::sync::OnceLock<$crate::TypeSchema> =
                    ::std::sync::OnceLock::new();
                ::std::option::Option::Some(SCHEMA.get_or_init(|| {
                    $crate::TypeSchema::new(stringify!($ty))
                        $(
                            .field(
                                $crate::reflect_struct!(@name $field $($internal)?),
                                $crate::reflect_struct!(@tag $($tag)?),
                            )
                        )*
                }))
            }

            fn field(&self, name: &str) -> ::std::option::Option<&dyn $crate::Reflect> {
                let _ = name;
                $(
                    if name == $crate::reflect_struct!(@name $field $($internal)?) {
                        return ::std::option::Option::Some(&self.$field);
                    }
                )*
                ::std::option::Option::None
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inner {
        port: u16,
        host: String,
    }

    reflect_struct!(Inner {
        port as "Port": r#"json:"port""#,
        host,
    });

    struct Outer {
        inner: Inner,
        maybe: Option<Inner>,
        items: Vec<Inner>,
    }

    reflect_struct!(Outer { inner, maybe, items });

    fn inner(port: u16) -> Inner {
        Inner {
            port,
            host: String::new(),
        }
    }

    #[test]
    fn test_macro_builds_schema_once() {
        let a = inner(1);
        let b = inner(2);
        let sa = a.schema().unwrap();
        let sb = b.schema().unwrap();
        assert!(std::ptr::eq(sa, sb));
        assert_eq!(sa.name(), "Inner");
        let names: Vec<_> = sa.fields().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Port", "host"]);
    }

    #[test]
    fn test_macro_field_lookup_uses_internal_name() {
        let value = inner(8080);
        assert_eq!(
            value.field("Port").and_then(|v| v.scalar()),
            Some(Scalar::Uint(8080))
        );
        assert!(value.field("port").is_none());
        assert_eq!(value.field("host").map(|v| v.kind()), Some(Kind::String));
    }

    #[test]
    fn test_primitive_kinds() {
        assert_eq!(5i32.kind(), Kind::Int);
        assert_eq!(5u8.kind(), Kind::Uint);
        assert_eq!(1.5f32.kind(), Kind::Float);
        assert_eq!(true.kind(), Kind::Bool);
        assert_eq!(String::from("x").kind(), Kind::String);
        assert_eq!((-3i16).scalar(), Some(Scalar::Int(-3)));
    }

    #[test]
    fn test_deref_follows_options() {
        let some: Option<Option<u16>> = Some(Some(3));
        let value = deref(&some).unwrap();
        assert_eq!(value.kind(), Kind::Uint);

        let none: Option<Option<u16>> = Some(None);
        assert!(deref(&none).is_none());

        let plain = 7u16;
        assert_eq!(deref(&plain).map(|v| v.kind()), Some(Kind::Uint));
    }

    #[test]
    fn test_box_is_transparent() {
        let boxed: Box<Inner> = Box::new(inner(1));
        assert_eq!(boxed.kind(), Kind::Struct);
        assert!(boxed.field("Port").is_some());
    }

    #[test]
    fn test_slice_and_map_access() {
        let items = vec![inner(1), inner(2)];
        assert_eq!(items.kind(), Kind::Slice);
        assert_eq!(items.length(), Some(2));
        assert!(items.index(1).is_some());
        assert!(items.index(2).is_none());

        let mut labels = BTreeMap::new();
        labels.insert("env".to_string(), "prod".to_string());
        assert_eq!(labels.kind(), Kind::Map);
        assert_eq!(
            labels.entry("env").and_then(|v| v.scalar()),
            Some(Scalar::Str("prod"))
        );
        assert!(labels.entry("region").is_none());
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(&0u16));
        assert!(!is_zero(&1u16));
        assert!(is_zero(&String::new()));
        assert!(is_zero(&Option::<u16>::None));
        assert!(!is_zero(&Some(0u16)));
        assert!(is_zero(&Vec::<u16>::new()));
        assert!(is_zero(&inner(0)));
        assert!(!is_zero(&inner(1)));

        let outer = Outer {
            inner: inner(0),
            maybe: None,
            items: Vec::new(),
        };
        assert!(is_zero(&outer));
    }

    #[test]
    fn test_scalar_helpers() {
        assert_eq!(Scalar::Uint(65535).as_f64(), Some(65535.0));
        assert_eq!(Scalar::Str("a").as_f64(), None);
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Str("info").to_string(), "info");
    }
}
