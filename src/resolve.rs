//! Resolution of internal member paths into public field paths.
//!
//! Walking starts at the root value. Before each segment is applied the
//! current value is dereferenced through any optional references, then:
//!
//! - a field segment needs a struct, looks the member up in its
//!   [`TypeSchema`](crate::TypeSchema) and contributes the member's tag name
//!   (or nothing, for the omit sentinel);
//! - an index segment needs a slice, a key segment needs a map, and both
//!   contribute themselves unless the member they belong to was omitted.
//!
//! Resolution reads the object graph only, so the result depends on nothing
//! but the root, the internal path and the tag key.

use crate::error::MappingError;
use crate::kind::Kind;
use crate::path::{FieldPath, PathSegment};
use crate::schema::{deref, PublicName, Reflect};

/// Resolves a dot-separated internal path against `root` using tag `tag`.
///
/// # Example
///
/// ```rust
/// use tagpath::{reflect_struct, resolve_field_path};
///
/// struct Server { port: u16 }
/// struct Config { server: Server }
///
/// reflect_struct!(Server { port as "Port": r#"json:"port""# });
/// reflect_struct!(Config { server as "Server": r#"json:"server""# });
///
/// let config = Config { server: Server { port: 0 } };
/// let path = resolve_field_path(&config, "Server.Port", "json").unwrap();
/// assert_eq!(path.to_string(), "server.port");
/// ```
pub fn resolve_field_path(
    root: &dyn Reflect,
    internal_path: &str,
    tag: &str,
) -> Result<FieldPath, MappingError> {
    resolve_path(root, &FieldPath::parse(internal_path), tag)
}

/// Resolves an already parsed internal path.
pub fn resolve_path(
    root: &dyn Reflect,
    internal: &FieldPath,
    tag: &str,
) -> Result<FieldPath, MappingError> {
    let mut current = root;
    let mut public = FieldPath::root();
    let mut omitting = false;

    for segment in internal.segments() {
        let value = deref(current).ok_or(MappingError::non_traversable(Kind::Invalid))?;

        current = match segment {
            PathSegment::Field(name) => {
                let (public_name, next) = member(value, name, tag)?;
                match public_name {
                    PublicName::Named(name) => {
                        public.push(PathSegment::field(name));
                        omitting = false;
                    }
                    PublicName::Omitted => omitting = true,
                }
                next
            }
            PathSegment::Index(idx) => {
                expect_kind(value, Kind::Slice)?;
                let next = value
                    .index(*idx)
                    .ok_or(MappingError::non_traversable(Kind::Invalid))?;
                if !omitting {
                    public.push(PathSegment::Index(*idx));
                }
                next
            }
            PathSegment::Key(key) => {
                expect_kind(value, Kind::Map)?;
                let next = value
                    .entry(key)
                    .ok_or(MappingError::non_traversable(Kind::Invalid))?;
                if !omitting {
                    public.push(PathSegment::key(key.as_str()));
                }
                next
            }
        };
    }

    Ok(public)
}

/// Looks up member `name` on a struct value, returning its public name and value.
fn member<'a>(
    value: &'a dyn Reflect,
    name: &str,
    tag: &str,
) -> Result<(PublicName<'static>, &'a dyn Reflect), MappingError> {
    expect_kind(value, Kind::Struct)?;

    let schema = value
        .schema()
        .ok_or_else(|| MappingError::field_not_found(name, "<anonymous>"))?;
    let def = schema
        .get(name)
        .ok_or_else(|| MappingError::field_not_found(name, schema.name()))?;
    let next = value
        .field(name)
        .ok_or_else(|| MappingError::field_not_found(name, schema.name()))?;

    Ok((def.public_name(tag), next))
}

fn expect_kind(value: &dyn Reflect, expected: Kind) -> Result<(), MappingError> {
    let kind = value.kind();
    if kind == expected {
        Ok(())
    } else {
        Err(MappingError::non_traversable(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect_struct;

    struct Server {
        port: u16,
        secret: String,
    }

    reflect_struct!(Server {
        port as "Port": r#"json:"port" form:"server_port""#,
        secret as "Secret": r#"json:"-""#,
    });

    struct Config {
        server: Server,
        backup: Option<Server>,
        hidden: Server,
        replicas: Vec<Server>,
        level: String,
    }

    reflect_struct!(Config {
        server as "Server": r#"json:"server,omitempty""#,
        backup as "Backup": r#"json:"backup""#,
        hidden as "Hidden": r#"json:"-""#,
        replicas as "Replicas": r#"json:"replicas""#,
        level as "Level",
    });

    fn server(port: u16) -> Server {
        Server {
            port,
            secret: String::new(),
        }
    }

    fn config() -> Config {
        Config {
            server: server(0),
            backup: None,
            hidden: server(1),
            replicas: vec![server(2), server(3)],
            level: "info".into(),
        }
    }

    fn resolve(path: &str) -> Result<String, MappingError> {
        resolve_field_path(&config(), path, "json").map(|p| p.to_string())
    }

    #[test]
    fn test_nested_tags() {
        assert_eq!(resolve("Server.Port").unwrap(), "server.port");
    }

    #[test]
    fn test_untagged_member_keeps_internal_name() {
        assert_eq!(resolve("Level").unwrap(), "Level");
    }

    #[test]
    fn test_other_tag_key() {
        let path = resolve_field_path(&config(), "Server.Port", "form").unwrap();
        assert_eq!(path.to_string(), "Server.server_port");
    }

    #[test]
    fn test_omitted_leaf_contributes_nothing() {
        assert_eq!(resolve("Server.Secret").unwrap(), "server");
        assert_eq!(resolve("Hidden.Secret").unwrap(), "");
    }

    #[test]
    fn test_omitted_intermediate_is_skipped() {
        assert_eq!(resolve("Hidden.Port").unwrap(), "port");
    }

    #[test]
    fn test_index_segments() {
        assert_eq!(resolve("Replicas[1].Port").unwrap(), "replicas[1].port");
    }

    #[test]
    fn test_index_out_of_range() {
        assert_eq!(
            resolve("Replicas[5].Port"),
            Err(MappingError::non_traversable(Kind::Invalid))
        );
    }

    #[test]
    fn test_index_on_non_slice() {
        assert_eq!(
            resolve("Server[0]"),
            Err(MappingError::non_traversable(Kind::Struct))
        );
    }

    #[test]
    fn test_empty_reference_leaf_is_fine() {
        assert_eq!(resolve("Backup").unwrap(), "backup");
    }

    #[test]
    fn test_empty_reference_mid_path() {
        assert_eq!(
            resolve("Backup.Port"),
            Err(MappingError::non_traversable(Kind::Invalid))
        );
    }

    #[test]
    fn test_filled_reference_is_walked() {
        let mut cfg = config();
        cfg.backup = Some(server(9));
        let path = resolve_field_path(&cfg, "Backup.Port", "json").unwrap();
        assert_eq!(path.to_string(), "backup.port");
    }

    #[test]
    fn test_field_not_found() {
        assert_eq!(
            resolve("Server.Host"),
            Err(MappingError::field_not_found("Host", "Server"))
        );
        assert_eq!(
            resolve("server.port"),
            Err(MappingError::field_not_found("server", "Config"))
        );
    }

    #[test]
    fn test_walk_into_primitive() {
        assert_eq!(
            resolve("Level.Length"),
            Err(MappingError::non_traversable(Kind::String))
        );
    }

    #[test]
    fn test_empty_path_is_root() {
        assert!(resolve_field_path(&config(), "", "json").unwrap().is_root());
    }
}
