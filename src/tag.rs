//! Struct tag parsing.
//!
//! Members of a [`TypeSchema`](crate::TypeSchema) carry a tag string in the
//! conventional `key:"value" key2:"value2"` syntax. Each value may hold
//! comma-separated options after its primary component, e.g.
//! `json:"host,omitempty"`.
//!
//! Parsing is lenient: it stops at the first malformed pair and keeps
//! everything parsed before it, so a bad tag never aborts schema creation.

use std::fmt::{self, Display};

use indexmap::IndexMap;

/// A parsed struct tag.
///
/// # Example
///
/// ```rust
/// use tagpath::StructTag;
///
/// let tag = StructTag::parse(r#"json:"host,omitempty" validate:"required,hostname""#);
///
/// assert_eq!(tag.lookup("json"), Some("host,omitempty"));
/// assert_eq!(tag.name("json"), Some("host"));
/// assert_eq!(tag.options("json").collect::<Vec<_>>(), vec!["omitempty"]);
/// assert_eq!(tag.lookup("yaml"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructTag {
    entries: IndexMap<String, String>,
}

impl StructTag {
    /// Creates an empty tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a tag string.
    ///
    /// When a key appears more than once, the first occurrence wins.
    pub fn parse(raw: &str) -> Self {
        let mut entries = IndexMap::new();
        let mut rest = raw;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let key_len = rest
                .bytes()
                .take_while(|&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
                .count();
            let bytes = rest.as_bytes();
            if key_len == 0
                || key_len + 1 >= bytes.len()
                || bytes[key_len] != b':'
                || bytes[key_len + 1] != b'"'
            {
                break;
            }

            let key = &rest[..key_len];
            let quoted = &rest[key_len + 1..];

            let Some(end) = closing_quote(quoted) else {
                break;
            };
            let value = unescape(&quoted[1..end]);
            rest = &quoted[end + 1..];

            entries.entry(key.to_string()).or_insert(value);
        }

        Self { entries }
    }

    /// Adds a key/value pair, replacing any existing value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Returns the full value for `key`, options included.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the primary component of the value for `key`: everything
    /// before the first comma. The component may be empty.
    pub fn name(&self, key: &str) -> Option<&str> {
        self.lookup(key)
            .map(|value| value.split(',').next().unwrap_or_default())
    }

    /// Returns the options following the primary component for `key`.
    pub fn options<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.lookup(key)
            .into_iter()
            .flat_map(|value| value.split(',').skip(1))
    }

    /// Returns true if no key/value pairs were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{:?}", key, value)?;
        }
        Ok(())
    }
}

/// Finds the index of the closing quote in `quoted`, which starts with `"`.
fn closing_quote(quoted: &str) -> Option<usize> {
    let bytes = quoted.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_pair() {
        let tag = StructTag::parse(r#"json:"port""#);
        assert_eq!(tag.lookup("json"), Some("port"));
        assert_eq!(tag.name("json"), Some("port"));
    }

    #[test]
    fn test_parse_multiple_pairs() {
        let tag = StructTag::parse(r#"json:"host,omitempty"  form:"h" validate:"required""#);
        assert_eq!(tag.lookup("json"), Some("host,omitempty"));
        assert_eq!(tag.lookup("form"), Some("h"));
        assert_eq!(tag.lookup("validate"), Some("required"));
        let keys: Vec<_> = tag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["json", "form", "validate"]);
    }

    #[test]
    fn test_name_ignores_options() {
        let tag = StructTag::parse(r#"json:"host,omitempty,string""#);
        assert_eq!(tag.name("json"), Some("host"));
        assert_eq!(
            tag.options("json").collect::<Vec<_>>(),
            vec!["omitempty", "string"]
        );
    }

    #[test]
    fn test_name_can_be_empty() {
        let tag = StructTag::parse(r#"json:",omitempty""#);
        assert_eq!(tag.name("json"), Some(""));
    }

    #[test]
    fn test_empty_value_is_present() {
        let tag = StructTag::parse(r#"json:"""#);
        assert_eq!(tag.lookup("json"), Some(""));
    }

    #[test]
    fn test_missing_key() {
        let tag = StructTag::parse(r#"json:"port""#);
        assert_eq!(tag.lookup("yaml"), None);
        assert_eq!(tag.name("yaml"), None);
        assert_eq!(tag.options("yaml").count(), 0);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let tag = StructTag::parse(r#"json:"a" json:"b""#);
        assert_eq!(tag.lookup("json"), Some("a"));
    }

    #[test]
    fn test_escaped_quote_in_value() {
        let tag = StructTag::parse(r#"doc:"say \"hi\"" json:"x""#);
        assert_eq!(tag.lookup("doc"), Some(r#"say "hi""#));
        assert_eq!(tag.lookup("json"), Some("x"));
    }

    #[test]
    fn test_malformed_stops_parsing() {
        let tag = StructTag::parse(r#"json:"ok" broken json2:"never""#);
        assert_eq!(tag.lookup("json"), Some("ok"));
        assert_eq!(tag.lookup("json2"), None);

        let unterminated = StructTag::parse(r#"json:"open"#);
        assert!(unterminated.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(StructTag::parse("").is_empty());
        assert!(StructTag::parse("   ").is_empty());
    }

    #[test]
    fn test_builder_and_display() {
        let tag = StructTag::new().with("json", "port").with("form", "p");
        assert_eq!(tag.to_string(), r#"json:"port" form:"p""#);
        assert_eq!(StructTag::parse(&tag.to_string()), tag);
    }
}
