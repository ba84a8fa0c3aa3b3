//! Built-in rule checks.

use std::sync::OnceLock;

use regex::Regex;

use crate::kind::Kind;
use crate::schema::{deref, is_zero, Reflect, Scalar};

const HOSTNAME_PATTERN: &str = r"^[a-zA-Z]([a-zA-Z0-9\-]+[\.]?)*[a-zA-Z0-9]$";
const FQDN_PATTERN: &str = r"^([a-zA-Z0-9]{1}[a-zA-Z0-9-]{0,62})(\.[a-zA-Z0-9]{1}[a-zA-Z0-9-]{0,62})*?(\.[a-zA-Z]{1}[a-zA-Z0-9]{0,62})\.?$";
const UUID_PATTERN: &str =
    r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";
pub(crate) const REQUEST_ID_HEADER_PATTERN: &str = r"^X-(?:[a-zA-Z0-9-]+-)?Request-ID$";

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern compiles"))
}

pub(crate) fn request_id_header() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, REQUEST_ID_HEADER_PATTERN)
}

/// Why a check could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckError {
    InvalidParam,
    UnsupportedKind(Kind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Required,
    Min,
    Max,
    Len,
    OneOf,
    Fqdn,
    Hostname,
    Uuid,
    Email,
}

impl Builtin {
    pub(crate) const NAMES: [&'static str; 9] = [
        "required", "min", "max", "len", "oneof", "fqdn", "hostname", "uuid", "email",
    ];

    pub(crate) fn parse(rule: &str) -> Option<Self> {
        Some(match rule {
            "required" => Builtin::Required,
            "min" => Builtin::Min,
            "max" => Builtin::Max,
            "len" => Builtin::Len,
            "oneof" => Builtin::OneOf,
            "fqdn" => Builtin::Fqdn,
            "hostname" => Builtin::Hostname,
            "uuid" => Builtin::Uuid,
            "email" => Builtin::Email,
            _ => return None,
        })
    }

    /// Returns `Ok(true)` when `value` satisfies the rule.
    pub(crate) fn check(self, value: &dyn Reflect, param: &str) -> Result<bool, CheckError> {
        match self {
            Builtin::Required => Ok(!is_zero(value)),
            Builtin::Min => bound(value, param, |measure, bound| measure >= bound),
            Builtin::Max => bound(value, param, |measure, bound| measure <= bound),
            Builtin::Len => bound(value, param, |measure, bound| measure == bound),
            Builtin::OneOf => one_of(value, param),
            Builtin::Fqdn => {
                static CELL: OnceLock<Regex> = OnceLock::new();
                matches(value, compiled(&CELL, FQDN_PATTERN))
            }
            Builtin::Hostname => {
                static CELL: OnceLock<Regex> = OnceLock::new();
                matches(value, compiled(&CELL, HOSTNAME_PATTERN))
            }
            Builtin::Uuid => {
                static CELL: OnceLock<Regex> = OnceLock::new();
                matches(value, compiled(&CELL, UUID_PATTERN))
            }
            Builtin::Email => {
                static CELL: OnceLock<Regex> = OnceLock::new();
                matches(value, compiled(&CELL, EMAIL_PATTERN))
            }
        }
    }
}

/// The quantity bounds compare against: numbers by value, strings by
/// character count, slices and maps by element count.
fn measure(value: &dyn Reflect) -> Result<f64, CheckError> {
    match value.kind() {
        kind if kind.is_numeric() => value
            .scalar()
            .and_then(|s| s.as_f64())
            .ok_or(CheckError::UnsupportedKind(value.kind())),
        Kind::String | Kind::Slice | Kind::Map => value
            .length()
            .map(|len| len as f64)
            .ok_or(CheckError::UnsupportedKind(value.kind())),
        kind => Err(CheckError::UnsupportedKind(kind)),
    }
}

fn bound(
    value: &dyn Reflect,
    param: &str,
    holds: impl Fn(f64, f64) -> bool,
) -> Result<bool, CheckError> {
    let limit: f64 = param.trim().parse().map_err(|_| CheckError::InvalidParam)?;
    match deref(value) {
        Some(target) => Ok(holds(measure(target)?, limit)),
        None => Ok(false),
    }
}

fn one_of(value: &dyn Reflect, param: &str) -> Result<bool, CheckError> {
    let Some(target) = deref(value) else {
        return Ok(false);
    };
    let scalar = match target.scalar() {
        Some(Scalar::Bool(_)) | None => return Err(CheckError::UnsupportedKind(target.kind())),
        Some(scalar) => scalar,
    };
    let rendered = scalar.to_string();
    Ok(param.split_whitespace().any(|choice| choice == rendered))
}

fn matches(value: &dyn Reflect, pattern: &Regex) -> Result<bool, CheckError> {
    let Some(target) = deref(value) else {
        return Ok(false);
    };
    match target.scalar() {
        Some(Scalar::Str(s)) => Ok(pattern.is_match(s)),
        _ => Err(CheckError::UnsupportedKind(target.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule: &str, value: &dyn Reflect, param: &str) -> Result<bool, CheckError> {
        Builtin::parse(rule).unwrap().check(value, param)
    }

    #[test]
    fn test_names_parse() {
        for name in Builtin::NAMES {
            assert!(Builtin::parse(name).is_some(), "{name}");
        }
        assert!(Builtin::parse("request_id_header").is_none());
    }

    #[test]
    fn test_required() {
        assert_eq!(check("required", &0u16, ""), Ok(false));
        assert_eq!(check("required", &1u16, ""), Ok(true));
        assert_eq!(check("required", &String::new(), ""), Ok(false));
        assert_eq!(check("required", &Some(0u16), ""), Ok(true));
        assert_eq!(check("required", &Option::<u16>::None, ""), Ok(false));
    }

    #[test]
    fn test_numeric_bounds() {
        assert_eq!(check("min", &1u16, "1"), Ok(true));
        assert_eq!(check("min", &0u16, "1"), Ok(false));
        assert_eq!(check("max", &15i32, "15"), Ok(true));
        assert_eq!(check("max", &16i32, "15"), Ok(false));
        assert_eq!(check("min", &-1i64, "0"), Ok(false));
        assert_eq!(check("max", &0.5f64, "1"), Ok(true));
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(check("min", &"ab".to_string(), "3"), Ok(false));
        assert_eq!(check("max", &"héllo".to_string(), "5"), Ok(true));
        assert_eq!(check("len", &vec![1u8, 2, 3], "3"), Ok(true));
        assert_eq!(check("len", &vec![1u8], "3"), Ok(false));
    }

    #[test]
    fn test_bounds_on_references() {
        assert_eq!(check("min", &Some(5u16), "1"), Ok(true));
        assert_eq!(check("min", &Option::<u16>::None, "1"), Ok(false));
    }

    #[test]
    fn test_bound_errors() {
        assert_eq!(check("min", &1u16, "one"), Err(CheckError::InvalidParam));
        assert_eq!(
            check("min", &true, "1"),
            Err(CheckError::UnsupportedKind(Kind::Bool))
        );
    }

    #[test]
    fn test_one_of() {
        let level = "warn".to_string();
        assert_eq!(check("oneof", &level, "debug info warn error"), Ok(true));
        assert_eq!(check("oneof", &"trace".to_string(), "debug info"), Ok(false));
        assert_eq!(check("oneof", &3u8, "1 2 3"), Ok(true));
        assert_eq!(
            check("oneof", &true, "true false"),
            Err(CheckError::UnsupportedKind(Kind::Bool))
        );
    }

    #[test]
    fn test_hostname() {
        for ok in ["localhost", "redis.internal", "cache-01.example.com"] {
            assert_eq!(check("hostname", &ok.to_string(), ""), Ok(true), "{ok}");
        }
        for bad in ["", "-redis", "redis_1", "1cache"] {
            assert_eq!(check("hostname", &bad.to_string(), ""), Ok(false), "{bad}");
        }
    }

    #[test]
    fn test_fqdn() {
        assert_eq!(check("fqdn", &"api.example.com".to_string(), ""), Ok(true));
        assert_eq!(check("fqdn", &"example.com.".to_string(), ""), Ok(true));
        assert_eq!(check("fqdn", &"localhost".to_string(), ""), Ok(false));
        assert_eq!(check("fqdn", &String::new(), ""), Ok(false));
    }

    #[test]
    fn test_uuid() {
        let valid = "f47ac10b-58cc-4372-a567-0e02b2c3d479".to_string();
        assert_eq!(check("uuid", &valid, ""), Ok(true));
        assert_eq!(check("uuid", &valid.to_uppercase(), ""), Ok(true));
        assert_eq!(check("uuid", &"f47ac10b58cc4372a5670e02b2c3d479".to_string(), ""), Ok(false));
        assert_eq!(
            check("uuid", &42u32, ""),
            Err(CheckError::UnsupportedKind(Kind::Uint))
        );
    }

    #[test]
    fn test_email() {
        assert_eq!(check("email", &"ops@example.com".to_string(), ""), Ok(true));
        assert_eq!(check("email", &"not-an-email".to_string(), ""), Ok(false));
    }

    #[test]
    fn test_request_id_header_pattern() {
        let re = request_id_header();
        assert!(re.is_match("X-Request-ID"));
        assert!(re.is_match("X-Amzn-Trace-Request-ID"));
        assert!(!re.is_match("Request-ID"));
        assert!(!re.is_match("X-Request-Id"));
    }
}
