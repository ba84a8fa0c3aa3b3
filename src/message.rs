//! Human-readable messages for violated rules.
//!
//! A [`MessageCatalog`] maps rule identifiers to message templates. The
//! standard catalog is built once per process and never changes afterwards;
//! callers that need messages for their own rules build an extended copy with
//! [`MessageCatalog::builtin`] and [`MessageCatalog::with_message`].

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

/// Message used for any rule the catalog does not know.
pub const FALLBACK_MESSAGE: &str = "The value provided is invalid.";

/// How a rule's message is produced from its parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTemplate {
    /// The message ignores the parameter.
    Fixed(String),
    /// Every `{param}` is replaced by the parameter.
    WithParam(String),
    /// Every `{param}` is replaced by the whitespace-separated parameter
    /// rewritten as a comma-separated list.
    WithList(String),
}

impl MessageTemplate {
    pub fn fixed(message: impl Into<String>) -> Self {
        MessageTemplate::Fixed(message.into())
    }

    pub fn with_param(template: impl Into<String>) -> Self {
        MessageTemplate::WithParam(template.into())
    }

    pub fn with_list(template: impl Into<String>) -> Self {
        MessageTemplate::WithList(template.into())
    }

    /// Renders the message for `param`.
    pub fn render(&self, param: &str) -> String {
        match self {
            MessageTemplate::Fixed(message) => message.clone(),
            MessageTemplate::WithParam(template) => template.replace("{param}", param),
            MessageTemplate::WithList(template) => {
                let list = param.split_whitespace().collect::<Vec<_>>().join(", ");
                template.replace("{param}", &list)
            }
        }
    }
}

/// A table from rule identifier to message template.
///
/// # Example
///
/// ```rust
/// use tagpath::{MessageCatalog, MessageTemplate};
///
/// let catalog = MessageCatalog::builtin()
///     .with_message("semver", MessageTemplate::fixed("The value must be a semantic version."));
///
/// assert_eq!(catalog.format("semver", ""), "The value must be a semantic version.");
/// assert_eq!(catalog.format("required", ""), "This field is required.");
/// assert_eq!(catalog.format("custom_rule", "x"), "The value provided is invalid.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    templates: IndexMap<String, MessageTemplate>,
    fallback: String,
}

impl MessageCatalog {
    /// Creates a catalog with no rules and the standard fallback.
    pub fn empty() -> Self {
        Self {
            templates: IndexMap::new(),
            fallback: FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Creates a fresh catalog holding the built-in messages.
    pub fn builtin() -> Self {
        Self::empty()
            .with_message("required", MessageTemplate::fixed("This field is required."))
            .with_message(
                "max",
                MessageTemplate::with_param("The value must be less than or equal to {param}."),
            )
            .with_message(
                "min",
                MessageTemplate::with_param("The value must be greater than or equal to {param}."),
            )
            .with_message(
                "len",
                MessageTemplate::with_param("The value must have a length of exactly {param}."),
            )
            .with_message(
                "oneof",
                MessageTemplate::with_list("The value must be one of: {param}."),
            )
            .with_message(
                "fqdn",
                MessageTemplate::fixed("The value must be a valid fully-qualified domain name."),
            )
            .with_message(
                "hostname",
                MessageTemplate::fixed("The value must be a valid hostname."),
            )
            .with_message("uuid", MessageTemplate::fixed("The value must be a valid UUID."))
            .with_message(
                "email",
                MessageTemplate::fixed("The value must be a valid email address."),
            )
            .with_message(
                "request_id_header",
                MessageTemplate::fixed("The value must be a valid request ID header name."),
            )
    }

    /// The process-wide built-in catalog, initialized on first use.
    pub fn standard() -> Arc<MessageCatalog> {
        static STANDARD: OnceLock<Arc<MessageCatalog>> = OnceLock::new();
        Arc::clone(STANDARD.get_or_init(|| Arc::new(MessageCatalog::builtin())))
    }

    /// Adds or replaces the template for `rule`.
    pub fn with_message(mut self, rule: impl Into<String>, template: MessageTemplate) -> Self {
        self.templates.insert(rule.into(), template);
        self
    }

    /// Replaces the message used for unknown rules.
    pub fn with_fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = message.into();
        self
    }

    /// Returns true if the catalog has a template for `rule`.
    pub fn contains(&self, rule: &str) -> bool {
        self.templates.contains_key(rule)
    }

    /// Iterates over the known rule identifiers.
    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Formats the message for `rule` with `param`. Unknown rules get the
    /// fallback message.
    pub fn format(&self, rule: &str, param: &str) -> String {
        match self.templates.get(rule) {
            Some(template) => template.render(param),
            None => self.fallback.clone(),
        }
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Formats the built-in message for `rule` with `param`.
pub fn format_rule_message(rule: &str, param: &str) -> String {
    MessageCatalog::standard().format(rule, param)
}
