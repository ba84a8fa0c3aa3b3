//! Parsing of rule lists such as `required,min=1,max=65535`.

/// A single rule with its parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub rule: String,
    pub param: String,
}

impl Constraint {
    pub fn new(rule: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            param: param.into(),
        }
    }
}

/// The rules declared on one member.
///
/// `omitempty`, `dive` and `-` are markers rather than rules: they change how
/// the remaining rules apply and never produce failures themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    /// `-`: the member is not validated at all.
    pub skip: bool,
    /// `omitempty`: zero values skip every rule.
    pub omit_empty: bool,
    /// Rules applied to the member itself, in declaration order.
    pub constraints: Vec<Constraint>,
    /// Rules after `dive`, applied to each element.
    pub elements: Option<Box<RuleSet>>,
}

impl RuleSet {
    /// Parses a comma-separated rule list. Empty entries are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut set = RuleSet::default();
        let mut entries = raw.split(',').map(str::trim).filter(|e| !e.is_empty());

        while let Some(entry) = entries.next() {
            match entry {
                "-" => set.skip = true,
                "omitempty" => set.omit_empty = true,
                "dive" => {
                    let rest: Vec<_> = entries.by_ref().collect();
                    set.elements = Some(Box::new(RuleSet::parse(&rest.join(","))));
                }
                _ => {
                    let (rule, param) = entry.split_once('=').unwrap_or((entry, ""));
                    set.constraints.push(Constraint::new(rule, param));
                }
            }
        }

        set
    }

    /// Returns true if nothing is declared.
    pub fn is_empty(&self) -> bool {
        !self.skip && !self.omit_empty && self.constraints.is_empty() && self.elements.is_none()
    }
}
