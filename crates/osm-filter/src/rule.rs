//! Tag-based accept/reject rules.
//!
//! Matching semantics, in order of authority:
//!
//! 1. A matching reject rule always wins.
//! 2. If any accept rule exists for an element kind, elements of that kind
//!    must match one or be rejected.
//! 3. With no rules for the kind the verdict is "don't care" (`None`) and a
//!    later filter stage decides.

use osm_core::TagMap;

/// What a matching rule does to the element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterAction {
    Accept,
    Reject,
}

/// Which element kinds a rule applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Nodes,
    Ways,
    Relations,
    /// Applies to every kind (`*` in the Osmosis textual form).
    All,
}

/// One accept or reject rule: a key, and optionally a set of values.
#[derive(Clone, Debug)]
pub struct FilterRule {
    pub action: FilterAction,
    pub kind: ElementKind,
    pub key: Box<str>,
    /// `None` matches any value (`*`); otherwise any listed value matches.
    pub values: Option<Vec<Box<str>>>,
}

impl FilterRule {
    pub fn new(action: FilterAction, kind: ElementKind, key: &str, value: &str) -> Self {
        let values = if value == "*" {
            None
        } else {
            Some(value.split(',').map(|v| v.trim().into()).collect())
        };
        Self { action, kind, key: key.into(), values }
    }

    /// Whether this rule is scoped to the given kind.
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        self.kind == ElementKind::All || self.kind == kind
    }

    /// Whether the rule fires for an element of `kind` with these tags.
    pub fn matches(&self, kind: ElementKind, tags: &TagMap) -> bool {
        if !self.applies_to(kind) {
            return false;
        }
        match tags.get(&self.key) {
            None => false,
            Some(value) => match &self.values {
                None => true,
                Some(values) => values.iter().any(|v| v.as_ref() == value),
            },
        }
    }

    /// Parse the Osmosis textual form: `[accept:|reject:]key=value`, where
    /// value is `*` or a comma-separated list.  The rule applies to all
    /// element kinds.  Returns `None` for strings without `=`.
    pub fn parse_osmosis(spec: &str) -> Option<FilterRule> {
        let (action, rest) = match spec.split_once(':') {
            Some(("accept", rest)) => (FilterAction::Accept, rest),
            Some(("reject", rest)) => (FilterAction::Reject, rest),
            _ => (FilterAction::Accept, spec),
        };
        let (key, value) = rest.split_once('=')?;
        Some(FilterRule::new(action, ElementKind::All, key, value))
    }
}

// ── TagFilter ─────────────────────────────────────────────────────────────────

/// Ordered list of tag rules with the precedence rules above.
#[derive(Clone, Debug, Default)]
pub struct TagFilter {
    rules: Vec<FilterRule>,
}

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_accept(&mut self, kind: ElementKind, key: &str, value: &str) {
        self.rules.push(FilterRule::new(FilterAction::Accept, kind, key, value));
    }

    pub fn add_reject(&mut self, kind: ElementKind, key: &str, value: &str) {
        self.rules.push(FilterRule::new(FilterAction::Reject, kind, key, value));
    }

    pub fn push(&mut self, rule: FilterRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Verdict for an element: `Some(true)` accepted, `Some(false)` rejected,
    /// `None` when no rule speaks for this kind.
    pub fn matches(&self, kind: ElementKind, tags: &TagMap) -> Option<bool> {
        if self.rules.is_empty() {
            return None;
        }

        let mut has_accept_rules_for_kind = false;
        let mut accepted = None;

        for rule in &self.rules {
            if rule.applies_to(kind) && rule.action == FilterAction::Accept {
                has_accept_rules_for_kind = true;
            }
            if rule.matches(kind, tags) {
                match rule.action {
                    // Reject rules override accept rules.
                    FilterAction::Reject => return Some(false),
                    FilterAction::Accept => accepted = Some(true),
                }
            }
        }

        if has_accept_rules_for_kind && accepted.is_none() {
            return Some(false);
        }
        accepted
    }
}
