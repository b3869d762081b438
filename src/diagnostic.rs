//! The diagnostic/fix/suggestion data model (spec.md §3) plus the
//! ordering rule from spec.md §4.5 and §8 ("Ordering" testable property).
//!
//! Grounded on the teacher's `violation.rs` (`Violation { message, node }`),
//! generalized from a single free-text message tied to one node into the
//! full `{ruleName, messageId, description, severity, range, fixes,
//! suggestions}` record the spec requires.

use std::cmp::Ordering;

use crate::source::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Off,
    Warn,
    Error,
}

/// One atomic textual edit: a half-open range plus its replacement text.
/// An insertion is an edit with an empty range; a removal is an edit with
/// empty `text` (spec.md §3 "Edit (fix)").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range,
    pub text: String,
}

impl Edit {
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(Range::new(at, at), text)
    }

    pub fn remove(range: Range) -> Self {
        Self::new(range, "")
    }
}

/// An advisory alternative fix: never auto-applied by the composer
/// (spec.md §3 "Suggestion").
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub message_id: String,
    pub description: String,
    pub edits: Vec<Edit>,
}

/// One reported problem (spec.md §3 "Diagnostic"). `rule_order` is the
/// position of this diagnostic's owning rule in the per-file enablement
/// order (spec.md §4.4/§4.5) and is used only to break order ties
/// deterministically; it carries no other meaning.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub rule_name: String,
    pub message_id: String,
    pub description: String,
    pub severity: Severity,
    pub range: Range,
    pub fixes: Option<Vec<Edit>>,
    pub suggestions: Option<Vec<Suggestion>>,
    pub(crate) rule_order: usize,
}

impl Diagnostic {
    pub fn new(
        rule_name: impl Into<String>,
        message_id: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        range: Range,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            message_id: message_id.into(),
            description: description.into(),
            severity,
            range,
            fixes: None,
            suggestions: None,
            rule_order: 0,
        }
    }

    pub fn with_fixes(mut self, fixes: Vec<Edit>) -> Self {
        self.fixes = Some(fixes);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }
}

/// Source-position-ascending order with `(rule enablement order,
/// messageId)` tie-breaking (spec.md §4.5, tested by §8 "Ordering").
pub fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    a.range
        .start
        .cmp(&b.range.start)
        .then_with(|| a.rule_order.cmp(&b.rule_order))
        .then_with(|| a.message_id.cmp(&b.message_id))
}

pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(compare_diagnostics);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(rule_order: usize, message_id: &str, start: usize, end: usize) -> Diagnostic {
        let mut d = Diagnostic::new("r", message_id, "d", Severity::Error, Range::new(start, end));
        d.rule_order = rule_order;
        d
    }

    #[test]
    fn sorts_by_start_position() {
        let mut diags = vec![diag(0, "b", 10, 12), diag(0, "a", 1, 2)];
        sort_diagnostics(&mut diags);
        assert_eq!(diags[0].message_id, "a");
        assert_eq!(diags[1].message_id, "b");
    }

    #[test]
    fn ties_break_by_rule_order_then_message_id() {
        let mut diags = vec![
            diag(1, "z", 5, 5),
            diag(0, "a", 5, 5),
            diag(0, "b", 5, 5),
        ];
        sort_diagnostics(&mut diags);
        let ids: Vec<_> = diags.iter().map(|d| d.message_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "z"]);
    }
}
