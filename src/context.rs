//! Per-(file, rule) mutable state handed to rule handlers (spec.md §3
//! "Rule context", §4.5 "Diagnostic and fix protocol").
//!
//! Grounded on the teacher's `context::QueryMatchContext`, which wraps a
//! `FileRunContext` plus `RefCell<Option<Vec<_>>>` sinks for pending fixes
//! and violations and exposes a single `report(violation)` entry point.
//! This module splits that single entry point into the four report
//! methods spec.md §4.5 names explicitly, all funneling into one
//! diagnostic sink.

use std::cell::RefCell;

use crate::diagnostic::{Diagnostic, Edit, Severity, Suggestion};
use crate::source::{Range, SourceFile};
use crate::syntax::{Node, SyntaxTree};
use crate::types::TypeChecker;

/// The subset of `tsconfig.json`-derived compiler settings rules may
/// consult (spec.md §3: "the program/compiler-options handle"). Kept
/// deliberately small — the engine does not interpret these values
/// itself, it only threads them through to rule handlers.
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    pub strict: bool,
    pub target: Option<String>,
}

/// Created once per `(file, rule)` pair and discarded when the walk ends
/// (spec.md §3 "Lifecycle"). Mutable only via the report methods below.
pub struct RuleContext<'a> {
    pub source_file: &'a SourceFile,
    pub tree: &'a SyntaxTree,
    pub type_checker: &'a dyn TypeChecker,
    pub compiler_options: &'a CompilerOptions,
    rule_name: String,
    severity: Severity,
    rule_order: usize,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        source_file: &'a SourceFile,
        tree: &'a SyntaxTree,
        type_checker: &'a dyn TypeChecker,
        compiler_options: &'a CompilerOptions,
        rule_name: impl Into<String>,
        severity: Severity,
        rule_order: usize,
    ) -> Self {
        Self {
            source_file,
            tree,
            type_checker,
            compiler_options,
            rule_name: rule_name.into(),
            severity,
            rule_order,
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// `reportNode(node, message)` (spec.md §4.5).
    pub fn report_node(&self, node: Node<'a>, message_id: &str, description: impl Into<String>) {
        self.report_range(node.range(), message_id, description)
    }

    /// `reportRange(range, message)` (spec.md §4.5).
    pub fn report_range(&self, range: Range, message_id: &str, description: impl Into<String>) {
        self.push(Diagnostic::new(
            self.rule_name.clone(),
            message_id,
            description,
            self.severity,
            range,
        ));
    }

    /// `reportNodeWithFix(node, message, ...edits)` (spec.md §4.5).
    pub fn report_node_with_fix(
        &self,
        node: Node<'a>,
        message_id: &str,
        description: impl Into<String>,
        edits: Vec<Edit>,
    ) {
        let diagnostic = Diagnostic::new(
            self.rule_name.clone(),
            message_id,
            description,
            self.severity,
            node.range(),
        )
        .with_fixes(edits);
        self.push(diagnostic);
    }

    /// `reportNodeWithSuggestions(node, message, ...suggestions)`
    /// (spec.md §4.5).
    pub fn report_node_with_suggestions(
        &self,
        node: Node<'a>,
        message_id: &str,
        description: impl Into<String>,
        suggestions: Vec<Suggestion>,
    ) {
        let diagnostic = Diagnostic::new(
            self.rule_name.clone(),
            message_id,
            description,
            self.severity,
            node.range(),
        )
        .with_suggestions(suggestions);
        self.push(diagnostic);
    }

    fn push(&self, mut diagnostic: Diagnostic) {
        diagnostic.rule_order = self.rule_order;
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Used by the walker to record a handler-panic diagnostic under a
    /// synthetic rule name and forced `error` severity, independent of
    /// this context's own configured rule name/severity (spec.md §7
    /// "Rule crash").
    pub(crate) fn push_engine_diagnostic(&self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }

    pub fn node_text(&self, node: Node<'a>) -> &'a str {
        self.source_file.slice(node.range())
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }

    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Kind, SyntaxTreeBuilder};
    use crate::types::NullTypeChecker;

    #[test]
    fn report_node_uses_configured_severity_and_rule_order() {
        let file = SourceFile::new("f.ts", "a ? 1 : 2");
        let mut builder = SyntaxTreeBuilder::new();
        let id = builder.push(Kind::ConditionalExpression, Range::new(0, 9), vec![]);
        let tree = builder.finish(id);
        let checker = NullTypeChecker;
        let options = CompilerOptions::default();
        let ctx = RuleContext::new(&file, &tree, &checker, &options, "no-ternary", Severity::Warn, 3);

        ctx.report_node(tree.root(), "noTernaryOperator", "no ternary");

        let diagnostics = ctx.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warn);
        assert_eq!(diagnostics[0].rule_order, 3);
        assert_eq!(diagnostics[0].rule_name, "no-ternary");
    }
}
