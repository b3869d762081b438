//! The tree walker (spec.md §4.4): one depth-first pass per file, Enter
//! then children then Exit, dispatched through a fused `(kind, phase)`
//! table built once by unioning every enabled rule's listener map.
//!
//! Grounded on the teacher's `visit.rs` (`walk_tree`, which dispatches a
//! tree-sitter cursor against per-kind query matches and catches handler
//! panics via `std::panic::catch_unwind`, turning them into violations
//! rather than aborting the run) and `lib.rs`'s per-file rule loop.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use crate::config::{EnabledRules, RuleConfig};
use crate::context::{CompilerOptions, RuleContext};
use crate::diagnostic::{sort_diagnostics, Diagnostic, Severity};
use crate::registry::RuleRegistry;
use crate::rule::{Listener, Phase};
use crate::source::SourceFile;
use crate::syntax::{Kind, Node, SyntaxTree};
use crate::types::TypeChecker;

/// The rule name attached to an engine-generated diagnostic produced
/// when a handler panics (spec.md §7 "Rule crash").
const ENGINE_RULE_NAME: &str = "engine/handler-panic";

struct EnabledRule<'a> {
    name: String,
    rule_order: usize,
    context: RuleContext<'a>,
    listeners: Vec<Listener<'a>>,
    /// Once a handler from this rule panics, the remainder of the
    /// rule's handlers are suppressed for this file (spec.md §7: "the
    /// offending handler is suppressed for the remainder of that file").
    poisoned: std::cell::Cell<bool>,
}

type DispatchTable<'r, 'a> = HashMap<(Kind, Phase), Vec<(&'r EnabledRule<'a>, &'r Listener<'a>)>>;

fn build_dispatch_table<'r, 'a>(rules: &'r [EnabledRule<'a>]) -> DispatchTable<'r, 'a> {
    let mut table: DispatchTable<'r, 'a> = HashMap::new();
    for rule in rules {
        for listener in &rule.listeners {
            table
                .entry((listener.kind, listener.phase))
                .or_default()
                .push((rule, listener));
        }
    }
    table
}

fn dispatch<'a>(table: &DispatchTable<'_, 'a>, kind: Kind, phase: Phase, node: Node<'a>) {
    let Some(entries) = table.get(&(kind, phase)) else {
        return;
    };
    for (rule, listener) in entries {
        if rule.poisoned.get() {
            continue;
        }
        let result = panic::catch_unwind(AssertUnwindSafe(|| listener.invoke(node, &rule.context)));
        if let Err(payload) = result {
            rule.poisoned.set(true);
            let message = panic_message(&payload);
            tracing::error!(rule = rule.name.as_str(), %message, "rule handler panicked");
            rule.context.push_engine_diagnostic(Diagnostic::new(
                ENGINE_RULE_NAME,
                "handlerPanic",
                format!("rule '{}' panicked: {message}", rule.name),
                Severity::Error,
                node.range(),
            ));
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Depth-first pre/post order walk, checking `is_cancelled` between
/// depth-0 siblings (spec.md §5 "Cancellation & timeouts"). The source
/// file's own top-level statements are the depth-0 sibling level; the
/// root itself has no siblings, so the check belongs in its children
/// loop rather than at entry to `walk`.
fn walk<'a>(table: &DispatchTable<'_, 'a>, node: Node<'a>, depth: usize, is_cancelled: &dyn Fn() -> bool) -> bool {
    dispatch(table, node.kind(), Phase::Enter, node);
    for child in node.children() {
        if depth == 0 && is_cancelled() {
            return false;
        }
        if !walk(table, child, depth + 1, is_cancelled) {
            return false;
        }
    }
    dispatch(table, node.kind(), Phase::Exit, node);
    true
}

/// Runs every enabled rule's `run` once to collect its listener map,
/// walks the tree, delivers the synthetic end-of-file event, and returns
/// the combined, sorted diagnostic list for one file (spec.md §4.3-§4.5).
#[tracing::instrument(skip_all, fields(path = %source_file.path().display()))]
pub fn walk_file(
    source_file: &SourceFile,
    tree: &SyntaxTree,
    type_checker: &dyn TypeChecker,
    compiler_options: &CompilerOptions,
    registry: &RuleRegistry,
    enabled: &EnabledRules,
    is_cancelled: &dyn Fn() -> bool,
) -> Vec<Diagnostic> {
    if is_cancelled() {
        return Vec::new();
    }

    let mut enabled_rules: Vec<EnabledRule<'_>> = Vec::new();
    for (rule_order, name, config) in enabled.iter() {
        let Some(rule) = registry.lookup(name) else {
            continue;
        };
        if config.severity == Severity::Off {
            continue;
        }
        let context = RuleContext::new(
            source_file,
            tree,
            type_checker,
            compiler_options,
            name,
            config.severity,
            rule_order,
        );
        let listeners = run_rule(&rule, &context, config);
        enabled_rules.push(EnabledRule {
            name: name.to_string(),
            rule_order,
            context,
            listeners,
            poisoned: std::cell::Cell::new(false),
        });
    }

    let table = build_dispatch_table(&enabled_rules);

    walk(&table, tree.root(), 0, is_cancelled);

    if !is_cancelled() {
        dispatch(&table, Kind::EndOfFileToken, Phase::Enter, tree.root());
    }

    let mut diagnostics: Vec<Diagnostic> = enabled_rules
        .into_iter()
        .flat_map(|rule| rule.context.into_diagnostics())
        .collect();
    sort_diagnostics(&mut diagnostics);
    diagnostics
}

fn run_rule<'a>(
    rule: &std::sync::Arc<dyn crate::rule::Rule>,
    context: &RuleContext<'a>,
    config: &RuleConfig,
) -> Vec<Listener<'a>> {
    rule.run(context, &config.options).into_entries()
}
