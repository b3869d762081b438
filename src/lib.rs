//! The rule execution engine for a TypeScript/JavaScript static analyzer:
//! a rule registry, a configuration resolver, a listener-based tree
//! walker, the diagnostic/fix/suggestion protocol, and a rule-tester
//! harness. Parsing and type checking are external collaborators reached
//! only through the `TypeChecker` trait and the `FrontEnd` trait a host
//! application supplies; this crate ships a small reference front end
//! (`frontend`) good enough to drive its own rule-tester fixtures, not a
//! production TypeScript compiler.

mod config;
mod context;
mod diagnostic;
mod driver;
mod error;
mod fixing;
mod frontend;
mod registry;
mod rule;
mod rule_tester;
mod rules;
mod source;
mod syntax;
mod types;
mod util;
mod walker;

pub use config::{
    find_config_file, load_config_file, parse_jsonc, ConfigEntry, Configuration, EnabledRules, RuleConfig,
};
pub use context::{CompilerOptions, RuleContext};
pub use diagnostic::{compare_diagnostics, sort_diagnostics, Diagnostic, Edit, Severity, Suggestion};
pub use driver::{FileReport, FrontEnd, LintDriver, LintOutcome, RunSummary};
pub use error::LintError;
pub use fixing::{compose_fixes, FixConflict, Patch};
pub use frontend::{ReferenceFrontEnd, SimpleTypeChecker};
pub use registry::{Plugin, RuleRegistry};
pub use rule::{Listener, Listeners, Phase, Rule, RuleMeta, RuleOptions};
pub use rule_tester::{
    ExpectedOutput, RuleTestError, RuleTestInvalid, RuleTestValid, RuleTester, RuleTests,
};
pub use rules::{register_all as register_illustrative_rules, NoTernaryRule, NoUnnecessaryTypeAssertionRule, PreferAsConstRule};
pub use source::{Position, Range, SourceFile};
pub use syntax::{Kind, Node, NodeId, SyntaxTree, SyntaxTreeBuilder};
pub use types::{NullTypeChecker, Param, Signature, Symbol, Type, TypeChecker, TypeFlags};
pub use util as rule_util;
