//! The rule tester harness (spec.md §4.6): a deterministic fixture
//! runner every rule's own test file drives.
//!
//! Grounded on the teacher's `rule_tester.rs` (`RuleTester::run`,
//! `run_valid_test`/`run_invalid_test`,
//! `check_that_violations_match_expected`/
//! `check_that_violation_matches_expected`). The teacher feeds fixtures
//! through `run_fixing_for_slice` against a tree-sitter grammar; this
//! harness feeds them through the `FrontEnd` trait plus a throwaway
//! single-rule `RuleRegistry`/`Configuration`, and asserts with ordinary
//! `assert!`/`assert_eq!` rather than the teacher's aggregate-or-panic
//! dual mode (`RULE_TEST_SUMMARY`), since this crate has no CLI surface
//! to flip that switch from.

use std::sync::Arc;

use crate::config::{ConfigEntry, Configuration};
use crate::diagnostic::Diagnostic;
use crate::driver::FrontEnd;
use crate::fixing::compose_fixes;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleOptions};
use crate::walker::walk_file;

/// A fixture expected to produce zero diagnostics from this rule
/// (spec.md §4.6 "Valid cases").
#[derive(Debug, Clone)]
pub struct RuleTestValid {
    pub code: String,
    pub options: RuleOptions,
    pub filename: String,
}

impl RuleTestValid {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            options: RuleOptions::Null,
            filename: "file.ts".to_string(),
        }
    }

    pub fn with_options(mut self, options: RuleOptions) -> Self {
        self.options = options;
        self
    }
}

/// One expected diagnostic from an invalid fixture. Position fields are
/// optional: only the ones supplied are checked (spec.md §4.6).
#[derive(Debug, Clone, Default)]
pub struct RuleTestError {
    pub message_id: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
}

impl RuleTestError {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn ending_at(mut self, end_line: u32, end_column: u32) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }
}

/// `output?: string | string[]` (spec.md §4.6): either one expected text
/// after a single fix pass, or one expected text per successive pass.
#[derive(Debug, Clone)]
pub enum ExpectedOutput {
    SinglePass(String),
    Passes(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct RuleTestInvalid {
    pub code: String,
    pub options: RuleOptions,
    pub filename: String,
    pub errors: Vec<RuleTestError>,
    pub output: Option<ExpectedOutput>,
}

impl RuleTestInvalid {
    pub fn new(code: impl Into<String>, errors: Vec<RuleTestError>) -> Self {
        Self {
            code: code.into(),
            options: RuleOptions::Null,
            filename: "file.ts".to_string(),
            errors,
            output: None,
        }
    }

    pub fn with_options(mut self, options: RuleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn expect_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(ExpectedOutput::SinglePass(output.into()));
        self
    }

    pub fn expect_passes(mut self, outputs: Vec<String>) -> Self {
        self.output = Some(ExpectedOutput::Passes(outputs));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleTests {
    pub valid: Vec<RuleTestValid>,
    pub invalid: Vec<RuleTestInvalid>,
}

/// Runs a rule's fixture corpus against a concrete front end (spec.md
/// §4.6). The front end is supplied by the caller rather than fixed to
/// one implementation, since the engine's own parser/type-checker are
/// external collaborators (spec.md §1).
pub struct RuleTester<'f> {
    rule: Arc<dyn Rule>,
    front_end: &'f dyn FrontEnd,
}

impl<'f> RuleTester<'f> {
    pub fn new(rule: Arc<dyn Rule>, front_end: &'f dyn FrontEnd) -> Self {
        Self { rule, front_end }
    }

    pub fn run(&self, tests: &RuleTests) {
        if !self.rule.meta().fixable
            && tests
                .invalid
                .iter()
                .any(|t| matches!(t.output, Some(ExpectedOutput::SinglePass(_)) | Some(ExpectedOutput::Passes(_))))
        {
            panic!(
                "rule '{}' declared 'output' in a test case but is not fixable",
                self.rule.meta().name
            );
        }

        for valid in &tests.valid {
            self.run_valid(valid);
        }
        for invalid in &tests.invalid {
            self.run_invalid(invalid);
        }
    }

    fn lint(&self, code: &str, options: &RuleOptions, filename: &str) -> Vec<Diagnostic> {
        let mut registry = RuleRegistry::new();
        let rule_name = self.rule.meta().name.clone();
        registry.register(rule_name.clone(), self.rule.clone());

        let mut rules = serde_json::Map::new();
        rules.insert(rule_name.clone(), serde_json::json!(["error", options]));
        let configuration = Configuration::new(vec![ConfigEntry {
            files: None,
            ignores: Vec::new(),
            plugins: Vec::new(),
            rules,
        }]);

        let (source_file, tree, type_checker) = self.front_end.parse(std::path::Path::new(filename), code);
        let compiler_options = self.front_end.compiler_options();
        let enabled = configuration
            .resolve_for_file(&registry, source_file.path())
            .expect("rule tester config is well-formed");

        walk_file(
            &source_file,
            &tree,
            type_checker.as_ref(),
            &compiler_options,
            &registry,
            &enabled,
            &|| false,
        )
        .into_iter()
        .filter(|d| d.rule_name == rule_name)
        .collect()
    }

    fn run_valid(&self, test: &RuleTestValid) {
        let diagnostics = self.lint(&test.code, &test.options, &test.filename);
        assert!(
            diagnostics.is_empty(),
            "expected no diagnostics from rule '{}' for code {:?}, got: {diagnostics:#?}",
            self.rule.meta().name,
            test.code
        );
    }

    fn run_invalid(&self, test: &RuleTestInvalid) {
        let diagnostics = self.lint(&test.code, &test.options, &test.filename);
        assert_eq!(
            diagnostics.len(),
            test.errors.len(),
            "expected {} diagnostics from rule '{}' for code {:?}, got: {diagnostics:#?}",
            test.errors.len(),
            self.rule.meta().name,
            test.code
        );

        let (source_file, _tree, _checker) = self.front_end.parse(std::path::Path::new(&test.filename), &test.code);
        for (diagnostic, expected) in diagnostics.iter().zip(&test.errors) {
            assert_eq!(
                diagnostic.message_id, expected.message_id,
                "unexpected messageId for code {:?}",
                test.code
            );
            if let Some(line) = expected.line {
                let position = source_file.position_of(diagnostic.range.start);
                assert_eq!(position.line, line, "unexpected start line for code {:?}", test.code);
            }
            if let Some(column) = expected.column {
                let position = source_file.position_of(diagnostic.range.start);
                assert_eq!(position.column, column, "unexpected start column for code {:?}", test.code);
            }
            if let Some(end_line) = expected.end_line {
                let position = source_file.position_of(diagnostic.range.end);
                assert_eq!(position.line, end_line, "unexpected end line for code {:?}", test.code);
            }
            if let Some(end_column) = expected.end_column {
                let position = source_file.position_of(diagnostic.range.end);
                assert_eq!(position.column, end_column, "unexpected end column for code {:?}", test.code);
            }
        }

        match &test.output {
            None => {}
            Some(ExpectedOutput::SinglePass(expected)) => {
                let edits: Vec<_> = diagnostics.iter().flat_map(|d| d.fixes.clone().unwrap_or_default()).collect();
                let patch = compose_fixes(&test.code, edits).expect("fixes should not conflict");
                assert_eq!(&patch.text, expected, "unexpected single-pass fix output for code {:?}", test.code);
            }
            Some(ExpectedOutput::Passes(expected_passes)) => {
                let mut current = test.code.clone();
                for expected in expected_passes {
                    let diagnostics = self.lint(&current, &test.options, &test.filename);
                    let edits: Vec<_> = diagnostics.iter().flat_map(|d| d.fixes.clone().unwrap_or_default()).collect();
                    assert!(
                        !edits.is_empty(),
                        "expected another fix pass for code {:?} but none was produced",
                        test.code
                    );
                    let patch = compose_fixes(&current, edits).expect("fixes should not conflict");
                    assert_eq!(&patch.text, expected, "unexpected fix output for code {:?}", test.code);
                    current = patch.text;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CompilerOptions, RuleContext};
    use crate::diagnostic::Edit;
    use crate::rule::{Listeners, RuleMeta};
    use crate::source::{Range, SourceFile};
    use crate::syntax::{Kind, SyntaxTree, SyntaxTreeBuilder};
    use crate::types::{NullTypeChecker, TypeChecker};
    use std::path::Path;

    struct NoTernaryRule(RuleMeta);

    impl Rule for NoTernaryRule {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }
        fn run<'a>(&self, _ctx: &RuleContext<'a>, _options: &RuleOptions) -> Listeners<'a> {
            Listeners::new().on_enter(Kind::ConditionalExpression, |node, ctx| {
                ctx.report_node(node, "noTernaryOperator", "no ternary");
            })
        }
    }

    /// Parses the single fixed shape every test fixture here uses: the
    /// whole file is one `ConditionalExpression`, optionally with a fix
    /// that replaces it with `"3"` (standing in for a `prefer-as-const`
    /// style rewrite).
    struct SingleNodeFrontEnd;

    impl FrontEnd for SingleNodeFrontEnd {
        fn parse(&self, path: &Path, text: &str) -> (SourceFile, SyntaxTree, Box<dyn TypeChecker>) {
            let source_file = SourceFile::new(path.to_path_buf(), text.to_string());
            let mut builder = SyntaxTreeBuilder::new();
            let id = builder.push(Kind::ConditionalExpression, Range::new(0, text.len()), vec![]);
            (source_file, builder.finish(id), Box::new(NullTypeChecker))
        }

        fn compiler_options(&self) -> CompilerOptions {
            CompilerOptions::default()
        }
    }

    struct FixableTernaryRule(RuleMeta);

    impl Rule for FixableTernaryRule {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }
        fn run<'a>(&self, _ctx: &RuleContext<'a>, _options: &RuleOptions) -> Listeners<'a> {
            Listeners::new().on_enter(Kind::ConditionalExpression, |node, ctx| {
                ctx.report_node_with_fix(
                    node,
                    "noTernaryOperator",
                    "no ternary",
                    vec![Edit::new(node.range(), "3")],
                );
            })
        }
    }

    #[test]
    fn valid_case_with_no_diagnostics_passes() {
        let front_end = SingleNodeFrontEnd;
        let rule = Arc::new(NoTernaryRule(RuleMeta {
            name: "no-ternary".into(),
            fixable: false,
        }));
        let tester = RuleTester::new(rule, &front_end);
        tester.run(&RuleTests {
            valid: vec![RuleTestValid::new("1")],
            invalid: vec![],
        });
    }

    #[test]
    fn invalid_case_checks_message_id_and_position() {
        let front_end = SingleNodeFrontEnd;
        let rule = Arc::new(NoTernaryRule(RuleMeta {
            name: "no-ternary".into(),
            fixable: false,
        }));
        let tester = RuleTester::new(rule, &front_end);
        tester.run(&RuleTests {
            valid: vec![],
            invalid: vec![RuleTestInvalid::new(
                "a ? 1 : 2",
                vec![RuleTestError::new("noTernaryOperator").at(1, 1)],
            )],
        });
    }

    #[test]
    fn invalid_case_verifies_single_pass_fix_output() {
        let front_end = SingleNodeFrontEnd;
        let rule = Arc::new(FixableTernaryRule(RuleMeta {
            name: "prefer-as-const".into(),
            fixable: true,
        }));
        let tester = RuleTester::new(rule, &front_end);
        tester.run(&RuleTests {
            valid: vec![],
            invalid: vec![RuleTestInvalid::new(
                "3 as 3",
                vec![RuleTestError::new("noTernaryOperator")],
            )
            .expect_output("3")],
        });
    }

    #[test]
    #[should_panic(expected = "not fixable")]
    fn declaring_output_for_a_non_fixable_rule_panics() {
        let front_end = SingleNodeFrontEnd;
        let rule = Arc::new(NoTernaryRule(RuleMeta {
            name: "no-ternary".into(),
            fixable: false,
        }));
        let tester = RuleTester::new(rule, &front_end);
        tester.run(&RuleTests {
            valid: vec![],
            invalid: vec![RuleTestInvalid::new(
                "a ? 1 : 2",
                vec![RuleTestError::new("noTernaryOperator")],
            )
            .expect_output("1")],
        });
    }
}
