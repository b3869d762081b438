//! Per-file and per-run orchestration (spec.md §2; SPEC_FULL.md §3
//! "Per-file report aggregation", "Parallel driver over many files").
//!
//! Grounded on `rslint_core::lint_file`/`LintResult` (one file in, one
//! report out, `warning_count`/`error_count` style summary) and on
//! `jarl-core::check::check` (a `rayon::par_iter` map over input paths
//! collecting a `(path, Result<Vec<Diagnostic>, _>)` per file). The
//! `FrontEnd` trait exists so a fresh, non-`Send` type-checker value is
//! produced *inside* each thread's closure rather than shared across
//! threads (spec.md §5: "the type-checker handle is not guaranteed
//! thread-safe; it must be owned by at most one walker at a time").

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::Configuration;
use crate::context::CompilerOptions;
use crate::diagnostic::{Diagnostic, Severity};
use crate::error::LintError;
use crate::registry::RuleRegistry;
use crate::source::SourceFile;
use crate::syntax::SyntaxTree;
use crate::types::TypeChecker;
use crate::walker::walk_file;

/// Produces a parsed `(SourceFile, SyntaxTree, TypeChecker)` bundle for
/// one file's text. Implementations must be `Send + Sync` so the value
/// itself can cross threads, but each call produces a fresh, thread-owned
/// type-checker handle (spec.md §5, SPEC_FULL.md §7 "Reference front end").
pub trait FrontEnd: Send + Sync {
    fn parse(&self, path: &Path, text: &str) -> (SourceFile, SyntaxTree, Box<dyn TypeChecker>);

    fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions::default()
    }
}

/// Success/warning/failure classification of a file's diagnostic list
/// (SPEC_FULL.md §3, grounded in `rslint_core::Outcome` and
/// `oxc_linter::rule::RuleCategory`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintOutcome {
    Success,
    Warning,
    Failure,
}

impl LintOutcome {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        if diagnostics.iter().any(|d| d.severity == Severity::Error) {
            LintOutcome::Failure
        } else if diagnostics.iter().any(|d| d.severity == Severity::Warn) {
            LintOutcome::Warning
        } else {
            LintOutcome::Success
        }
    }
}

/// One file's lint result (spec.md §2 "per-file report").
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub outcome: LintOutcome,
}

impl FileReport {
    fn new(path: PathBuf, diagnostics: Vec<Diagnostic>) -> Self {
        let outcome = LintOutcome::from_diagnostics(&diagnostics);
        Self {
            path,
            diagnostics,
            outcome,
        }
    }

    pub fn has_fixable_diagnostics(&self) -> bool {
        self.diagnostics.iter().any(|d| d.fixes.is_some())
    }
}

/// A run-level aggregate over many files' reports (SPEC_FULL.md §3,
/// grounded in `rslint_core::LintResult`/`jarl-core::Checker`).
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub error_count: usize,
    pub warning_count: usize,
    pub files_with_fixes: usize,
}

impl RunSummary {
    fn from_reports(reports: Vec<FileReport>) -> Self {
        let mut summary = RunSummary {
            error_count: 0,
            warning_count: 0,
            files_with_fixes: 0,
            reports: Vec::new(),
        };
        for report in reports {
            for diagnostic in &report.diagnostics {
                match diagnostic.severity {
                    Severity::Error => summary.error_count += 1,
                    Severity::Warn => summary.warning_count += 1,
                    Severity::Off => {}
                }
            }
            if report.has_fixable_diagnostics() {
                summary.files_with_fixes += 1;
            }
            summary.reports.push(report);
        }
        summary
    }
}

/// Ties a registry and a configuration together to lint one or many
/// files (spec.md §2).
pub struct LintDriver<'r> {
    registry: &'r RuleRegistry,
    configuration: &'r Configuration,
}

impl<'r> LintDriver<'r> {
    pub fn new(registry: &'r RuleRegistry, configuration: &'r Configuration) -> Self {
        Self {
            registry,
            configuration,
        }
    }

    /// Lints one file's already-read text (spec.md §4.2 resolve, §4.4
    /// walk, §4.5 collect).
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn lint_text(
        &self,
        path: &Path,
        text: &str,
        front_end: &dyn FrontEnd,
        is_cancelled: &dyn Fn() -> bool,
    ) -> Result<FileReport, LintError> {
        if is_cancelled() {
            return Ok(FileReport::new(path.to_path_buf(), Vec::new()));
        }

        let enabled = self.configuration.resolve_for_file(self.registry, path)?;
        let (source_file, tree, type_checker) = front_end.parse(path, text);
        let compiler_options = front_end.compiler_options();

        let diagnostics = walk_file(
            &source_file,
            &tree,
            type_checker.as_ref(),
            &compiler_options,
            self.registry,
            &enabled,
            is_cancelled,
        );

        Ok(FileReport::new(path.to_path_buf(), diagnostics))
    }

    /// Lints many files in parallel (spec.md §5 "Parallelism"), checking
    /// cancellation at each file boundary and stopping the scan (not the
    /// in-flight files) once signalled.
    pub fn lint_many(
        &self,
        files: &[(PathBuf, String)],
        front_end: &dyn FrontEnd,
        is_cancelled: &(dyn Fn() -> bool + Sync),
    ) -> RunSummary {
        let reports: Vec<FileReport> = files
            .par_iter()
            .filter_map(|(path, text)| {
                if is_cancelled() {
                    return None;
                }
                match self.lint_text(path, text, front_end, &|| is_cancelled()) {
                    Ok(report) => Some(report),
                    Err(err) => {
                        tracing::error!(path = %path.display(), error = %err, "config resolution failed for file");
                        None
                    }
                }
            })
            .collect();

        RunSummary::from_reports(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigEntry;
    use crate::rule::{Listeners, Rule, RuleMeta, RuleOptions};
    use crate::source::Range;
    use crate::syntax::{Kind, SyntaxTreeBuilder};
    use crate::types::NullTypeChecker;
    use std::sync::Arc;

    struct NoTernaryRule(RuleMeta);

    impl Rule for NoTernaryRule {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }
        fn run<'a>(&self, _ctx: &crate::context::RuleContext<'a>, _options: &RuleOptions) -> Listeners<'a> {
            Listeners::new().on_enter(Kind::ConditionalExpression, |node, ctx| {
                ctx.report_node(node, "noTernaryOperator", "no ternary");
            })
        }
    }

    struct StubFrontEnd;

    impl FrontEnd for StubFrontEnd {
        fn parse(&self, path: &Path, text: &str) -> (SourceFile, SyntaxTree, Box<dyn TypeChecker>) {
            let source_file = SourceFile::new(path.to_path_buf(), text.to_string());
            let mut builder = SyntaxTreeBuilder::new();
            let id = builder.push(Kind::ConditionalExpression, Range::new(0, text.len()), vec![]);
            (source_file, builder.finish(id), Box::new(NullTypeChecker))
        }
    }

    fn registry_and_config() -> (RuleRegistry, Configuration) {
        let mut registry = RuleRegistry::new();
        registry.register(
            "no-ternary",
            Arc::new(NoTernaryRule(RuleMeta {
                name: "no-ternary".into(),
                fixable: false,
            })),
        );
        let mut rules = serde_json::Map::new();
        rules.insert("no-ternary".to_string(), serde_json::json!("error"));
        let config = Configuration::new(vec![ConfigEntry {
            files: None,
            ignores: Vec::new(),
            plugins: Vec::new(),
            rules,
        }]);
        (registry, config)
    }

    #[test]
    fn lint_text_classifies_outcome_as_failure_on_error_severity() {
        let (registry, config) = registry_and_config();
        let driver = LintDriver::new(&registry, &config);
        let front_end = StubFrontEnd;

        let report = driver
            .lint_text(Path::new("f.ts"), "a ? 1 : 2", &front_end, &|| false)
            .unwrap();

        assert_eq!(report.outcome, LintOutcome::Failure);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn lint_many_aggregates_error_counts_across_files() {
        let (registry, config) = registry_and_config();
        let driver = LintDriver::new(&registry, &config);
        let front_end = StubFrontEnd;
        let files = vec![
            (PathBuf::from("a.ts"), "a ? 1 : 2".to_string()),
            (PathBuf::from("b.ts"), "a ? 1 : 2".to_string()),
        ];

        let summary = driver.lint_many(&files, &front_end, &|| false);

        assert_eq!(summary.reports.len(), 2);
        assert_eq!(summary.error_count, 2);
    }
}
